#![allow(dead_code)]

use async_trait::async_trait;
use codelens::review::{ChatTurn, CompletionGateway, GatewayError};
use std::sync::Mutex;

enum Reply {
    Text(String),
    NoKey,
    Upstream(u16, String),
}

/// Canned gateway: replies with a fixed text (or fails) and records what it
/// was sent.
pub struct FakeGateway {
    reply: Reply,
    pub calls: Mutex<Vec<(Vec<ChatTurn>, String)>>,
}

impl FakeGateway {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like a provider client with no API key configured.
    pub fn without_key() -> Self {
        Self {
            reply: Reply::NoKey,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider answered with a non-2xx status.
    pub fn upstream_error(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Upstream(status, body.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_turns(&self) -> Vec<ChatTurn> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(turns, _)| turns.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionGateway for FakeGateway {
    async fn complete(&self, turns: &[ChatTurn], model: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((turns.to_vec(), model.to_string()));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::NoKey => Err(GatewayError::MissingCredential),
            Reply::Upstream(status, body) => Err(GatewayError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
