// CodeLens Completion Gateway
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// The only outbound I/O boundary: one request, one response. No retries,
// no backoff, no timeout beyond the transport default.

use crate::config::Settings;
use crate::review::prompt::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API Key missing")]
    MissingCredential,
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion provider returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send `turns` to `model` and return the raw response text.
    async fn complete(&self, turns: &[ChatTurn], model: &str) -> Result<String, GatewayError>;
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completion client (Groq by default).
pub struct GroqGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl GroqGateway {
    pub fn new(api_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.api_url, settings.api_key.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionGateway for GroqGateway {
    async fn complete(&self, turns: &[ChatTurn], model: &str) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;

        info!("[GATEWAY] Sending {} turns to {}", turns.len(), model);

        let payload = CompletionPayload {
            model,
            messages: turns,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("[GATEWAY] Connection failed: {}", e);
                GatewayError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("[GATEWAY] Provider error {}: {}", status, body);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionBody = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        info!("[GATEWAY] Received {} bytes", content.len());
        Ok(content)
    }
}
