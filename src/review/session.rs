// CodeLens Review Session
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Session-scoped state: message log, editor buffer, metrics snapshot and
// console output. A single writer drives it through `begin` / `finish`; the
// in-flight gate makes overlapping requests an error instead of a race.

use crate::review::gateway::{CompletionGateway, GatewayError};
use crate::review::interpreter::{self, MetricsUpdate};
use crate::review::language::Language;
use crate::review::prompt::{ChatRequest, ChatTurn, Mode, Role};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub const GREETING: &str = "Hello there! I am ready to analyze or optimize your code.";
pub const CHAT_FAILURE: &str = "Error connecting to AI.";
pub const EXECUTION_FAILURE: &str = "Execution failed. Network or server error.";
pub const EXECUTION_PENDING: &str = "Initializing environment...\nRunning...";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a {} request is already in flight", .0.as_str())]
    Busy(Mode),
    #[error("message is empty")]
    EmptyInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Analysis,
    Optimization,
}

impl From<Mode> for Category {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Analyze => Category::Analysis,
            Mode::Optimize => Category::Optimization,
            Mode::Chat | Mode::Execute => Category::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Speaker,
    pub content: String,
    pub category: Category,
    pub hidden: bool,
    pub timestamp: String,
}

impl Message {
    fn new(role: Speaker, content: impl Into<String>, category: Category, hidden: bool) -> Self {
        Self {
            role,
            content: content.into(),
            category,
            hidden,
            timestamp: chrono::Local::now().format("%H:%M").to_string(),
        }
    }

    fn to_turn(&self) -> ChatTurn {
        let role = match self.role {
            Speaker::User => Role::User,
            Speaker::Assistant => Role::Assistant,
        };
        ChatTurn::new(role, self.content.clone())
    }
}

/// Latest metrics. Only ever updated field-by-field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub score: Option<u8>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub previous_time_complexity: Option<String>,
}

impl MetricsSnapshot {
    pub fn merge(&mut self, update: &MetricsUpdate) {
        if let Some(score) = update.score {
            self.score = Some(score);
        }
        if let Some(time) = &update.time_complexity {
            self.time_complexity = Some(time.clone());
        }
        if let Some(space) = &update.space_complexity {
            self.space_complexity = Some(space.clone());
        }
        if let Some(prev) = &update.previous_time_complexity {
            self.previous_time_complexity = Some(prev.clone());
        }
    }

    /// `old ➔ new` when a previous time is known.
    pub fn time_label(&self) -> Option<String> {
        let time = self.time_complexity.as_deref()?;
        Some(match self.previous_time_complexity.as_deref() {
            Some(prev) => format!("{} ➔ {}", prev, time),
            None => time.to_string(),
        })
    }
}

/// What `finish` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub buffer_replaced: bool,
    pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    messages: Vec<Message>,
    buffer: String,
    metrics: MetricsSnapshot,
    console: Option<String>,
    pending: Option<Mode>,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new("")
    }
}

impl ReviewSession {
    pub fn new(buffer: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(
                Speaker::Assistant,
                GREETING,
                Category::General,
                false,
            )],
            buffer: buffer.into(),
            metrics: MetricsSnapshot::default(),
            console: None,
            pending: None,
        }
    }

    // --- Accessors ---

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.hidden)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Mutable access for editors bound directly to the buffer.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    pub fn console(&self) -> Option<&str> {
        self.console.as_deref()
    }

    pub fn close_console(&mut self) {
        self.console = None;
    }

    pub fn language(&self) -> Language {
        Language::detect(&self.buffer)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Mode> {
        self.pending
    }

    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Speaker::Assistant)
    }

    /// Most recent analysis reply, the source for audit reports.
    pub fn last_analysis(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Speaker::Assistant && m.category == Category::Analysis)
    }

    // --- Mutators ---

    pub fn append_user(&mut self, content: impl Into<String>, hidden: bool) {
        self.messages
            .push(Message::new(Speaker::User, content, Category::General, hidden));
    }

    pub fn append_assistant(&mut self, content: impl Into<String>, category: Category) {
        self.messages
            .push(Message::new(Speaker::Assistant, content, category, false));
    }

    pub fn replace_buffer(&mut self, code: impl Into<String>) {
        self.buffer = code.into();
    }

    pub fn merge_metrics(&mut self, update: &MetricsUpdate) {
        self.metrics.merge(update);
    }

    /// Start a request. Chat uses `typed_text`; the other modes use their
    /// canned request and ignore it.
    pub fn begin(&mut self, mode: Mode, typed_text: &str) -> Result<ChatRequest, SessionError> {
        if let Some(active) = self.pending {
            warn!("[SESSION] Rejecting {} while {} is in flight", mode.as_str(), active.as_str());
            return Err(SessionError::Busy(active));
        }

        let language = self.language();
        let user_text = match mode.canned_request(language, &self.buffer) {
            Some(text) => text,
            None if typed_text.trim().is_empty() => return Err(SessionError::EmptyInput),
            None => typed_text.to_string(),
        };

        match mode {
            Mode::Execute => {
                self.console = Some(EXECUTION_PENDING.to_string());
            }
            _ => {
                if mode == Mode::Analyze {
                    self.metrics.previous_time_complexity = None;
                }
                self.append_user(user_text.clone(), mode != Mode::Chat);
            }
        }

        let history: Vec<ChatTurn> = self.messages.iter().map(Message::to_turn).collect();
        self.pending = Some(mode);
        info!("[SESSION] {} request started ({})", mode.as_str(), language);

        Ok(ChatRequest::compose(mode, &self.buffer, &user_text, &history))
    }

    /// Apply the outcome of the request started by `begin`. The mode recorded
    /// by `begin` decides where the result goes; `mode` is only used when no
    /// request is pending.
    pub fn finish(&mut self, mode: Mode, outcome: Result<String, GatewayError>) -> Completion {
        let mode = match self.pending.take() {
            Some(active) if active != mode => {
                warn!(
                    "[SESSION] finish({}) called for pending {}; applying as {}",
                    mode.as_str(),
                    active.as_str(),
                    active.as_str()
                );
                active
            }
            Some(active) => active,
            None => mode,
        };

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                warn!("[SESSION] {} request failed: {}", mode.as_str(), e);
                match mode {
                    Mode::Execute => self.console = Some(EXECUTION_FAILURE.to_string()),
                    _ => self.append_assistant(CHAT_FAILURE, Category::General),
                }
                return Completion {
                    buffer_replaced: false,
                    failed: true,
                };
            }
        };

        if mode == Mode::Execute {
            self.console = Some(interpreter::interpret_execution(&raw));
            return Completion::default();
        }

        let reply = interpreter::interpret(&raw);
        let buffer_replaced = reply.buffer.is_some();
        if let Some(code) = reply.buffer {
            info!("[SESSION] Editor buffer replaced ({} bytes)", code.len());
            self.replace_buffer(code);
        }
        self.merge_metrics(&reply.metrics);
        self.append_assistant(reply.display_text, Category::from(mode));

        Completion {
            buffer_replaced,
            failed: false,
        }
    }

    /// `begin`, call the gateway, `finish`.
    pub async fn submit(
        &mut self,
        gateway: &dyn CompletionGateway,
        model: &str,
        mode: Mode,
        typed_text: &str,
    ) -> Result<Completion, SessionError> {
        let request = self.begin(mode, typed_text)?;
        let outcome = gateway.complete(&request.to_turns(), model).await;
        Ok(self.finish(mode, outcome))
    }
}
