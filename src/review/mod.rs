// CodeLens Review Modules
// Copyright (c) 2026 Xing_The_Creator | CodeLens

pub mod gateway;
pub mod interpreter;
pub mod language;
pub mod prompt;
pub mod report;
pub mod session;

pub use gateway::{CompletionGateway, GatewayError, GroqGateway};
pub use interpreter::{Interpretation, MetricsUpdate};
pub use language::Language;
pub use prompt::{ChatRequest, ChatTurn, Mode, Role};
pub use session::{Completion, Message, MetricsSnapshot, ReviewSession, SessionError};
