// CodeLens Server State
// Copyright (c) 2026 Xing_The_Creator | CodeLens

use crate::config::Settings;
use crate::review::gateway::{CompletionGateway, GroqGateway};
use std::sync::Arc;

/// Shared, read-only server state. Each request is independent; sessions
/// live on the client.
pub struct ServerState {
    pub gateway: Arc<dyn CompletionGateway>,
    pub model: String,
}

impl ServerState {
    pub fn new(gateway: Arc<dyn CompletionGateway>, model: &str) -> Self {
        Self {
            gateway,
            model: model.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(GroqGateway::from_settings(settings)),
            &settings.model,
        )
    }
}

#[derive(serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}
