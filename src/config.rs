// CodeLens Settings
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Everything is read from the process environment (after `.env` has been
// loaded by the binary). The API key is optional here: its absence is a
// per-request failure, not a start-up failure.

use tracing::{info, warn};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const API_URL_VAR: &str = "CODELENS_API_URL";
pub const MODEL_VAR: &str = "CODELENS_MODEL";

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let settings = Self {
            api_key: read(API_KEY_VAR),
            api_url: read(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: read(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        if settings.api_key.is_none() {
            warn!("[CONFIG] {} is not set; completion requests will fail", API_KEY_VAR);
        }
        info!("[CONFIG] Provider: {} (model: {})", settings.api_url, settings.model);

        settings
    }
}
