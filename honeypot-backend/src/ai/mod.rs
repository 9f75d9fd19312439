//! External text-generation backends for the delegated reply path.
//!
//! The agent talks to whichever backend is configured through the `LlmClient`
//! trait; any failure at this boundary is caught by the caller and replaced
//! with the deterministic rule-based composer, never surfaced to the user.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Per-request timeout for delegated generation.
pub const LLM_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage { role: MessageRole::Assistant, content: content.into() }
    }
}

/// Error from a delegated generation call, with the HTTP status when one exists.
#[derive(Debug, Clone)]
pub struct LlmError {
    pub message: String,
    pub status: Option<u16>,
}

impl LlmError {
    pub fn new(message: impl Into<String>) -> Self {
        LlmError { message: message.into(), status: None }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        LlmError { message: message.into(), status: Some(status) }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} (status {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError>;
}

/// Build the configured delegation client, if any.
/// `mock` (or a provider with no key) means no delegation — the rule-based
/// composer handles every reply.
pub fn client_from_config(config: &Config) -> Option<Arc<dyn LlmClient>> {
    match config.llm_provider.as_str() {
        "openai" if !config.openai_api_key.is_empty() => {
            match OpenAiClient::new(&config.openai_api_key, &config.llm_model) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    log::warn!("[AI] Failed to build OpenAI client: {}", e);
                    None
                }
            }
        }
        "gemini" if !config.gemini_api_key.is_empty() => {
            match GeminiClient::new(&config.gemini_api_key, &config.llm_model) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    log::warn!("[AI] Failed to build Gemini client: {}", e);
                    None
                }
            }
        }
        _ => None,
    }
}
