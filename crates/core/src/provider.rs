//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a composed prompt to a chat-completion
//! endpoint and return the first candidate's text. The generation ladder
//! calls `complete()` without knowing which backend is behind it.

use crate::error::ProviderError;
use crate::prompt::PromptMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The two rungs of the degradation ladder.
///
/// `Primary` is the high-quality tier; `Fallback` is the cheaper tier used
/// when the primary call fails (and for operations that target it directly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Primary,
    Fallback,
}

/// A request to a chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The concrete model name (e.g. "gpt-4")
    pub model: String,

    /// The composed prompt, in order
    pub messages: Vec<PromptMessage>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    /// Build a request with default sampling parameters.
    pub fn new(model: impl Into<String>, messages: Vec<PromptMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete response from a provider.
///
/// Only the first candidate is carried; multiple candidates and streaming
/// partials are not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The first candidate's text content
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage, when the provider reports it
    pub usage: Option<Usage>,
}

/// A successful generation, tagged with the tier that produced it.
///
/// The tag is what lets callers observe that the ladder degraded without
/// changing the response shape they return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub tier: ModelTier,
}

/// The core Provider trait.
///
/// Callers must not assume idempotence: the same prompt may yield
/// different text across calls, and every call has provider-side cost.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
