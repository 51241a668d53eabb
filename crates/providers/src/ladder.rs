//! The two-tier degradation ladder.
//!
//! One primary model, one designated fallback. When a primary-tier call
//! fails for any provider-reported reason (timeouts included), the same
//! message sequence is retried exactly once against the fallback model.
//! A call that entered at the fallback tier fails outright. There is no
//! backoff and no circuit breaking: the ladder trades quality for
//! availability exactly once.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use writebuddy_core::error::ProviderError;
use writebuddy_core::prompt::PromptMessage;
use writebuddy_core::provider::{CompletionRequest, Generation, ModelTier, Provider};

/// Executes composed prompts against a provider with one-step fallback.
pub struct GenerationLadder {
    provider: Arc<dyn Provider>,
    primary_model: String,
    fallback_model: String,
    timeout: Duration,
}

impl GenerationLadder {
    pub fn new(
        provider: Arc<dyn Provider>,
        primary_model: impl Into<String>,
        fallback_model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
            timeout,
        }
    }

    /// The concrete model name behind a tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Primary => &self.primary_model,
            ModelTier::Fallback => &self.fallback_model,
        }
    }

    /// Run the ladder starting at `entry_tier`.
    ///
    /// Success is tagged with the tier that actually answered, so callers
    /// can observe degradation without changing their response shape.
    pub async fn generate(
        &self,
        messages: Vec<PromptMessage>,
        entry_tier: ModelTier,
    ) -> Result<Generation, ProviderError> {
        match self.attempt(&messages, entry_tier).await {
            Ok(text) => Ok(Generation {
                text,
                tier: entry_tier,
            }),
            Err(e) if entry_tier == ModelTier::Primary => {
                warn!(
                    model = %self.primary_model,
                    error = %e,
                    "Primary tier failed, retrying once on fallback"
                );
                let text = self.attempt(&messages, ModelTier::Fallback).await?;
                info!(model = %self.fallback_model, "Fallback tier answered");
                Ok(Generation {
                    text,
                    tier: ModelTier::Fallback,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn attempt(
        &self,
        messages: &[PromptMessage],
        tier: ModelTier,
    ) -> Result<String, ProviderError> {
        let model = self.model_for(tier).to_string();
        let request = CompletionRequest::new(model.as_str(), messages.to_vec());

        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => Ok(response.text),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProviderError::Timeout(format!(
                "Model '{}' timed out after {}s",
                model,
                self.timeout.as_secs()
            ))),
        }
    }
}
