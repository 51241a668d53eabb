//! The assist engine — drives one operation end to end.
//!
//! For each request: compute the input token budget for the operation's
//! entry tier, trim the draft body to it, compose the message sequence,
//! and hand it to the generation ladder. Upstream failure surfaces as an
//! error, never as an empty success.

use crate::compose::compose;
use crate::ops::{Operation, TaskFraming};
use crate::tokens::estimate_messages;
use crate::trim::trim_to_budget;
use tracing::info;
use writebuddy_config::ModelsConfig;
use writebuddy_core::error::ProviderError;
use writebuddy_core::provider::{Generation, ModelTier};
use writebuddy_core::{Draft, StyleDirective};
use writebuddy_providers::GenerationLadder;

/// Executes writing operations against the generation ladder.
pub struct AssistEngine {
    ladder: GenerationLadder,
    primary_window: usize,
    fallback_window: usize,
    response_reserve: usize,
}

impl AssistEngine {
    pub fn new(ladder: GenerationLadder, models: &ModelsConfig) -> Self {
        Self {
            ladder,
            primary_window: models.primary_context_window,
            fallback_window: models.fallback_context_window,
            response_reserve: models.response_reserve_tokens,
        }
    }

    /// Run one operation: budget, trim, compose, generate.
    pub async fn run(
        &self,
        op: Operation,
        draft: Draft,
        style: StyleDirective,
    ) -> Result<Generation, ProviderError> {
        let spec = op.spec();

        // Verbatim operations send the raw text as-is: attached context and
        // tone would structure the prompt, so they are dropped up front.
        let (draft, style) = if spec.framing == TaskFraming::Verbatim {
            (Draft::new(draft.body), StyleDirective::Neutral)
        } else {
            (draft, style)
        };

        let budget = self.input_budget(op, &draft, style);
        let trimmed = trim_to_budget(&draft.body, budget);
        let draft = draft.with_body(trimmed);

        let messages = compose(spec, &draft, style);

        info!(
            op = op.name(),
            budget,
            messages = messages.len(),
            "Dispatching generation"
        );

        self.ladder.generate(messages, spec.entry_tier).await
    }

    /// Tokens available for the draft body itself: the entry tier's context
    /// window, minus everything else the composed prompt will carry (persona,
    /// sources, topic, style, framing), minus the reply reserve.
    pub fn input_budget(&self, op: Operation, draft: &Draft, style: StyleDirective) -> usize {
        let spec = op.spec();
        let scaffold = compose(spec, &draft.clone().with_body(""), style);
        let overhead = estimate_messages(&scaffold);
        let window = match spec.entry_tier {
            ModelTier::Primary => self.primary_window,
            ModelTier::Fallback => self.fallback_window,
        };
        window.saturating_sub(overhead + self.response_reserve)
    }
}
