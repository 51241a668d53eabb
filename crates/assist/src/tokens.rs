//! Token estimation for budget checks.
//!
//! Uses the `cl100k_base` BPE encoding — the same subword scheme the
//! target chat models tokenize with — so budget checks count real tokens
//! rather than approximating from character length.
//!
//! The encoder is built once per process. If the encoding table cannot be
//! constructed the process must not serve requests, so `preload()` is
//! called at startup and panics there rather than failing per-request.

use std::sync::LazyLock;
use tiktoken_rs::{CoreBPE, cl100k_base};
use writebuddy_core::PromptMessage;

static BPE: LazyLock<CoreBPE> =
    LazyLock::new(|| cl100k_base().expect("cl100k_base encoding table unavailable"));

/// Force the lazy encoder so a missing encoding table fails at startup.
pub fn preload() {
    LazyLock::force(&BPE);
}

/// Count the tokens in a string. Pure and deterministic.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    BPE.encode_with_special_tokens(text).len()
}

/// Per-message overhead for role name and delimiters in the wire format.
const MESSAGE_OVERHEAD: usize = 4;

/// Estimate tokens for a message sequence, including per-message overhead.
pub fn estimate_messages(messages: &[PromptMessage]) -> usize {
    messages
        .iter()
        .map(|m| MESSAGE_OVERHEAD + estimate_tokens(&m.content))
        .sum()
}
