//! Budget trimming — drop whole leading sentences until the text fits.
//!
//! Trimming discards the *oldest* part of a long-running document and
//! keeps the most recent writing, which is the part that matters for a
//! continuation task. Sentences are split on `'.'` only. This is naive by
//! contract: `?`, `!`, abbreviations, and decimal points are not sentence
//! boundaries here, and callers accept that boundaries are sometimes
//! wrong. Do not improve the splitter without a new requirement.

use crate::tokens::estimate_tokens;

/// Inputs shorter than this many characters skip trimming entirely,
/// avoiding a tokenizer pass for the common short-draft case. This is
/// deliberately a character threshold, not a token threshold.
pub const SKIP_TRIM_MAX_CHARS: usize = 1024;

/// Trim `text` until its token estimate fits within `token_limit`.
///
/// Whole sentences are removed from the front, never mid-sentence. If a
/// single remaining sentence still exceeds the budget, the result is the
/// empty string — a valid, if useless, draft body; never an error.
pub fn trim_to_budget(text: &str, token_limit: usize) -> String {
    if text.len() < SKIP_TRIM_MAX_CHARS {
        return text.to_string();
    }

    if estimate_tokens(text) <= token_limit {
        return text.to_string();
    }

    let mut sentences: Vec<&str> = text.split('.').collect();
    while !sentences.is_empty() {
        sentences.remove(0);
        let remaining = sentences.join(".");
        if estimate_tokens(&remaining) <= token_limit {
            return remaining;
        }
    }

    String::new()
}
