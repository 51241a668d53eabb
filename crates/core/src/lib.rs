//! Core domain types and traits for WriteBuddy.
//!
//! This crate holds the value objects that flow through the whole system
//! (drafts, prompt messages, generation results) and the `Provider` trait
//! the generation ladder is built on. It performs no I/O of its own.

pub mod draft;
pub mod error;
pub mod prompt;
pub mod provider;

pub use draft::{Draft, Source, StyleDirective};
pub use error::{Error, LookupError, ProviderError, Result};
pub use prompt::{PromptMessage, Role};
pub use provider::{CompletionRequest, CompletionResponse, Generation, ModelTier, Provider, Usage};
