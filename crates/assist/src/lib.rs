//! Prompt budgeting and composition pipeline.
//!
//! The pipeline for every writing operation is:
//!
//! 1. **tokens** — exact BPE token counts for budget checks
//! 2. **trim** — drop leading sentences until the draft fits its budget
//! 3. **compose** — persona messages + one synthesized task message
//! 4. **engine** — drive trim → compose → generation ladder per operation
//!
//! # Determinism
//!
//! Estimation, trimming, and composition are pure: identical inputs always
//! produce byte-identical outputs. Only the engine performs I/O.

pub mod compose;
pub mod engine;
pub mod ops;
pub mod tokens;
pub mod trim;

pub use compose::compose;
pub use engine::AssistEngine;
pub use ops::{Operation, OperationSpec, TaskFraming};
pub use tokens::{estimate_messages, estimate_tokens};
pub use trim::trim_to_budget;
