//! Outbound clients for WriteBuddy.
//!
//! - `openai` — the OpenAI-compatible chat-completion client
//! - `ladder` — the two-tier degradation ladder over any `Provider`
//! - `thesaurus` — the third-party word-association lookup

pub mod ladder;
pub mod openai;
pub mod thesaurus;

pub use ladder::GenerationLadder;
pub use openai::OpenAiProvider;
pub use thesaurus::ThesaurusClient;
