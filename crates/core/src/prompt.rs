//! Prompt message types.
//!
//! A composed prompt is an ordered sequence of role-tagged messages.
//! Order is semantically significant: persona instructions must precede
//! the task content. Messages carry no ids or timestamps so that
//! composition stays byte-deterministic.

use serde::{Deserialize, Serialize};

/// The role of a prompt message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, task framing)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// One role-tagged instruction/content unit sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
