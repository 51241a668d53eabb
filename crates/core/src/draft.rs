//! Draft domain types.
//!
//! A `Draft` is the text a user is composing plus the optional context they
//! attached to one request: a declared topic and a list of titled source
//! excerpts. Drafts are built per request and never persisted.

use serde::{Deserialize, Serialize};

/// A titled excerpt the user wants the assistant to be aware of.
///
/// Owned by the draft that references it; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub body: String,
}

/// The user's in-progress text plus optional topic/source context.
///
/// Immutable after construction; lives for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// The raw text being composed.
    pub body: String,

    /// What the user says they are writing about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Ordered source excerpts; order is preserved in the prompt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Draft {
    /// Create a draft with just a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            topic: None,
            sources: Vec::new(),
        }
    }

    /// Attach a declared topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Attach source excerpts.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Replace the body, keeping topic and sources. Used after trimming.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Tone the generated text should take.
///
/// Wire format is an integer 0..=4; `Neutral` (2) is the default and maps
/// to an empty instruction so neutral prompts carry no tone sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StyleDirective {
    Casual,
    Friendly,
    #[default]
    Neutral,
    Formal,
    VeryFormal,
}

impl StyleDirective {
    /// The canned tone sentence appended to the task message.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Casual => "Please keep the tone casual and relaxed. ",
            Self::Friendly => "Please keep the tone warm and friendly. ",
            Self::Neutral => "",
            Self::Formal => "Please keep the tone formal. ",
            Self::VeryFormal => "Please keep the tone very formal and professional. ",
        }
    }
}

impl TryFrom<u8> for StyleDirective {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(Self::Casual),
            1 => Ok(Self::Friendly),
            2 => Ok(Self::Neutral),
            3 => Ok(Self::Formal),
            4 => Ok(Self::VeryFormal),
            other => Err(other),
        }
    }
}
