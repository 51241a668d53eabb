//! The operation table — one declarative spec per writing capability.
//!
//! Each `OperationSpec` binds persona instructions to a task directive and
//! a framing for the user's text. The handlers in the gateway are thin:
//! they pick an operation, hand the request to the engine, and shape the
//! reply. All per-operation behavior lives in this table, not in routes.

use writebuddy_core::ModelTier;

/// How the user's draft body is wrapped inside the task message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFraming {
    /// "Your partner is writing X" — the model returns only the delta
    /// continuation, never a restatement of the input.
    Continue,
    /// "Here is the text" — the model echoes the full rewritten text.
    Rewrite,
    /// The draft body is sent as-is, with no directive around it.
    Verbatim,
}

/// A compile-time-fixed description of one capability.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    /// System-level sentences establishing the assistant's role, sent
    /// ahead of task content in declared order. May be empty.
    pub persona: &'static [&'static str],

    /// The task directive prefixed to the framed draft body.
    pub directive: &'static str,

    /// How the draft body is framed after the directive.
    pub framing: TaskFraming,

    /// Which ladder rung this operation enters at.
    pub entry_tier: ModelTier,
}

impl OperationSpec {
    /// Render the task portion of the prompt for a given draft body.
    pub fn task_text(&self, body: &str) -> String {
        match self.framing {
            TaskFraming::Continue => {
                format!("{}Now, your partner is writing: \"{}\"", self.directive, body)
            }
            TaskFraming::Rewrite => {
                format!("{}\"{}\"", self.directive, body)
            }
            TaskFraming::Verbatim => body.to_string(),
        }
    }
}

/// The writing-partner persona shared by the Assist and Improve operations.
const WRITING_PARTNER_PERSONA: &[&str] = &[
    "You are a writing assistant. Your job is to collaborate with a human \
     partner in writing text, making their experience more efficient. Assist \
     them by suggesting ideas, completing sentences, and providing \
     context-appropriate phrases. Be mindful of grammar and coherence while \
     maintaining a conversational tone. Always aim to understand the user's \
     intention and provide relevant, helpful, and creative input. Try to \
     match the human's tone so far and remember, your goal is to make \
     writing easier by working together.",
    "In the next message, you will be given a part of the text the human is \
     writing. It could be a sentence, a word, or even just a single letter. \
     Based on that input, do your best to guess what the human wants to \
     write and provide a suitable continuation. Note that you should only \
     return the continuation you thought of, not any of the already written \
     text.",
];

const ASSIST: OperationSpec = OperationSpec {
    persona: WRITING_PARTNER_PERSONA,
    directive: "",
    framing: TaskFraming::Continue,
    entry_tier: ModelTier::Primary,
};

const IMPROVE: OperationSpec = OperationSpec {
    persona: WRITING_PARTNER_PERSONA,
    directive: "First, silently improve the text you are given, then \
                continue it. Return the full improved text followed by your \
                continuation, not just the continuation. ",
    framing: TaskFraming::Continue,
    entry_tier: ModelTier::Primary,
};

const FORMALIZE: OperationSpec = OperationSpec {
    persona: &[],
    directive: "Please formalize the following text: ",
    framing: TaskFraming::Rewrite,
    entry_tier: ModelTier::Primary,
};

const NICEIFY: OperationSpec = OperationSpec {
    persona: &[],
    directive: "Please improve the flow and quality of the following text: ",
    framing: TaskFraming::Rewrite,
    entry_tier: ModelTier::Primary,
};

// Free-ask is already on the cheapest tier, so there is no ladder to
// descend; it enters at Fallback and stays there.
const FREE_ASK: OperationSpec = OperationSpec {
    persona: &[],
    directive: "",
    framing: TaskFraming::Verbatim,
    entry_tier: ModelTier::Fallback,
};

/// The writing capabilities exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Continue the draft; return only the continuation.
    Assist,
    /// Silently improve the draft, then continue it; return the full text.
    Improve,
    /// Rewrite the draft formally.
    Formalize,
    /// Rewrite the draft for flow and quality.
    Niceify,
    /// Send the raw text as a free-form instruction.
    FreeAsk,
}

impl Operation {
    /// Look up the compile-time spec for this operation.
    pub fn spec(self) -> &'static OperationSpec {
        match self {
            Self::Assist => &ASSIST,
            Self::Improve => &IMPROVE,
            Self::Formalize => &FORMALIZE,
            Self::Niceify => &NICEIFY,
            Self::FreeAsk => &FREE_ASK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Assist => "assist",
            Self::Improve => "improve",
            Self::Formalize => "formalize",
            Self::Niceify => "niceify",
            Self::FreeAsk => "ask",
        }
    }
}
