//! Prompt composition — persona messages plus one synthesized task message.
//!
//! The construction order is fixed and must stay fixed:
//!
//! 1. each persona instruction, as its own system message, in declared order
//! 2. sources block (header line + `"<title> - <body>"` per source)
//! 3. topic line
//! 4. style sentence (empty for neutral)
//! 5. the task framing around the (already trimmed) draft body
//!
//! Steps 2–5 merge into a single trailing system message, so the sequence
//! always has exactly `persona.len() + 1` messages. Keeping the persona
//! messages untouched and the task in one message is what lets the
//! generation ladder retry a different model tier with the identical
//! sequence.

use crate::ops::OperationSpec;
use writebuddy_core::{Draft, PromptMessage, StyleDirective};

const SOURCES_HEADER: &str = "Here are the sources your partner wants to draw on:\n";

/// Compose the full message sequence for one operation.
///
/// Infallible on valid inputs: absent optional fields are simply omitted
/// from the synthesized task message. Byte-deterministic.
pub fn compose(spec: &OperationSpec, draft: &Draft, style: StyleDirective) -> Vec<PromptMessage> {
    let mut messages: Vec<PromptMessage> = spec
        .persona
        .iter()
        .map(|instruction| PromptMessage::system(*instruction))
        .collect();

    let mut task = String::new();

    if !draft.sources.is_empty() {
        task.push_str(SOURCES_HEADER);
        for source in &draft.sources {
            task.push_str(&source.title);
            task.push_str(" - ");
            task.push_str(&source.body);
            task.push('\n');
        }
    }

    if let Some(topic) = &draft.topic {
        task.push_str(&format!(
            "Here is what your partner is writing about: \"{topic}\"\n"
        ));
    }

    task.push_str(style.instruction());
    task.push_str(&spec.task_text(&draft.body));

    messages.push(PromptMessage::system(task));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operation;
    use writebuddy_core::Source;

    fn full_draft() -> Draft {
        Draft::new("I went to the")
            .with_topic("a camping trip")
            .with_sources(vec![
                Source {
                    title: "Park brochure".into(),
                    body: "The park closes at dusk".into(),
                },
                Source {
                    title: "Diary".into(),
                    body: "We left on Friday".into(),
                },
            ])
    }

    #[test]
    fn sequence_length_is_persona_plus_one() {
        for op in [
            Operation::Assist,
            Operation::Improve,
            Operation::Formalize,
            Operation::Niceify,
        ] {
            let spec = op.spec();
            let messages = compose(spec, &full_draft(), StyleDirective::Neutral);
            assert_eq!(messages.len(), spec.persona.len() + 1);
        }
    }

    #[test]
    fn task_only_ops_have_exactly_one_message() {
        let messages = compose(
            Operation::Formalize.spec(),
            &Draft::new("hello"),
            StyleDirective::Neutral,
        );
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn composition_is_deterministic() {
        let a = compose(Operation::Assist.spec(), &full_draft(), StyleDirective::Formal);
        let b = compose(Operation::Assist.spec(), &full_draft(), StyleDirective::Formal);
        assert_eq!(a, b);
    }

    #[test]
    fn persona_precedes_task() {
        let messages = compose(Operation::Assist.spec(), &full_draft(), StyleDirective::Neutral);
        let spec = Operation::Assist.spec();
        for (i, instruction) in spec.persona.iter().enumerate() {
            assert_eq!(messages[i].content, *instruction);
        }
        assert!(messages.last().unwrap().content.contains("I went to the"));
    }

    #[test]
    fn sources_render_in_order_with_title_dash_body() {
        let messages = compose(Operation::Assist.spec(), &full_draft(), StyleDirective::Neutral);
        let task = &messages.last().unwrap().content;

        let brochure = task.find("Park brochure - The park closes at dusk").unwrap();
        let diary = task.find("Diary - We left on Friday").unwrap();
        assert!(brochure < diary);
        assert!(task.starts_with(SOURCES_HEADER));
    }

    #[test]
    fn topic_follows_sources() {
        let messages = compose(Operation::Assist.spec(), &full_draft(), StyleDirective::Neutral);
        let task = &messages.last().unwrap().content;
        let sources = task.find("Park brochure").unwrap();
        let topic = task
            .find("Here is what your partner is writing about: \"a camping trip\"")
            .unwrap();
        assert!(sources < topic);
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let messages = compose(
            Operation::Assist.spec(),
            &Draft::new("just text"),
            StyleDirective::Neutral,
        );
        let task = &messages.last().unwrap().content;
        assert!(!task.contains("writing about"));
        assert!(!task.contains(SOURCES_HEADER));
        assert_eq!(*task, "Now, your partner is writing: \"just text\"");
    }

    #[test]
    fn style_sentence_sits_between_topic_and_framing() {
        let messages = compose(
            Operation::Assist.spec(),
            &Draft::new("text").with_topic("t"),
            StyleDirective::Formal,
        );
        let task = &messages.last().unwrap().content;
        let topic = task.find("writing about").unwrap();
        let style = task.find(StyleDirective::Formal.instruction()).unwrap();
        let framing = task.find("Now, your partner is writing").unwrap();
        assert!(topic < style && style < framing);
    }

    #[test]
    fn neutral_style_adds_nothing() {
        let with_neutral = compose(
            Operation::Formalize.spec(),
            &Draft::new("text"),
            StyleDirective::Neutral,
        );
        assert_eq!(
            with_neutral[0].content,
            "Please formalize the following text: \"text\""
        );
    }
}
