//! crates/voxbook_core/src/prompts.rs
//!
//! The literal prompt templates sent to the generative backend. These are
//! contracts: the intent parser and the quiz validator are written against
//! the formats requested here, so the wording must stay in sync with them.

use crate::domain::Document;

/// How many question blocks a generated quiz is expected to contain.
pub const QUESTIONS_PER_QUIZ: usize = 3;

const INTENT_TEMPLATE: &str = r#"You are the command interpreter for a voice-driven reading assistant.

The user said:
"{transcript}"

These are the documents currently in the library:
{catalog}

Decide what the user wants and reply with EXACTLY one bracketed list and nothing else:
[action, book_id, name_match]

Rules:
- action must be one of: summarize, quiz, narrate, none
- book_id is the integer id of the document the user is referring to
- name_match is a single lowercase word from the user's phrasing that helped you pick the document (use none if nothing did)
- If the user's request is not an actionable command, reply [none, 0, none]
- Do not add any explanation, markdown, or extra text around the list."#;

const SUMMARY_TEMPLATE: &str = r#"Summarize the following document in a clear way, using at most 3 sentences. Do not add any extra commentary.

DOCUMENT:
{content}"#;

const QUIZ_TEMPLATE: &str = r#"Write a quiz about the following document. Produce EXACTLY 3 multiple-choice questions. Each question has 4 options and exactly one correct answer. Reply in plain text with no markdown, following this format for every question:

Question: <text>
A. <option>
B. <option>
C. <option>
D. <option>
Correct Answer: <A|B|C|D>

DOCUMENT:
{content}"#;

/// Builds the intent-interpretation prompt from a transcript and the current
/// document catalog (id + name per document).
pub fn intent_prompt(transcript: &str, catalog: &[Document]) -> String {
    let listing = if catalog.is_empty() {
        "(the library is empty)".to_string()
    } else {
        catalog
            .iter()
            .map(|doc| format!("- id {}: {}", doc.id, doc.name))
            .collect::<Vec<_>>()
            .join("\n")
    };
    INTENT_TEMPLATE
        .replace("{transcript}", transcript)
        .replace("{catalog}", &listing)
}

/// Builds the summary prompt around the full document content.
pub fn summary_prompt(content: &str) -> String {
    SUMMARY_TEMPLATE.replace("{content}", content)
}

/// Builds the quiz prompt around the full document content.
pub fn quiz_prompt(content: &str) -> String {
    QUIZ_TEMPLATE.replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(id: u64, name: &str) -> Document {
        Document {
            id,
            name: name.to_string(),
            content: String::new(),
            summary: String::new(),
            quizzes: Vec::new(),
            attempts: Vec::new(),
            source_location: String::new(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn intent_prompt_embeds_transcript_and_catalog() {
        let prompt = intent_prompt("read me the space book", &[doc(1, "Space"), doc(4, "Oceans")]);
        assert!(prompt.contains("read me the space book"));
        assert!(prompt.contains("- id 1: Space"));
        assert!(prompt.contains("- id 4: Oceans"));
        assert!(prompt.contains("[action, book_id, name_match]"));
    }

    #[test]
    fn intent_prompt_handles_empty_catalog() {
        let prompt = intent_prompt("hello", &[]);
        assert!(prompt.contains("(the library is empty)"));
    }

    #[test]
    fn summary_prompt_asks_for_three_sentences() {
        let prompt = summary_prompt("Photosynthesis converts light...");
        assert!(prompt.contains("at most 3 sentences"));
        assert!(prompt.contains("Photosynthesis converts light..."));
    }

    #[test]
    fn quiz_prompt_carries_the_literal_block_format() {
        let prompt = quiz_prompt("some content");
        assert!(prompt.contains("EXACTLY 3 multiple-choice questions"));
        assert!(prompt.contains("Question: <text>"));
        assert!(prompt.contains("Correct Answer: <A|B|C|D>"));
        assert!(prompt.contains("no markdown"));
    }
}
