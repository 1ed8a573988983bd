//! crates/voxbook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or transport format;
//! serde derives exist only because the catalog is persisted as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ingested document (a "book") with its generated artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Positive, unique, assigned as `max(existing ids) + 1`. Never reused
    /// after deletion.
    pub id: u64,
    /// Derived from the first non-empty line of the extracted text, or a
    /// `"Document {id}"` placeholder when extraction yields nothing.
    pub name: String,
    /// Full extracted text. Immutable after creation.
    pub content: String,
    /// Empty until first generated. Once non-empty it is a durable cache and
    /// is never regenerated automatically.
    #[serde(default)]
    pub summary: String,
    /// Previously generated quiz texts, oldest first. Append-only.
    #[serde(default)]
    pub quizzes: Vec<String>,
    /// Reserved for future quiz-taking sessions. Preserved, never written
    /// by the pipeline.
    #[serde(default)]
    pub attempts: Vec<QuizAttempt>,
    /// Opaque reference to the stored original file.
    pub source_location: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// True when a summary has been generated and cached for this document.
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    /// True when extraction produced no usable text.
    pub fn has_empty_content(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A recorded quiz-taking session. Reserved for a future feature; the
/// pipeline only guarantees the field round-trips through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Index into the document's `quizzes` sequence.
    pub quiz_index: usize,
    pub answers: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Derives a document's display name from its extracted text.
///
/// The first non-empty line wins; whitespace-only extraction falls back to a
/// placeholder built from the assigned id.
pub fn derive_name(content: &str, id: u64) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Document {}", id))
}

/// The command a transcript resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Summarize,
    Quiz,
    Narrate,
    /// No actionable command detected. Unrecognized tokens also land here;
    /// the dispatcher treats both identically.
    None,
}

impl Action {
    /// Maps a lower-cased reply token onto an action. Anything outside the
    /// known set degrades to `Action::None` rather than failing the parse.
    pub fn from_token(token: &str) -> Self {
        match token {
            "summarize" => Action::Summarize,
            "quiz" => Action::Quiz,
            "narrate" => Action::Narrate,
            _ => Action::None,
        }
    }
}

/// A structured command derived from a natural-language transcript via the
/// generative backend. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub action: Action,
    /// Absent when the reply's id token was not purely numeric. Downstream
    /// treats absence as "document not found", not as a parse error.
    pub document_id: Option<u64>,
    /// Free-text chapter fragment. Parsed but consumed by no handler; the
    /// handlers always operate on whole-document content.
    pub chapter_hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_name_takes_first_non_empty_line() {
        let text = "\n\n  Photosynthesis Basics  \nChapter 1\n";
        assert_eq!(derive_name(text, 4), "Photosynthesis Basics");
    }

    #[test]
    fn derive_name_falls_back_to_placeholder() {
        assert_eq!(derive_name("", 7), "Document 7");
        assert_eq!(derive_name("   \n\t\n", 12), "Document 12");
    }

    #[test]
    fn unknown_action_tokens_become_none() {
        assert_eq!(Action::from_token("summarize"), Action::Summarize);
        assert_eq!(Action::from_token("quiz"), Action::Quiz);
        assert_eq!(Action::from_token("narrate"), Action::Narrate);
        assert_eq!(Action::from_token("none"), Action::None);
        assert_eq!(Action::from_token("explode"), Action::None);
    }
}
