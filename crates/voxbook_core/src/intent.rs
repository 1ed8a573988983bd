//! crates/voxbook_core/src/intent.rs
//!
//! Turns the generative backend's raw reply into a structured `Intent`.
//!
//! The backend is instructed to answer with exactly `[action, book_id,
//! name_match]`, but nothing holds it to that: replies arrive wrapped in
//! prose, markdown fencing, or stray punctuation. The parser is permissive
//! at the lexical level (tolerant character stripping) and strict at the
//! structural level (bracket presence, minimum field count). Malformed
//! structure fails the parse; malformed individual fields degrade to
//! "absent" instead.

use crate::domain::{Action, Intent};

/// An unrecoverable parse failure: the reply carries no usable intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("reply contains no bracketed list")]
    NoBracketedList,
    #[error("bracketed list has fewer than 3 fields")]
    InsufficientFields,
}

/// Parses a raw backend reply into an `Intent`.
pub fn parse_reply(reply: &str) -> Result<Intent, ParseError> {
    let inner = bracketed_span(reply).ok_or(ParseError::NoBracketedList)?;

    // Defends against punctuation, quotes, or markdown wrapped around the
    // list items.
    let cleaned: String = inner
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ',' || c.is_whitespace())
        .collect();

    let tokens: Vec<String> = cleaned
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() < 3 {
        return Err(ParseError::InsufficientFields);
    }

    Ok(Intent {
        action: Action::from_token(&tokens[0]),
        document_id: parse_document_id(&tokens[1]),
        chapter_hint: parse_chapter_hint(&tokens[2]),
    })
}

/// Extracts the inner text of the first matching pair of square brackets.
fn bracketed_span(reply: &str) -> Option<&str> {
    let open = reply.find('[')?;
    let close = reply[open + 1..].find(']')?;
    Some(&reply[open + 1..open + 1 + close])
}

/// Parses a document id token. Only purely numeric, non-negative tokens
/// resolve; anything else is absent, which downstream reports as "document
/// not found" rather than a parse error.
fn parse_document_id(token: &str) -> Option<u64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Keeps a chapter hint only when the token is purely alphabetic.
fn parse_chapter_hint(token: &str) -> Option<String> {
    if !token.is_empty() && token.chars().all(char::is_alphabetic) {
        Some(token.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_triple_parses() {
        let intent = parse_reply("Sure! [summarize, 3, one]").unwrap();
        assert_eq!(intent.action, Action::Summarize);
        assert_eq!(intent.document_id, Some(3));
        assert_eq!(intent.chapter_hint.as_deref(), Some("one"));
    }

    #[test]
    fn tokens_are_lowercased_and_stripped() {
        let intent = parse_reply("```[QUIZ, \"12\", 'Intro']```").unwrap();
        assert_eq!(intent.action, Action::Quiz);
        assert_eq!(intent.document_id, Some(12));
        assert_eq!(intent.chapter_hint.as_deref(), Some("intro"));
    }

    #[test]
    fn missing_brackets_fail() {
        assert_eq!(
            parse_reply("summarize, 3, one").unwrap_err(),
            ParseError::NoBracketedList
        );
        assert_eq!(parse_reply("").unwrap_err(), ParseError::NoBracketedList);
        assert_eq!(
            parse_reply("only an opening [ here").unwrap_err(),
            ParseError::NoBracketedList
        );
    }

    #[test]
    fn fewer_than_three_tokens_fail() {
        assert_eq!(
            parse_reply("[summarize, 3]").unwrap_err(),
            ParseError::InsufficientFields
        );
        assert_eq!(
            parse_reply("[,,]").unwrap_err(),
            ParseError::InsufficientFields
        );
    }

    #[test]
    fn first_matching_bracket_pair_wins() {
        let intent = parse_reply("[narrate, 5, none] ignore [quiz, 9, x]").unwrap();
        assert_eq!(intent.action, Action::Narrate);
        assert_eq!(intent.document_id, Some(5));
    }

    #[test]
    fn document_id_requires_pure_digits() {
        assert_eq!(parse_document_id("7"), Some(7));
        assert_eq!(parse_document_id("0"), Some(0));
        assert_eq!(parse_document_id("seven"), None);
        assert_eq!(parse_document_id("-1"), None);
        assert_eq!(parse_document_id("3a"), None);
        assert_eq!(parse_document_id(""), None);
    }

    #[test]
    fn non_numeric_id_degrades_to_absent() {
        let intent = parse_reply("[summarize, seven, one]").unwrap();
        assert_eq!(intent.action, Action::Summarize);
        assert_eq!(intent.document_id, None);
    }

    #[test]
    fn non_alphabetic_hint_degrades_to_absent() {
        let intent = parse_reply("[quiz, 2, chapter3]").unwrap();
        assert_eq!(intent.chapter_hint, None);
    }

    #[test]
    fn unrecognized_action_maps_to_none() {
        let intent = parse_reply("[dance, 1, intro]").unwrap();
        assert_eq!(intent.action, Action::None);
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let intent = parse_reply("[quiz, 4, intro, extra, stuff]").unwrap();
        assert_eq!(intent.action, Action::Quiz);
        assert_eq!(intent.document_id, Some(4));
        assert_eq!(intent.chapter_hint.as_deref(), Some("intro"));
    }
}
