//! crates/voxbook_core/src/quiz.rs
//!
//! The quiz text protocol: the fixed plain-text grammar quiz generation is
//! asked to produce, and the validator a quiz-taking consumer runs over it.
//!
//! Generation never validates its own output (the backend is not
//! contractually bound to the grammar), so a stored quiz may contain blocks
//! that fail here. That is a reportable condition, not an error: validation
//! fails per block, and valid blocks are returned alongside the failures.

/// One of the four option labels a question block may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }
}

/// One validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock {
    pub prompt: String,
    /// Option texts in label order A through D.
    pub options: [String; 4],
    pub correct: OptionLabel,
}

/// Why one question block failed validation. Carries the zero-based block
/// index so a report can point at the offending question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizValidationError {
    #[error("block {block}: missing 'Question:' line")]
    MissingQuestionLine { block: usize },
    #[error("block {block}: found {found} lettered options, need 4")]
    TooFewOptions { block: usize, found: usize },
    #[error("block {block}: option letters out of order or duplicated")]
    DisorderedOptions { block: usize },
    #[error("block {block}: missing 'Correct Answer:' line")]
    MissingCorrectAnswer { block: usize },
    #[error("block {block}: 'Correct Answer: {given}' does not reference a present option")]
    BadCorrectAnswer { block: usize, given: String },
}

/// Validates a generated quiz text against the block grammar.
///
/// Each block is judged independently; one malformed question does not
/// invalidate the others.
pub fn validate_quiz_text(text: &str) -> Vec<Result<QuestionBlock, QuizValidationError>> {
    split_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(index, lines)| validate_block(index, &lines))
        .collect()
}

/// Splits the text into candidate blocks. A block starts at each
/// `Question:` line; any non-empty lines before the first one form a
/// headless block that will fail with `MissingQuestionLine`.
fn split_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("Question:") {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line.to_string());
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn validate_block(
    block: usize,
    lines: &[String],
) -> Result<QuestionBlock, QuizValidationError> {
    let first = lines.first().map(String::as_str).unwrap_or("");
    let prompt = first
        .strip_prefix("Question:")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(QuizValidationError::MissingQuestionLine { block })?;

    // Lettered options in the order they appear.
    let mut labeled: Vec<(OptionLabel, String)> = Vec::new();
    let mut correct_line: Option<String> = None;

    for line in &lines[1..] {
        if let Some(rest) = line.strip_prefix("Correct Answer:") {
            correct_line = Some(rest.trim().to_string());
            continue;
        }
        if let Some((label, option)) = parse_option_line(line) {
            labeled.push((label, option));
        }
    }

    if labeled.len() < 4 {
        return Err(QuizValidationError::TooFewOptions {
            block,
            found: labeled.len(),
        });
    }
    let ordered = labeled
        .iter()
        .map(|(label, _)| *label)
        .eq(OptionLabel::ALL.iter().copied());
    if labeled.len() != 4 || !ordered {
        return Err(QuizValidationError::DisorderedOptions { block });
    }

    let given = correct_line.ok_or(QuizValidationError::MissingCorrectAnswer { block })?;
    let correct = given
        .chars()
        .next()
        .filter(|_| given.len() == 1)
        .and_then(OptionLabel::from_char)
        .ok_or(QuizValidationError::BadCorrectAnswer {
            block,
            given: given.clone(),
        })?;

    let texts: Vec<String> = labeled.into_iter().map(|(_, text)| text).collect();
    let options: [String; 4] = match texts.try_into() {
        Ok(options) => options,
        Err(_) => return Err(QuizValidationError::DisorderedOptions { block }),
    };

    Ok(QuestionBlock {
        prompt: prompt.to_string(),
        options,
        correct,
    })
}

/// Recognizes `A. <option>` (also tolerating `A) <option>`) lines.
fn parse_option_line(line: &str) -> Option<(OptionLabel, String)> {
    let mut chars = line.chars();
    let label = OptionLabel::from_char(chars.next()?)?;
    let sep = chars.next()?;
    if sep != '.' && sep != ')' {
        return None;
    }
    let text = chars.as_str().trim();
    if text.is_empty() {
        return None;
    }
    Some((label, text.to_string()))
}
