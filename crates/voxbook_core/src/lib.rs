pub mod catalog;
pub mod dispatch;
pub mod domain;
pub mod intent;
pub mod ports;
pub mod prompts;
pub mod quiz;

pub use dispatch::{CommandError, Dispatcher, Outcome, SummarySource};
pub use domain::{Action, Document, Intent, QuizAttempt};
pub use intent::{parse_reply, ParseError};
pub use ports::{
    DocumentPatch, DocumentStore, GenerativeTextService, PortError, PortResult,
    TextExtractionService,
};
pub use quiz::{validate_quiz_text, OptionLabel, QuestionBlock, QuizValidationError};
