pub mod extract;
pub mod llm;
pub mod store;

pub use extract::PlainTextExtractor;
pub use llm::OpenAiGenAdapter;
pub use store::JsonFileStore;
