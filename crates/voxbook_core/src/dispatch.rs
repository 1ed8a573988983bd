//! crates/voxbook_core/src/dispatch.rs
//!
//! Maps a validated `Intent` onto the summarize/quiz/narrate handlers and
//! enforces the per-document caching and append semantics. Also hosts the
//! pipeline front door that turns a raw transcript into an `Intent` via the
//! generative backend.

use crate::domain::{Action, Document, Intent};
use crate::intent::{parse_reply, ParseError};
use crate::ports::{DocumentPatch, DocumentStore, GenerativeTextService, PortError};
use crate::prompts;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A command that could not be carried out. Every variant is reported to the
/// caller; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("could not interpret the reply: {0}")]
    Parse(#[from] ParseError),
    #[error("document {0} not found")]
    DocumentNotFound(u64),
    #[error("document {0} has no content")]
    EmptyContent(u64),
    /// Wraps any failure from the generative backend. Reported, never
    /// retried, no fallback content.
    #[error("generative backend failure: {0}")]
    Backend(#[source] PortError),
    #[error("document store failure: {0}")]
    Store(#[source] PortError),
}

/// Where a returned summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Cached,
    Generated,
}

/// The structured result of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Summary { text: String, source: SummarySource },
    Quiz { text: String },
    Narration { text: String, status: &'static str },
    /// A legitimate outcome meaning "no actionable command detected",
    /// not an error.
    NoAction,
}

/// Dispatches intents against the document store, calling out to the
/// generative backend where a handler needs it.
pub struct Dispatcher {
    store: Arc<dyn DocumentStore>,
    backend: Arc<dyn GenerativeTextService>,
    /// Per-document locks serializing the summary read-generate-write
    /// sequence, so an empty-to-filled transition persists at most one
    /// generated summary. Readers of an already-cached summary never
    /// touch these.
    summary_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn DocumentStore>, backend: Arc<dyn GenerativeTextService>) -> Self {
        Self {
            store,
            backend,
            summary_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The pipeline front door: transcript in, structured outcome out.
    ///
    /// Builds the intent prompt from the transcript plus the current
    /// catalog, makes one backend call, parses the reply, and dispatches.
    pub async fn handle_transcript(&self, transcript: &str) -> Result<Outcome, CommandError> {
        let intent = self.interpret(transcript).await?;
        self.dispatch(&intent).await
    }

    /// Resolves a transcript into an `Intent` via the generative backend.
    pub async fn interpret(&self, transcript: &str) -> Result<Intent, CommandError> {
        let catalog = self.store.list_all().await.map_err(CommandError::Store)?;
        let prompt = prompts::intent_prompt(transcript, &catalog);
        let reply = self
            .backend
            .generate(&prompt)
            .await
            .map_err(CommandError::Backend)?;
        let intent = parse_reply(&reply)?;
        info!(?intent, "interpreted transcript");
        Ok(intent)
    }

    /// Routes a validated intent to its handler.
    pub async fn dispatch(&self, intent: &Intent) -> Result<Outcome, CommandError> {
        match intent.action {
            Action::None => Ok(Outcome::NoAction),
            Action::Summarize => self.summarize(intent.document_id).await,
            Action::Quiz => self.quiz(intent.document_id).await,
            Action::Narrate => self.narrate(intent.document_id).await,
        }
    }

    /// Summary handler: cache-then-generate.
    ///
    /// A cached summary is returned without locking or any backend call.
    /// Otherwise the per-document lock is taken around re-read, the single
    /// backend call, trim, and persist, and held no longer than that.
    async fn summarize(&self, document_id: Option<u64>) -> Result<Outcome, CommandError> {
        let (id, doc) = self.lookup(document_id).await?;
        if doc.has_summary() {
            info!(id, "returning cached summary");
            return Ok(Outcome::Summary {
                text: doc.summary,
                source: SummarySource::Cached,
            });
        }
        if doc.has_empty_content() {
            return Err(CommandError::EmptyContent(id));
        }

        let lock = self.summary_lock_for(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.generate_summary(id).await
        };
        self.release_summary_lock(id, lock).await;
        result
    }

    /// The serialized part of the summary handler: re-read, one backend
    /// call, trim, persist. Callers hold the per-document lock.
    async fn generate_summary(&self, id: u64) -> Result<Outcome, CommandError> {
        // Re-read under the lock: a concurrent call may have filled the
        // cache while this one waited.
        let doc = self.fetch(id).await?;
        if doc.has_summary() {
            info!(id, "summary was generated concurrently, using cache");
            return Ok(Outcome::Summary {
                text: doc.summary,
                source: SummarySource::Cached,
            });
        }

        let reply = self
            .backend
            .generate(&prompts::summary_prompt(&doc.content))
            .await
            .map_err(CommandError::Backend)?;
        let summary = reply.trim().to_string();

        self.store
            .update(
                id,
                DocumentPatch {
                    summary: Some(summary.clone()),
                    ..Default::default()
                },
            )
            .await
            .map_err(CommandError::Store)?;
        info!(id, "generated and cached summary");

        Ok(Outcome::Summary {
            text: summary,
            source: SummarySource::Generated,
        })
    }

    /// Quiz handler: every call generates and appends, never overwrites.
    /// The reply is stored as-is (trimmed); grammar validation is the
    /// consumer's concern, not the generator's.
    async fn quiz(&self, document_id: Option<u64>) -> Result<Outcome, CommandError> {
        let (id, doc) = self.lookup(document_id).await?;
        if doc.has_empty_content() {
            return Err(CommandError::EmptyContent(id));
        }

        let reply = self
            .backend
            .generate(&prompts::quiz_prompt(&doc.content))
            .await
            .map_err(CommandError::Backend)?;
        let quiz = reply.trim().to_string();

        self.store
            .update(
                id,
                DocumentPatch {
                    push_quiz: Some(quiz.clone()),
                    ..Default::default()
                },
            )
            .await
            .map_err(CommandError::Store)?;
        info!(id, "appended generated quiz");

        Ok(Outcome::Quiz { text: quiz })
    }

    /// Narration handler: pure read. No backend call, no mutation.
    async fn narrate(&self, document_id: Option<u64>) -> Result<Outcome, CommandError> {
        let (_, doc) = self.lookup(document_id).await?;
        Ok(Outcome::Narration {
            text: doc.content,
            status: "ready",
        })
    }

    /// Resolves an optional document id, short-circuiting with
    /// `DocumentNotFound` before any store mutation when it is absent or
    /// does not resolve.
    async fn lookup(&self, document_id: Option<u64>) -> Result<(u64, Document), CommandError> {
        let id = document_id.ok_or_else(|| {
            warn!("intent carried no usable document id");
            CommandError::DocumentNotFound(0)
        })?;
        let doc = self.fetch(id).await?;
        Ok((id, doc))
    }

    async fn fetch(&self, id: u64) -> Result<Document, CommandError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(CommandError::Store)?
            .ok_or(CommandError::DocumentNotFound(id))
    }

    async fn summary_lock_for(&self, id: u64) -> Arc<Mutex<()>> {
        let mut locks = self.summary_locks.lock().await;
        locks.entry(id).or_default().clone()
    }

    /// Drops a document's lock entry once no other task holds it, so the
    /// map does not grow with every document ever summarized. The map's
    /// mutex is held across the check, and handing out clones requires
    /// that same mutex, so the count cannot rise concurrently.
    async fn release_summary_lock(&self, id: u64, lock: Arc<Mutex<()>>) {
        let mut locks = self.summary_locks.lock().await;
        // Two references when nobody else waits: the map's and ours.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(&id);
        }
    }
}
