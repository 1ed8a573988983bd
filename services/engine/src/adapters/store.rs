//! services/engine/src/adapters/store.rs
//!
//! This module contains the document store adapter, the concrete
//! implementation of the `DocumentStore` port. The catalog lives in memory
//! behind a `tokio::sync::RwLock` and is mirrored to a single JSON file on
//! every mutation, so a restart picks up where the last run left off.
//!
//! Id assignment uses a persisted high-water mark, not the maximum live id:
//! deleting documents (or clearing the catalog) never lowers the next
//! assigned id, so a stale reference can never silently resolve to a newer
//! document.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use voxbook_core::domain::{derive_name, Document};
use voxbook_core::ports::{DocumentPatch, DocumentStore, PortError, PortResult};

//=========================================================================================
// The On-Disk Catalog Shape
//=========================================================================================

/// The catalog as serialized to disk: the documents plus the id high-water
/// mark that outlives them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Catalog {
    /// The next id to assign. Monotonic; never lowered by deletion.
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    documents: Vec<Document>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A document store persisted as one JSON catalog file.
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Catalog>,
}

impl JsonFileStore {
    /// Opens the catalog at `path`, loading any existing documents. A
    /// missing file is an empty catalog, not an error.
    pub async fn open(path: impl AsRef<Path>) -> PortResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut catalog: Catalog = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| PortError::Unexpected(format!("corrupt catalog file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Catalog::default(),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        // Never assign below what the live documents already use, even if
        // the stored mark is missing or behind.
        let max_live = catalog.documents.iter().map(|d| d.id).max().unwrap_or(0);
        catalog.next_id = catalog.next_id.max(max_live + 1);
        Ok(Self {
            path,
            state: RwLock::new(catalog),
        })
    }

    /// Writes a candidate catalog to disk. Callers commit the candidate to
    /// memory only after this succeeds, so memory and disk cannot diverge
    /// on the error branch.
    async fn persist(&self, catalog: &Catalog) -> PortResult<()> {
        let bytes = serde_json::to_vec_pretty(catalog)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to persist catalog: {}", e)))
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn insert(&self, content: String, source_location: String) -> PortResult<Document> {
        let mut state = self.state.write().await;
        // Id assignment happens under the write lock, so concurrent inserts
        // cannot observe the same high-water mark.
        let id = state.next_id;
        let doc = Document {
            id,
            name: derive_name(&content, id),
            content,
            summary: String::new(),
            quizzes: Vec::new(),
            attempts: Vec::new(),
            source_location,
            uploaded_at: Utc::now(),
        };

        let mut candidate = state.clone();
        candidate.next_id = id + 1;
        candidate.documents.push(doc.clone());
        self.persist(&candidate).await?;
        *state = candidate;
        Ok(doc)
    }

    async fn get_by_id(&self, id: u64) -> PortResult<Option<Document>> {
        Ok(self
            .state
            .read()
            .await
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn update(&self, id: u64, patch: DocumentPatch) -> PortResult<()> {
        let mut state = self.state.write().await;
        let mut candidate = state.clone();
        let doc = candidate
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", id)))?;
        if let Some(summary) = patch.summary {
            doc.summary = summary;
        }
        if let Some(quiz) = patch.push_quiz {
            doc.quizzes.push(quiz);
        }
        self.persist(&candidate).await?;
        *state = candidate;
        Ok(())
    }

    async fn delete_by_id(&self, id: u64) -> PortResult<bool> {
        let mut state = self.state.write().await;
        let mut candidate = state.clone();
        let before = candidate.documents.len();
        candidate.documents.retain(|d| d.id != id);
        if candidate.documents.len() == before {
            return Ok(false);
        }
        self.persist(&candidate).await?;
        *state = candidate;
        Ok(true)
    }

    async fn delete_all(&self) -> PortResult<()> {
        let mut state = self.state.write().await;
        // Truncation keeps the high-water mark; ids are never reissued.
        let candidate = Catalog {
            next_id: state.next_id,
            documents: Vec::new(),
        };
        self.persist(&candidate).await?;
        *state = candidate;
        Ok(())
    }

    async fn list_all(&self) -> PortResult<Vec<Document>> {
        Ok(self.state.read().await.documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("books.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let a = store.insert("First\nbody".into(), "a.txt".into()).await.unwrap();
        let b = store.insert("Second".into(), "b.txt".into()).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.name, "First");
    }

    #[tokio::test]
    async fn deleting_the_highest_id_never_lowers_the_next() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let a = store.insert("one".into(), "1".into()).await.unwrap();
        let b = store.insert("two".into(), "2".into()).await.unwrap();
        assert!(store.delete_by_id(b.id).await.unwrap());

        let c = store.insert("three".into(), "3".into()).await.unwrap();
        assert_ne!(c.id, b.id);
        assert_eq!(a.id, 1);
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn ids_are_not_reissued_after_delete_all() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let a = store.insert("one".into(), "1".into()).await.unwrap();
        store.delete_all().await.unwrap();

        let b = store.insert("two".into(), "2".into()).await.unwrap();
        assert_ne!(b.id, a.id);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn high_water_mark_survives_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.insert("one".into(), "1".into()).await.unwrap();
            let b = store.insert("two".into(), "2".into()).await.unwrap();
            assert!(store.delete_by_id(b.id).await.unwrap());
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let c = reopened.insert("three".into(), "3".into()).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn empty_extraction_gets_placeholder_name() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let doc = store.insert("  \n ".into(), "blank.txt".into()).await.unwrap();
        assert_eq!(doc.name, "Document 1");
    }

    #[tokio::test]
    async fn patches_apply_summary_and_append_quizzes() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let doc = store.insert("text".into(), "t".into()).await.unwrap();

        store
            .update(
                doc.id,
                DocumentPatch {
                    summary: Some("a summary".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update(
                doc.id,
                DocumentPatch {
                    push_quiz: Some("quiz one".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update(
                doc.id,
                DocumentPatch {
                    push_quiz: Some("quiz two".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let doc = store.get_by_id(doc.id).await.unwrap().unwrap();
        assert_eq!(doc.summary, "a summary");
        assert_eq!(doc.quizzes, vec!["quiz one", "quiz two"]);
    }

    #[tokio::test]
    async fn updating_a_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let err = store
            .update(9, DocumentPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn catalog_survives_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            let doc = store
                .insert("Persist me\nbody".into(), "p.txt".into())
                .await
                .unwrap();
            store
                .update(
                    doc.id,
                    DocumentPatch {
                        summary: Some("kept".into()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let docs = reopened.list_all().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "Persist me");
        assert_eq!(docs[0].summary, "kept");
    }

    #[tokio::test]
    async fn delete_all_truncates_the_catalog() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store.insert("one".into(), "1".into()).await.unwrap();
        store.insert("two".into(), "2".into()).await.unwrap();

        store.delete_all().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(!store.delete_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn failed_persist_leaves_memory_and_ids_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let doc = store.insert("kept\nbody".into(), "k.txt".into()).await.unwrap();

        // Removing the directory makes every subsequent write fail.
        drop(dir);

        let err = store
            .update(
                doc.id,
                DocumentPatch {
                    summary: Some("lost".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(err.is_err());
        let unchanged = store.get_by_id(doc.id).await.unwrap().unwrap();
        assert!(unchanged.summary.is_empty());

        assert!(store.insert("never".into(), "n.txt".into()).await.is_err());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
