//! crates/voxbook_core/src/catalog.rs
//!
//! Document lifecycle operations: ingestion, listing, and deletion. The
//! store owns id assignment; this module owns the extraction step and the
//! surrounding logging.

use crate::domain::Document;
use crate::ports::{DocumentStore, PortResult, TextExtractionService};
use std::sync::Arc;
use tracing::info;

/// Ingests a raw uploaded file: extracts its text and inserts a new
/// document. The store assigns the id and derives the display name, both
/// atomically with respect to concurrent ingestions.
pub async fn ingest(
    store: &Arc<dyn DocumentStore>,
    extractor: &Arc<dyn TextExtractionService>,
    data: &[u8],
    source_location: &str,
) -> PortResult<Document> {
    let content = extractor.extract(data).await?;
    let doc = store
        .insert(content, source_location.to_string())
        .await?;
    info!(id = doc.id, name = %doc.name, "ingested document");
    Ok(doc)
}

/// Lists the catalog, oldest id first.
pub async fn list(store: &Arc<dyn DocumentStore>) -> PortResult<Vec<Document>> {
    let mut docs = store.list_all().await?;
    docs.sort_by_key(|d| d.id);
    Ok(docs)
}

/// Deletes one document. Returns whether anything was removed. Ids are
/// never reused afterwards.
pub async fn remove(store: &Arc<dyn DocumentStore>, id: u64) -> PortResult<bool> {
    let removed = store.delete_by_id(id).await?;
    if removed {
        info!(id, "deleted document");
    }
    Ok(removed)
}

/// Truncates the whole catalog.
pub async fn clear(store: &Arc<dyn DocumentStore>) -> PortResult<()> {
    store.delete_all().await?;
    info!("cleared document catalog");
    Ok(())
}
