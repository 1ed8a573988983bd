//! services/engine/src/bin/engine.rs
//!
//! The process entry point. Owns the lifecycle of the document store and
//! the adapters, wires them into the dispatcher, and runs a console loop:
//! library commands manage documents, anything else is treated as a spoken
//! transcript and fed through the command pipeline.

use engine_lib::{
    adapters::{extract::PlainTextExtractor, llm::OpenAiGenAdapter, store::JsonFileStore},
    config::Config,
    error::EngineError,
};
use async_openai::{config::OpenAIConfig, Client};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxbook_core::{
    catalog,
    dispatch::{Dispatcher, Outcome},
    ports::{DocumentStore, TextExtractionService},
};

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting engine...");

    // --- 2. Open the Document Catalog ---
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::open(&config.library_path).await?);
    info!("Catalog opened at {}", config.library_path.display());

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| EngineError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);
    let backend = Arc::new(OpenAiGenAdapter::new(
        openai_client,
        config.gen_model.clone(),
    ));
    let extractor: Arc<dyn TextExtractionService> = Arc::new(PlainTextExtractor);

    // --- 4. Build the Dispatcher ---
    let dispatcher = Dispatcher::new(store.clone(), backend);

    println!("voxbook engine ready.");
    println!("Commands: add <file>, list, delete <id>, clear, quit.");
    println!("Anything else is interpreted as a spoken command.");

    // --- 5. Run the Console Loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b.trim())) {
            ("quit", _) | ("exit", _) => break,
            ("add", path) if !path.is_empty() => {
                if let Err(e) = add_document(&config, &store, &extractor, path).await {
                    error!("Failed to ingest {}: {}", path, e);
                }
            }
            ("list", _) => match catalog::list(&store).await {
                Ok(docs) if docs.is_empty() => println!("(the library is empty)"),
                Ok(docs) => {
                    for doc in docs {
                        println!(
                            "{:>4}  {}  (summary: {}, quizzes: {})",
                            doc.id,
                            doc.name,
                            if doc.has_summary() { "cached" } else { "none" },
                            doc.quizzes.len()
                        );
                    }
                }
                Err(e) => error!("Failed to list documents: {}", e),
            },
            ("delete", id) => match id.parse::<u64>() {
                Ok(id) => match catalog::remove(&store, id).await {
                    Ok(true) => println!("Deleted document {}.", id),
                    Ok(false) => println!("No document with id {}.", id),
                    Err(e) => error!("Failed to delete document {}: {}", id, e),
                },
                Err(_) => println!("Usage: delete <id>"),
            },
            ("clear", _) => match catalog::clear(&store).await {
                Ok(()) => println!("Library cleared."),
                Err(e) => error!("Failed to clear the library: {}", e),
            },
            _ => match dispatcher.handle_transcript(line).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => println!("Error: {}", e),
            },
        }
    }

    info!("Engine shutting down.");
    Ok(())
}

/// Reads an upload, keeps a copy under the upload directory, and ingests it.
async fn add_document(
    config: &Config,
    store: &Arc<dyn DocumentStore>,
    extractor: &Arc<dyn TextExtractionService>,
    path: &str,
) -> Result<(), EngineError> {
    let data = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("untitled.txt")
        .to_string();
    let stored = config.upload_dir.join(&file_name);
    tokio::fs::write(&stored, &data).await?;

    let doc = catalog::ingest(store, extractor, &data, &file_name).await?;
    println!("Added document {} ({}).", doc.id, doc.name);
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Summary { text, source } => {
            println!("[summary, {:?}]\n{}", source, text);
        }
        Outcome::Quiz { text } => {
            println!("[quiz]\n{}", text);
        }
        Outcome::Narration { text, status } => {
            println!("[narration, {}]\n{}", status, text);
        }
        Outcome::NoAction => {
            println!("No actionable command detected.");
        }
    }
}
