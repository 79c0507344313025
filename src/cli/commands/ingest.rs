//! Ingest command implementation.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use crate::models::{Config, Document, ImportDocument};
use crate::services::{
    EmbeddingClient, QdrantIndex, TextChunker, VectorIndex, build_records, upload_records,
};
use crate::utils::retry::RetryConfig;

/// Arguments for the ingest command.
#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Path to a JSON array of {user_input, ai_response} objects (use - for stdin)
    #[arg()]
    pub file: Option<PathBuf>,

    /// Only validate the input file without indexing
    #[arg(long)]
    pub validate_only: bool,
}

/// Handle the ingest command.
pub async fn handle_ingest(args: IngestArgs, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let start_time = Instant::now();

    let input = read_input(args.file.as_deref())?;
    let import_docs: Vec<ImportDocument> =
        serde_json::from_str(input.trim()).context("failed to parse JSON input")?;

    if import_docs.is_empty() {
        println!("No documents found in input.");
        return Ok(());
    }

    // Entries without a usable response carry nothing to index
    let mut skipped = 0usize;
    let documents: Vec<Document> = import_docs
        .into_iter()
        .filter_map(|doc| {
            if doc.has_response() {
                Some(Document::new(
                    doc.user_input,
                    doc.ai_response.unwrap_or_default(),
                ))
            } else {
                skipped += 1;
                None
            }
        })
        .collect();

    if verbose || args.validate_only {
        println!(
            "Found {} documents to ingest ({} skipped)",
            documents.len(),
            skipped
        );
    }

    if args.validate_only {
        println!("Validation successful: {} documents ready", documents.len());
        return Ok(());
    }

    let embedding_client =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    let index = QdrantIndex::new(&config.index, u64::from(config.embedding.dimension))
        .context("failed to create index client")?;

    index
        .ensure_collection()
        .await
        .context("failed to ensure collection exists")?;

    let chunker = TextChunker::from_config(&config.chunking);

    // An embedding failure here aborts the whole run; upsert failures
    // below are isolated per batch.
    let mut records = Vec::new();
    for document in &documents {
        let document_records = build_records(&embedding_client, &chunker, document)
            .await
            .with_context(|| format!("failed to embed document '{}'", document.id))?;
        records.extend(document_records);
    }

    let total_chunks = records.len();
    let retry = RetryConfig::new(config.index.max_attempts);
    let report = upload_records(
        &index,
        records,
        config.index.upload_batch_size as usize,
        &retry,
    )
    .await;

    let duration_ms = start_time.elapsed().as_millis();
    println!(
        "Ingested {} documents ({} chunks) in {}ms",
        documents.len(),
        total_chunks,
        duration_ms
    );
    println!(
        "Batches: {} submitted, {} failed, {} records uploaded",
        report.batches_submitted, report.batches_failed, report.records_uploaded
    );

    for (batch_no, error) in &report.failures {
        eprintln!("Batch {batch_no} failed: {error}");
    }

    Ok(())
}

/// Read input from file or stdin.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.to_string_lossy() != "-" => {
            std::fs::read_to_string(path).context("failed to read file")
        }
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
