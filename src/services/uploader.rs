//! Record building and batched upload with per-batch failure isolation.

use crate::error::EmbeddingError;
use crate::models::{ChunkRecord, Document};
use crate::services::{Embedder, TextChunker, VectorIndex};
use crate::utils::retry::{RetryConfig, with_retry};

/// Outcome of an upload run.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub batches_submitted: usize,
    pub batches_failed: usize,
    pub records_uploaded: usize,
    /// 1-based batch number and the error it failed with.
    pub failures: Vec<(usize, String)>,
}

/// Chunk a document and turn every chunk into a storable record.
///
/// All chunk texts go to the embedder in one batched call. An embedding
/// failure propagates to the caller; there is no partial-document result.
pub async fn build_records(
    embedder: &dyn Embedder,
    chunker: &TextChunker,
    document: &Document,
) -> Result<Vec<ChunkRecord>, EmbeddingError> {
    let chunks = chunker.chunk(document);
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }

    Ok(chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| ChunkRecord::new(chunk, embedding))
        .collect())
}

/// Upload records in contiguous batches of at most `batch_size`, in
/// original order.
///
/// Each batch upsert is retried on transient failures; a batch that still
/// fails is logged and recorded, and the loop continues with the next
/// batch. Chunk order within a document is never changed.
pub async fn upload_records(
    index: &dyn VectorIndex,
    records: Vec<ChunkRecord>,
    batch_size: usize,
    retry: &RetryConfig,
) -> UploadReport {
    let batch_size = batch_size.max(1);
    let mut report = UploadReport::default();

    for (batch_no, batch) in records.chunks(batch_size).enumerate() {
        let batch_no = batch_no + 1;
        report.batches_submitted += 1;

        let result = with_retry(retry, || async { index.upsert(batch.to_vec()).await }).await;

        match result {
            Ok(()) => {
                report.records_uploaded += batch.len();
                tracing::debug!(batch = batch_no, records = batch.len(), "upserted batch");
            }
            Err(e) => {
                tracing::warn!(batch = batch_no, error = %e, "batch upsert failed, continuing");
                report.batches_failed += 1;
                report.failures.push((batch_no, e.to_string()));
            }
        }
    }

    report
}
