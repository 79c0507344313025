//! Vector index abstraction and the Qdrant-backed implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value, VectorParamsBuilder, value::Kind,
};

use crate::error::IndexError;
use crate::models::{ChunkRecord, IndexConfig, RetrievedChunk};

/// Collection information.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
}

/// External vector index interface.
///
/// Records handed to `upsert` are owned by the index once the call
/// succeeds; the pipeline holds no reference afterwards.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Check if the index is reachable.
    async fn health_check(&self) -> Result<bool, IndexError>;

    /// Get information about the collection. Returns None if it doesn't exist.
    async fn collection_info(&self) -> Result<Option<CollectionInfo>, IndexError>;

    /// Create the collection if it doesn't exist (idempotent).
    async fn ensure_collection(&self) -> Result<(), IndexError>;

    /// Insert or update chunk records.
    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<(), IndexError>;

    /// Retrieve the top-K nearest chunks, with metadata.
    async fn query(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<RetrievedChunk>, IndexError>;
}

/// Qdrant-backed vector index.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    dimension: u64,
}

impl QdrantIndex {
    /// Create a new index client from configuration.
    pub fn new(config: &IndexConfig, dimension: u64) -> Result<Self, IndexError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| IndexError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            dimension,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn health_check(&self) -> Result<bool, IndexError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| IndexError::ConnectionError(e.to_string()))
    }

    async fn collection_info(&self) -> Result<Option<CollectionInfo>, IndexError> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => Ok(Some(CollectionInfo {
                points_count: info.result.map_or(0, |r| r.points_count.unwrap_or(0)),
            })),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("not found") || msg.contains("doesn't exist") {
                    Ok(None)
                } else {
                    Err(IndexError::CollectionError(msg))
                }
            }
        }
    }

    async fn ensure_collection(&self) -> Result<(), IndexError> {
        if self.collection_info().await?.is_some() {
            return Ok(());
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(self.dimension, Distance::Cosine));

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| IndexError::CollectionError(e.to_string()))?;

        Ok(())
    }

    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<(), IndexError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let point_id = record.point_id().to_string();
                let mut payload: HashMap<String, Value> = HashMap::new();
                payload.insert("record_id".to_string(), record.record_id.into());
                payload.insert("origin_id".to_string(), record.origin_id.into());
                payload.insert("text".to_string(), record.text.into());
                payload.insert("idx".to_string(), i64::from(record.index).into());
                payload.insert("total".to_string(), i64::from(record.total).into());
                payload.insert("created_at".to_string(), record.created_at.into());

                PointStruct::new(point_id, record.embedding, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| IndexError::UpsertError(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<RetrievedChunk>, IndexError> {
        let search =
            SearchPointsBuilder::new(&self.collection, vector, top_k.max(1)).with_payload(true);

        let results = self
            .client
            .search_points(search)
            .await
            .map_err(|e| IndexError::QueryError(e.to_string()))?;

        let chunks = results
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;

                // Malformed payloads degrade to placeholders rather than failing
                RetrievedChunk {
                    record_id: payload_str(&payload, "record_id").unwrap_or_default(),
                    score: point.score,
                    origin_id: payload_str(&payload, "origin_id")
                        .unwrap_or_else(|| "unknown".to_string()),
                    text: payload_str(&payload, "text").unwrap_or_default(),
                    index: payload_u32(&payload, "idx").unwrap_or(0),
                    total: payload_u32(&payload, "total").unwrap_or(1).max(1),
                }
            })
            .collect();

        Ok(chunks)
    }
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| match &v.kind {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    })
}

fn payload_int(payload: &HashMap<String, Value>, key: &str) -> Option<i64> {
    payload.get(key).and_then(|v| match &v.kind {
        Some(Kind::IntegerValue(n)) => Some(*n),
        _ => None,
    })
}

/// Integer payload values that don't fit `u32` (negative or oversized)
/// are treated as absent.
fn payload_u32(payload: &HashMap<String, Value>, key: &str) -> Option<u32> {
    payload_int(payload, key).and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexConfig;

    #[test]
    fn test_index_creation() {
        let index = QdrantIndex::new(&IndexConfig::default(), 384);
        assert!(index.is_ok());
        assert_eq!(index.unwrap().collection(), "quickstart");
    }

    #[test]
    fn test_payload_helpers() {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("origin_id".to_string(), "doc1".to_string().into());
        payload.insert("idx".to_string(), 2i64.into());

        assert_eq!(
            payload_str(&payload, "origin_id").as_deref(),
            Some("doc1")
        );
        assert_eq!(payload_int(&payload, "idx"), Some(2));
        assert_eq!(payload_str(&payload, "missing"), None);
        assert_eq!(payload_int(&payload, "origin_id"), None);
    }

    #[test]
    fn test_payload_u32_rejects_out_of_range_values() {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("idx".to_string(), (-3i64).into());
        payload.insert("total".to_string(), (i64::from(u32::MAX) + 1).into());
        payload.insert("ok".to_string(), 7i64.into());

        assert_eq!(payload_u32(&payload, "idx"), None);
        assert_eq!(payload_u32(&payload, "total"), None);
        assert_eq!(payload_u32(&payload, "ok"), Some(7));
    }
}
