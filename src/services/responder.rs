//! Query answering: retrieve, reassemble, and complete.

use crate::error::ChatError;
use crate::models::ReassembledDocument;
use crate::services::{Completer, Embedder, VectorIndex, reassemble};
use crate::utils::retry::{RetryConfig, with_retry};

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions from indexed \
document content. Always strive to give direct, actionable information when it is available.";

/// Answer a free-text query against the index.
///
/// Embeds the query, retrieves the top-K chunk records, reassembles them
/// per origin document, and asks the completion service for an answer
/// grounded in the reassembled context. Embedding and index calls are
/// retried on transient failures; every error propagates to the caller,
/// which decides how to present it.
pub async fn answer_query(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    completer: &dyn Completer,
    top_k: u64,
    retry: &RetryConfig,
    query: &str,
) -> Result<String, ChatError> {
    let vector = with_retry(retry, || async { embedder.embed_query(query).await }).await?;

    let matches = with_retry(retry, || {
        let vector = vector.clone();
        async move { index.query(vector, top_k).await }
    })
    .await?;

    let documents = reassemble(&matches);
    let prompt = build_prompt(query, &documents);

    let answer = completer.complete(SYSTEM_PROMPT, &prompt).await?;
    Ok(answer)
}

/// Build the user prompt embedding the reassembled context.
fn build_prompt(query: &str, documents: &[ReassembledDocument]) -> String {
    let context = documents
        .iter()
        .map(|doc| {
            format!(
                "Result:\nQuery: {}\nResponse: {}",
                doc.origin_id,
                doc.text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Given the following user query and search results, provide a concise and relevant \
answer based on the information in the 'Response' sections. If the information isn't directly \
available, use the context to infer a helpful response.\n\n\
User Query: {query}\n\n\
Search Results:\n{context}\n\n\
Please respond in a conversational manner, directly addressing the user's query with the most \
relevant information from the search results. If the exact information isn't available, provide \
the closest relevant details and suggest where the user might find more specific information."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionError, EmbeddingError, IndexError};
    use crate::models::{ChunkRecord, RetrievedChunk};
    use crate::services::index::CollectionInfo;
    use async_trait::async_trait;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed_batch(
            &self,
            texts: Vec<String>,
        ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }

        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![0.0; 4])
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    struct StubIndex {
        matches: Vec<RetrievedChunk>,
    }

    #[async_trait]
    impl VectorIndex for StubIndex {
        async fn health_check(&self) -> Result<bool, IndexError> {
            Ok(true)
        }

        async fn collection_info(&self) -> Result<Option<CollectionInfo>, IndexError> {
            Ok(None)
        }

        async fn ensure_collection(&self) -> Result<(), IndexError> {
            Ok(())
        }

        async fn upsert(&self, _records: Vec<ChunkRecord>) -> Result<(), IndexError> {
            Ok(())
        }

        async fn query(
            &self,
            _vector: Vec<f32>,
            _top_k: u64,
        ) -> Result<Vec<RetrievedChunk>, IndexError> {
            Ok(self.matches.clone())
        }
    }

    /// Echoes the user prompt back so tests can inspect it.
    struct EchoCompleter;

    #[async_trait]
    impl Completer for EchoCompleter {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
        ) -> Result<String, CompletionError> {
            Ok(user_prompt.to_string())
        }
    }

    fn chunk(origin_id: &str, index: u32, total: u32, text: &str) -> RetrievedChunk {
        RetrievedChunk {
            record_id: format!("{origin_id}_{index}"),
            score: 0.8,
            origin_id: origin_id.to_string(),
            text: text.to_string(),
            index,
            total,
        }
    }

    #[test]
    fn test_build_prompt_includes_reassembled_context() {
        let docs = vec![ReassembledDocument {
            origin_id: "library_hours".to_string(),
            slots: vec![Some("Open 8am".to_string()), Some(" to 10pm.".to_string())],
        }];
        let prompt = build_prompt("When is the library open?", &docs);

        assert!(prompt.contains("User Query: When is the library open?"));
        assert!(prompt.contains("Query: library_hours"));
        assert!(prompt.contains("Response: Open 8am to 10pm."));
    }

    #[tokio::test]
    async fn test_answer_query_reassembles_matches() {
        let index = StubIndex {
            matches: vec![chunk("doc1", 1, 2, "world"), chunk("doc1", 0, 2, "Hello ")],
        };
        let answer = answer_query(
            &StubEmbedder,
            &index,
            &EchoCompleter,
            10,
            &RetryConfig::new(1),
            "greeting",
        )
        .await
        .unwrap();

        assert!(answer.contains("Response: Hello world"));
    }
}
