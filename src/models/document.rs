use serde::{Deserialize, Serialize};

/// Maximum length of a derived document identifier.
const DERIVED_ID_MAX_LEN: usize = 50;

/// One entry of the ingestion JSON array.
///
/// Entries whose `ai_response` is missing or blank carry nothing worth
/// indexing and are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportDocument {
    pub user_input: String,
    #[serde(default)]
    pub ai_response: Option<String>,
}

impl ImportDocument {
    pub fn has_response(&self) -> bool {
        self.ai_response
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }
}

/// A source document: the question it answers and the text to index.
/// The id is derived once from `user_input` and is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub user_input: String,
    pub ai_response: String,
}

impl Document {
    /// Derive a short, stable, ASCII-safe identifier from text.
    ///
    /// Non-ASCII characters are stripped, whitespace runs collapse to a
    /// single `_`, and the result is truncated to 50 characters. Text with
    /// no ASCII content at all falls back to a 128-bit content hash of the
    /// original text, hex encoded. Deterministic; truncated prefixes of
    /// different inputs may collide, which is accepted.
    pub fn derive_id(text: &str) -> String {
        let mut id = String::new();
        let mut in_whitespace = false;

        for c in text.chars().filter(char::is_ascii) {
            if c.is_whitespace() {
                in_whitespace = true;
            } else {
                if in_whitespace {
                    id.push('_');
                    in_whitespace = false;
                }
                id.push(c);
            }
        }
        if in_whitespace {
            id.push('_');
        }

        if id.is_empty() {
            return content_hash(text);
        }

        id.chars().take(DERIVED_ID_MAX_LEN).collect()
    }

    pub fn new(user_input: String, ai_response: String) -> Self {
        let id = Self::derive_id(&user_input);
        Self {
            id,
            user_input,
            ai_response,
        }
    }
}

/// 128-bit content hash (SHA-256 truncated), hex encoded.
fn content_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(text.as_bytes());
    hex::encode(&hash[..16])
}

/// A bounded-length slice of a document's text with its position.
///
/// Invariant: `index < total`, and every chunk of the same `origin_id`
/// carries the same `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub origin_id: String,
    pub index: u32,
    pub total: u32,
    pub text: String,
}

/// The unit stored in the vector index: an embedding plus chunk metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `"{origin_id}_{index}"`
    pub record_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    pub origin_id: String,
    pub text: String,
    pub index: u32,
    pub total: u32,
    pub created_at: String,
}

impl ChunkRecord {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        let record_id = format!("{}_{}", chunk.origin_id, chunk.index);
        Self {
            record_id,
            embedding,
            origin_id: chunk.origin_id,
            text: chunk.text,
            index: chunk.index,
            total: chunk.total,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Deterministic point id for index backends that require UUID ids.
    pub fn point_id(&self) -> uuid::Uuid {
        uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, self.record_id.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_id_collapses_whitespace() {
        assert_eq!(Document::derive_id("Hello world"), "Hello_world");
        assert_eq!(Document::derive_id("a  b\tc"), "a_b_c");
        assert_eq!(Document::derive_id(" padded "), "_padded_");
    }

    #[test]
    fn test_derive_id_strips_non_ascii() {
        assert_eq!(Document::derive_id("caf\u{e9} m\u{e9}nu"), "caf_mnu");
    }

    #[test]
    fn test_derive_id_truncates_to_fifty() {
        let id = Document::derive_id(&"x".repeat(200));
        assert_eq!(id.len(), 50);
    }

    #[test]
    fn test_derive_id_hash_fallback() {
        let id = Document::derive_id("\u{c548}\u{b155}\u{d558}\u{c138}\u{c694}");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_id_empty_input() {
        let id = Document::derive_id("");
        assert_eq!(id.len(), 32);
        assert!(!id.is_empty());
    }

    #[test]
    fn test_derive_id_deterministic() {
        for text in ["", "Hello world", "\u{4f60}\u{597d}", " mixed \u{e9} input "] {
            assert_eq!(Document::derive_id(text), Document::derive_id(text));
        }
    }

    #[test]
    fn test_derive_id_ascii_only() {
        for text in ["", "plain", "\u{4f60}\u{597d}", "caf\u{e9}\nline"] {
            let id = Document::derive_id(text);
            assert!(!id.is_empty());
            assert!(id.len() <= 50);
            assert!(id.is_ascii());
        }
    }

    #[test]
    fn test_record_id_format() {
        let chunk = Chunk {
            origin_id: "doc1".to_string(),
            index: 2,
            total: 3,
            text: "text".to_string(),
        };
        let record = ChunkRecord::new(chunk, vec![0.0; 4]);
        assert_eq!(record.record_id, "doc1_2");
        assert_eq!(record.index, 2);
        assert_eq!(record.total, 3);
    }

    #[test]
    fn test_point_id_deterministic() {
        let make = |index| {
            ChunkRecord::new(
                Chunk {
                    origin_id: "doc1".to_string(),
                    index,
                    total: 3,
                    text: "t".to_string(),
                },
                vec![],
            )
        };
        assert_eq!(make(0).point_id(), make(0).point_id());
        assert_ne!(make(0).point_id(), make(1).point_id());
    }

    #[test]
    fn test_import_document_has_response() {
        let with = ImportDocument {
            user_input: "q".to_string(),
            ai_response: Some("a".to_string()),
        };
        let blank = ImportDocument {
            user_input: "q".to_string(),
            ai_response: Some("   ".to_string()),
        };
        let missing = ImportDocument {
            user_input: "q".to_string(),
            ai_response: None,
        };
        assert!(with.has_response());
        assert!(!blank.has_response());
        assert!(!missing.has_response());
    }
}
