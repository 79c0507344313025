//! Retrieval-side models: index matches and reassembled documents.

use serde::{Deserialize, Serialize};

/// A single match returned from the vector index, with chunk metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub record_id: String,
    pub score: f32,
    pub origin_id: String,
    pub text: String,
    pub index: u32,
    pub total: u32,
}

/// A document reconstructed from retrieved chunks.
///
/// `slots` has one position per expected chunk; positions the retrieval
/// did not cover stay `None`. Built transiently per query.
#[derive(Debug, Clone)]
pub struct ReassembledDocument {
    pub origin_id: String,
    pub slots: Vec<Option<String>>,
}

impl ReassembledDocument {
    pub fn new(origin_id: String) -> Self {
        Self {
            origin_id,
            slots: Vec::new(),
        }
    }

    /// Number of chunk positions the document is expected to have.
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// True when every position was filled by a retrieved chunk.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Concatenate filled positions in order; missing positions contribute
    /// nothing.
    pub fn text(&self) -> String {
        self.slots.iter().flatten().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_missing_positions() {
        let doc = ReassembledDocument {
            origin_id: "doc1".to_string(),
            slots: vec![None, Some("world".to_string())],
        };
        assert_eq!(doc.text(), "world");
        assert_eq!(doc.total(), 2);
        assert!(!doc.is_complete());
    }

    #[test]
    fn test_text_concatenates_in_order() {
        let doc = ReassembledDocument {
            origin_id: "doc1".to_string(),
            slots: vec![Some("Hello ".to_string()), Some("world".to_string())],
        };
        assert_eq!(doc.text(), "Hello world");
        assert!(doc.is_complete());
    }
}
