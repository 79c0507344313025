//! Deterministic text chunking with positional metadata.

use crate::models::{Chunk, ChunkingConfig, Document};

/// Splits document text into ordered, bounded-length chunks.
///
/// Chunks break on word boundaries. Whitespace between words is preserved
/// inside a chunk; the whitespace run at a chunk boundary is dropped, so
/// concatenating the chunks is close to, but not exactly, the original
/// text. A single word longer than `max_chunk_size` is hard-split at
/// character boundaries so the length bound always holds.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk length in characters.
    max_chunk_size: usize,
}

impl TextChunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_chunk_size as usize)
    }

    pub fn with_defaults() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }

    /// Chunk a document's response text, tagging each chunk with the
    /// document's origin id and its position.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let pieces = self.split(&document.ai_response);
        let total = pieces.len() as u32;

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                origin_id: document.id.clone(),
                index: i as u32,
                total,
                text,
            })
            .collect()
    }

    /// Split text into non-empty pieces of at most `max_chunk_size`
    /// characters. Empty or all-whitespace input yields no pieces.
    pub fn split(&self, text: &str) -> Vec<String> {
        let max = self.max_chunk_size;
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        let mut pending_ws: Option<(String, usize)> = None;

        let flush = |current: &mut String, current_len: &mut usize, chunks: &mut Vec<String>| {
            if !current.is_empty() {
                chunks.push(std::mem::take(current));
                *current_len = 0;
            }
        };

        let mut iter = text.chars().peekable();
        while let Some(&first) = iter.peek() {
            let is_ws = first.is_whitespace();
            let mut run = String::new();
            while let Some(&c) = iter.peek() {
                if c.is_whitespace() != is_ws {
                    break;
                }
                run.push(c);
                iter.next();
            }

            if is_ws {
                // Leading whitespace and whitespace at a break point are dropped
                if !current.is_empty() {
                    let len = run.chars().count();
                    pending_ws = Some((run, len));
                }
                continue;
            }

            let word_len = run.chars().count();

            if word_len > max {
                flush(&mut current, &mut current_len, &mut chunks);
                pending_ws = None;

                let chars: Vec<char> = run.chars().collect();
                let mut start = 0;
                while chars.len() - start > max {
                    chunks.push(chars[start..start + max].iter().collect());
                    start += max;
                }
                current = chars[start..].iter().collect();
                current_len = chars.len() - start;
                continue;
            }

            let ws_len = match &pending_ws {
                Some((_, len)) if !current.is_empty() => *len,
                _ => 0,
            };

            if current_len + ws_len + word_len > max {
                flush(&mut current, &mut current_len, &mut chunks);
                pending_ws = None;
                current = run;
                current_len = word_len;
            } else {
                if let Some((ws, len)) = pending_ws.take() {
                    current.push_str(&ws);
                    current_len += len;
                }
                current.push_str(&run);
                current_len += word_len;
            }
        }

        flush(&mut current, &mut current_len, &mut chunks);
        chunks
    }
}
