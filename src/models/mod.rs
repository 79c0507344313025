mod config;
mod document;
mod retrieval;

pub use config::{
    COMPLETION_API_KEY_ENV, ChatConfig, ChunkingConfig, Config, DEFAULT_COLLECTION,
    DEFAULT_COMPLETION_MODEL, DEFAULT_COMPLETION_URL, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_URL, DEFAULT_INDEX_URL, EmbeddingConfig, INDEX_API_KEY_ENV, IndexConfig,
};
pub use document::{Chunk, ChunkRecord, Document, ImportDocument};
pub use retrieval::{ReassembledDocument, RetrievedChunk};
