use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11411";
pub const DEFAULT_INDEX_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "quickstart";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Dimension of the sentence-embedding vectors (all-MiniLM-L6-v2 class models).
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 384;

/// Environment variable holding the vector index API key.
pub const INDEX_API_KEY_ENV: &str = "QDRANT_API_KEY";

/// Environment variable holding the completion provider API key.
pub const COMPLETION_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("ragchat").join("config.toml"))
    }

    /// Load configuration from the config file, falling back to defaults.
    /// API keys are only ever read from the environment, never from disk.
    pub fn load() -> Result<Self, crate::error::ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(INDEX_API_KEY_ENV)
            && !key.is_empty()
        {
            config.index.api_key = Some(key);
        }
        if let Ok(key) = std::env::var(COMPLETION_API_KEY_ENV)
            && !key.is_empty()
        {
            config.chat.api_key = Some(key);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Maximum texts sent to the embedding server per request.
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: u32,

    #[serde(default = "default_dimension")]
    pub dimension: u32,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_timeout() -> u64 {
    120
}

fn default_embedding_batch_size() -> u32 {
    8
}

fn default_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            timeout_secs: default_embedding_timeout(),
            batch_size: default_embedding_batch_size(),
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Loaded from `QDRANT_API_KEY`, never persisted.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Records per upsert request.
    #[serde(default = "default_upload_batch_size")]
    pub upload_batch_size: u32,

    /// Total attempts for a transient upsert/query failure.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_upload_batch_size() -> u32 {
    25
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            collection: default_collection(),
            api_key: None,
            upload_batch_size: default_upload_batch_size(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: u32,
}

fn default_max_chunk_size() -> u32 {
    100
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_completion_url")]
    pub completion_url: String,

    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Loaded from `OPENAI_API_KEY`, never persisted.
    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_completion_url() -> String {
    DEFAULT_COMPLETION_URL.to_string()
}

fn default_completion_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn default_top_k() -> u32 {
    10
}

fn default_completion_timeout() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            completion_url: default_completion_url(),
            model: default_completion_model(),
            api_key: None,
            top_k: default_top_k(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.embedding.url, DEFAULT_EMBEDDING_URL);
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.index.collection, DEFAULT_COLLECTION);
        assert_eq!(config.index.upload_batch_size, 25);
        assert_eq!(config.chunking.max_chunk_size, 100);
        assert_eq!(config.chat.top_k, 10);
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.is_some());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[chunking]\nmax_chunk_size = 64\n").unwrap();
        assert_eq!(config.chunking.max_chunk_size, 64);
        assert_eq!(config.index.upload_batch_size, 25);
    }

    #[test]
    fn test_api_keys_not_serialized() {
        let mut config = Config::default();
        config.index.api_key = Some("secret".to_string());
        config.chat.api_key = Some("secret".to_string());
        let content = toml::to_string_pretty(&config).unwrap();
        assert!(!content.contains("secret"));
    }
}
