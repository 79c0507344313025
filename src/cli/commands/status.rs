//! Status command: infrastructure health checks.

use anyhow::{Context, Result};

use crate::models::Config;
use crate::services::{EmbeddingClient, QdrantIndex, VectorIndex};

/// Handle the status command.
pub async fn handle_status(verbose: bool) -> Result<()> {
    let config = Config::load()?;

    let embedding_client =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    match embedding_client.health_check().await {
        Ok(()) => println!("Embedding server: ok ({})", config.embedding.url),
        Err(e) => println!("Embedding server: unavailable ({e})"),
    }

    match QdrantIndex::new(&config.index, u64::from(config.embedding.dimension)) {
        Ok(index) => match index.health_check().await {
            Ok(_) => {
                println!("Vector index: ok ({})", config.index.url);
                match index.collection_info().await {
                    Ok(Some(info)) => println!(
                        "Collection '{}': {} points",
                        config.index.collection, info.points_count
                    ),
                    Ok(None) => println!(
                        "Collection '{}': not created yet",
                        config.index.collection
                    ),
                    Err(e) => println!("Collection '{}': {e}", config.index.collection),
                }
            }
            Err(e) => println!("Vector index: unavailable ({e})"),
        },
        Err(e) => println!("Vector index: {e}"),
    }

    if config.chat.api_key.is_some() {
        println!("Completion endpoint: configured ({})", config.chat.model);
    } else {
        println!("Completion endpoint: OPENAI_API_KEY not set");
    }

    if verbose {
        println!();
        println!("Embedding dimension: {}", config.embedding.dimension);
        println!("Chunk size: {} chars", config.chunking.max_chunk_size);
        println!("Upload batch size: {}", config.index.upload_batch_size);
        println!("Top-K: {}", config.chat.top_k);
    }

    Ok(())
}
