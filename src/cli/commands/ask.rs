//! One-shot question command.

use anyhow::{Context, Result};
use clap::Args;

use crate::models::Config;
use crate::services::{CompletionClient, EmbeddingClient, QdrantIndex, answer_query};
use crate::utils::retry::RetryConfig;

#[derive(Debug, Args)]
pub struct AskArgs {
    #[arg(required = true, help = "Question text")]
    pub query: String,

    #[arg(long, short = 'n', help = "Number of chunk matches to retrieve")]
    pub top_k: Option<u32>,
}

/// Handle the ask command. Unlike the interactive loop, errors here
/// propagate and fail the process.
pub async fn handle_ask(args: AskArgs, verbose: bool) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("question cannot be empty");
    }

    let config = Config::load()?;
    let top_k = u64::from(args.top_k.unwrap_or(config.chat.top_k));
    if top_k == 0 {
        anyhow::bail!("top_k must be at least 1");
    }

    if verbose {
        eprintln!("Query: \"{query}\"");
        eprintln!("  Top-K: {top_k}");
        eprintln!("  Collection: {}", config.index.collection);
    }

    let embedding_client =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    let index = QdrantIndex::new(&config.index, u64::from(config.embedding.dimension))
        .context("failed to create index client")?;
    let completion_client =
        CompletionClient::new(&config.chat).context("failed to create completion client")?;

    let retry = RetryConfig::new(config.index.max_attempts);

    let answer = answer_query(
        &embedding_client,
        &index,
        &completion_client,
        top_k,
        &retry,
        query,
    )
    .await
    .context("failed to answer question")?;

    println!("{answer}");

    Ok(())
}
