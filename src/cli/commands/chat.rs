//! Interactive chat loop.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::models::Config;
use crate::services::{CompletionClient, EmbeddingClient, QdrantIndex, answer_query};
use crate::utils::retry::RetryConfig;

/// Run the interactive question loop. The literal `quit` (any case)
/// terminates; any error from the query path is printed and the loop
/// continues with the next input.
pub async fn handle_chat(_verbose: bool) -> Result<()> {
    let config = Config::load()?;

    let embedding_client =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    let index = QdrantIndex::new(&config.index, u64::from(config.embedding.dimension))
        .context("failed to create index client")?;
    let completion_client =
        CompletionClient::new(&config.chat).context("failed to create completion client")?;

    let retry = RetryConfig::new(config.index.max_attempts);
    let top_k = u64::from(config.chat.top_k);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Ask a question (or type 'quit' to exit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("quit") {
            break;
        }

        match answer_query(
            &embedding_client,
            &index,
            &completion_client,
            top_k,
            &retry,
            question,
        )
        .await
        {
            Ok(answer) => println!("\nAssistant: {answer}\n"),
            Err(e) => {
                eprintln!("An error occurred: {e}");
                eprintln!("Please try again with a different question.");
            }
        }
    }

    Ok(())
}
