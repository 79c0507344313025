//! CLI module for ragchat.

pub mod commands;

use clap::{Parser, Subcommand};

/// Chunk, embed, and index Q/A documents, then chat over them.
#[derive(Debug, Parser)]
#[command(name = "ragchat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check infrastructure status (embedding server, vector index)
    Status,

    /// Ingest a JSON export: chunk, embed, and upload to the index
    Ingest(commands::IngestArgs),

    /// Ask a single question against the index
    Ask(commands::AskArgs),

    /// Interactive question loop (type 'quit' to exit)
    Chat,
}
