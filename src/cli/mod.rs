//! CLI entry point for hark.

pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hark audio transcription CLI
#[derive(Parser, Debug)]
#[command(name = "hark", version, about = "hark: audio transcription pipeline")]
pub struct Cli {
    /// Recognition backend (google, openai); overrides HARK_BACKEND
    #[arg(short, long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a local audio file
    Transcribe(TranscribeArgs),
    /// Serve the HTTP upload endpoint
    Serve(ServeArgs),
}

/// Arguments for `hark transcribe`.
#[derive(Parser, Debug)]
pub struct TranscribeArgs {
    /// Audio file (.wav, .mp3, .ogg, .m4a)
    pub file: PathBuf,

    /// Print the JSON response body instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `hark serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind; overrides HARK_BIND
    #[arg(long)]
    pub bind: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
