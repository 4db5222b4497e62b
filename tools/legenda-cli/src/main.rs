//! Legenda CLI: bilingual subtitles from a reference transcript and audio.
//!
//! Usage:
//!   legenda align [OPTIONS]      Align a transcript to audio and write WebVTT
//!   legenda inspect <FILE>       List cues or show the cue active at a time
//!   legenda check                Check that the speech tools are installed

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use legenda_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "legenda",
    about = "Bilingual subtitles aligned from a reference transcript",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/legenda/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a reference transcript to audio and write a WebVTT file
    Align(commands::align::AlignArgs),

    /// Parse a WebVTT file and show its cues
    Inspect {
        /// Path to the cue file
        path: PathBuf,

        /// Show only the cue active at this time (seconds)
        #[arg(long)]
        at: Option<f64>,

        /// Hide the translation line
        #[arg(long)]
        hide_translation: bool,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    legenda_common::logging::init_logging(&LoggingConfig {
        level,
        json: config.logging.json,
    });

    match cli.command {
        Commands::Align(args) => commands::align::run(args, config).await,
        Commands::Inspect {
            path,
            at,
            hide_translation,
        } => commands::inspect::run(path, at, hide_translation),
        Commands::Check => commands::check::run(&config),
    }
}
