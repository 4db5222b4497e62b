//! Error types shared across Legenda crates.

use std::path::PathBuf;

/// Top-level error type for Legenda operations.
#[derive(Debug, thiserror::Error)]
pub enum LegendaError {
    #[error(
        "Transcript line count mismatch: source has {source_count} non-empty lines, \
         translation has {translation_count}"
    )]
    InputMismatch {
        source_count: usize,
        translation_count: usize,
    },

    #[error("Transcription error: {message}")]
    Transcription { message: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },

    #[error("Subtitle format error: {message}")]
    SubtitleFormat { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using LegendaError.
pub type LegendaResult<T> = Result<T, LegendaError>;

impl LegendaError {
    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription {
            message: msg.into(),
        }
    }

    pub fn alignment(msg: impl Into<String>) -> Self {
        Self::Alignment {
            message: msg.into(),
        }
    }

    pub fn subtitle_format(msg: impl Into<String>) -> Self {
        Self::SubtitleFormat {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
