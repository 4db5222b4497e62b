//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Aligner policy constants.
    pub alignment: AlignmentDefaults,

    /// Cue building and styling.
    pub cues: CueDefaults,

    /// Speech engine settings.
    pub transcription: TranscriptionDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tuning knobs for the transcript-to-audio aligner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentDefaults {
    /// Windows scoring below this are rejected and the turn becomes a gap.
    pub min_score: f64,

    /// Minimum per-token similarity for two words to count as the same word.
    pub token_match_threshold: f64,

    /// Window length bound as a multiple of the turn's token count.
    pub window_growth: f64,

    /// Extra tokens allowed on top of the scaled window bound.
    pub window_slack: usize,

    /// Hard cap on window length in tokens.
    pub max_window_tokens: usize,

    /// How far past the cursor (in tokens) a window may start.
    pub lookahead_tokens: usize,
}

/// Cue building defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CueDefaults {
    /// Minimum display time for a cue (seconds), unless clamped by the next cue.
    pub min_duration_secs: f64,

    /// Class name of the source-language span.
    pub source_tag: String,

    /// Class name of the translation span.
    pub translation_tag: String,

    /// Spans scoring below this trigger a low-confidence warning.
    pub low_confidence_threshold: f64,
}

/// Speech engine defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionDefaults {
    /// Whisper command-line binary.
    pub whisper_binary: String,

    /// ffmpeg binary used for audio track extraction.
    pub ffmpeg_binary: String,

    /// Model tier (e.g., "small", "medium", "large-v2").
    pub model: String,

    /// Spoken language (ISO 639-1 code).
    pub language: String,

    /// Inference device ("auto", "cpu", "cuda").
    pub device: String,

    /// Timestamp granularity ("word" or "segment").
    pub granularity: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "legenda=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AlignmentDefaults {
    fn default() -> Self {
        Self {
            min_score: 0.35,
            token_match_threshold: 0.75,
            window_growth: 1.5,
            window_slack: 4,
            max_window_tokens: 160,
            lookahead_tokens: 120,
        }
    }
}

impl Default for CueDefaults {
    fn default() -> Self {
        Self {
            min_duration_secs: 0.8,
            source_tag: "pt".to_string(),
            translation_tag: "en".to_string(),
            low_confidence_threshold: 0.6,
        }
    }
}

impl Default for TranscriptionDefaults {
    fn default() -> Self {
        Self {
            whisper_binary: "whisper".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
            model: "small".to_string(),
            language: "pt".to_string(),
            device: "auto".to_string(),
            granularity: "word".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("legenda").join("config.json")
}
