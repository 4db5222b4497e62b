//! Speech-to-text transcription.
//!
//! The engine itself is an external collaborator; this module defines how
//! it is selected and configured, and normalizes what comes back into
//! sorted [`RecognizedSegment`]s.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use legenda_common::config::TranscriptionDefaults;
use legenda_common::error::{LegendaError, LegendaResult};
use legenda_transcript_model::segment::{sort_segments, RecognizedSegment};
use serde::{Deserialize, Serialize};

/// Whisper model tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelTier {
    /// Fastest, least accurate (~75 MB).
    Tiny,
    /// Good for quick drafts (~142 MB).
    Base,
    /// Reasonable word timings at modest cost (~466 MB).
    Small,
    /// High accuracy (~1.5 GB).
    Medium,
    /// Best accuracy, slowest (~2.9 GB).
    LargeV2,
    /// Latest large model (~2.9 GB).
    LargeV3,
}

impl ModelTier {
    pub const ALL: [ModelTier; 6] = [
        ModelTier::Tiny,
        ModelTier::Base,
        ModelTier::Small,
        ModelTier::Medium,
        ModelTier::LargeV2,
        ModelTier::LargeV3,
    ];

    /// Approximate model download size in bytes.
    pub fn size_bytes(&self) -> u64 {
        match self {
            ModelTier::Tiny => 75_000_000,
            ModelTier::Base => 142_000_000,
            ModelTier::Small => 466_000_000,
            ModelTier::Medium => 1_500_000_000,
            ModelTier::LargeV2 | ModelTier::LargeV3 => 2_900_000_000,
        }
    }

    /// Name understood by the Whisper command-line tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Tiny => "tiny",
            ModelTier::Base => "base",
            ModelTier::Small => "small",
            ModelTier::Medium => "medium",
            ModelTier::LargeV2 => "large-v2",
            ModelTier::LargeV3 => "large-v3",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = LegendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = ModelTier::ALL.iter().map(|t| t.as_str()).collect();
                LegendaError::config(format!(
                    "Unknown model tier: {s}. Use one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Which timestamps to keep from the engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One segment per recognized word (falls back to segments when the
    /// engine reports no word timings).
    Word,
    /// The engine's own phrase-level segments.
    Segment,
}

impl FromStr for Granularity {
    type Err = LegendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Granularity::Word),
            "segment" => Ok(Granularity::Segment),
            _ => Err(LegendaError::config(format!(
                "Unknown granularity: {s}. Use: word, segment"
            ))),
        }
    }
}

/// Configuration for transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Model to use.
    pub model: ModelTier,

    /// Spoken language hint (ISO 639-1 code, e.g., "pt").
    pub language: Option<String>,

    /// Inference device ("auto" lets the engine decide).
    pub device: String,

    /// Timestamp granularity.
    pub granularity: Granularity,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: ModelTier::Small,
            language: Some("pt".to_string()),
            device: "auto".to_string(),
            granularity: Granularity::Word,
        }
    }
}

impl TranscriptionConfig {
    /// Build from the application config section.
    pub fn from_defaults(defaults: &TranscriptionDefaults) -> LegendaResult<Self> {
        Ok(Self {
            model: defaults.model.parse()?,
            language: Some(defaults.language.clone()).filter(|l| !l.is_empty()),
            device: defaults.device.clone(),
            granularity: defaults.granularity.parse()?,
        })
    }
}

/// A speech-to-text backend.
pub trait SpeechEngine: Send + Sync {
    /// Run recognition and return raw segments in engine order.
    fn recognize(
        &self,
        audio_path: &Path,
        config: &TranscriptionConfig,
    ) -> LegendaResult<Vec<RecognizedSegment>>;

    /// Check if this engine can run on the system.
    fn is_available(&self) -> bool;

    /// Engine name.
    fn name(&self) -> &str;
}

/// Transcribe an audio file.
///
/// This is the main entry point for transcription. Returned segments are
/// sorted by start time, have non-blank text and `end_secs >= start_secs`.
pub fn transcribe(
    engine: &dyn SpeechEngine,
    audio_path: &Path,
    config: &TranscriptionConfig,
) -> LegendaResult<Vec<RecognizedSegment>> {
    tracing::info!(
        path = %audio_path.display(),
        engine = engine.name(),
        model = %config.model,
        language = ?config.language,
        "Starting transcription"
    );

    if !engine.is_available() {
        return Err(LegendaError::transcription(format!(
            "speech engine '{}' is not available",
            engine.name()
        )));
    }

    let start = std::time::Instant::now();
    let raw = engine.recognize(audio_path, config)?;
    let segments = finalize_segments(raw)?;

    tracing::info!(
        segments = segments.len(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Transcription finished"
    );
    Ok(segments)
}

/// Clean up raw engine output.
///
/// Drops blank segments, repairs inverted timings and stable-sorts by start.
/// Fails when nothing usable remains.
pub fn finalize_segments(raw: Vec<RecognizedSegment>) -> LegendaResult<Vec<RecognizedSegment>> {
    let mut segments: Vec<RecognizedSegment> = raw
        .into_iter()
        .filter(|s| !s.text.trim().is_empty())
        .map(|mut s| {
            s.text = s.text.trim().to_string();
            if s.start_secs < 0.0 {
                s.start_secs = 0.0;
            }
            if s.end_secs < s.start_secs {
                tracing::warn!(
                    start = s.start_secs,
                    end = s.end_secs,
                    "Segment ends before it starts, clamping"
                );
                s.end_secs = s.start_secs;
            }
            s
        })
        .collect();

    if segments.is_empty() {
        return Err(LegendaError::transcription(
            "no speech was recognized in the audio; check the language and audio quality",
        ));
    }

    sort_segments(&mut segments);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine {
        segments: Vec<RecognizedSegment>,
        available: bool,
    }

    impl SpeechEngine for FixedEngine {
        fn recognize(
            &self,
            _audio_path: &Path,
            _config: &TranscriptionConfig,
        ) -> LegendaResult<Vec<RecognizedSegment>> {
            Ok(self.segments.clone())
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_model_tier_parsing() {
        assert_eq!("large-v2".parse::<ModelTier>().unwrap(), ModelTier::LargeV2);
        assert_eq!(ModelTier::Medium.to_string(), "medium");
        let err = "huge".parse::<ModelTier>().unwrap_err();
        assert!(err.to_string().contains("large-v3"));
    }

    #[test]
    fn test_model_sizes_grow() {
        for pair in ModelTier::ALL.windows(2) {
            assert!(pair[0].size_bytes() <= pair[1].size_bytes());
        }
    }

    #[test]
    fn test_config_from_defaults() {
        let config = TranscriptionConfig::from_defaults(&TranscriptionDefaults::default()).unwrap();
        assert_eq!(config.model, ModelTier::Small);
        assert_eq!(config.language.as_deref(), Some("pt"));
        assert_eq!(config.granularity, Granularity::Word);

        let bad = TranscriptionDefaults {
            granularity: "phoneme".to_string(),
            ..Default::default()
        };
        assert!(TranscriptionConfig::from_defaults(&bad).is_err());
    }

    #[test]
    fn test_transcribe_sorts_and_cleans() {
        let engine = FixedEngine {
            segments: vec![
                RecognizedSegment::new(4.0, 5.0, " depois "),
                RecognizedSegment::new(1.0, 0.5, "antes"),
                RecognizedSegment::new(2.0, 3.0, "   "),
            ],
            available: true,
        };
        let segments =
            transcribe(&engine, Path::new("talk.wav"), &TranscriptionConfig::default()).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "antes");
        assert_eq!(segments[0].end_secs, 1.0);
        assert_eq!(segments[1].text, "depois");
    }

    #[test]
    fn test_unavailable_engine_fails() {
        let engine = FixedEngine {
            segments: vec![],
            available: false,
        };
        let err = transcribe(&engine, Path::new("talk.wav"), &TranscriptionConfig::default())
            .unwrap_err();
        assert!(matches!(err, LegendaError::Transcription { .. }));
    }

    #[test]
    fn test_empty_output_fails() {
        let err = finalize_segments(vec![]).unwrap_err();
        assert!(matches!(err, LegendaError::Transcription { .. }));
    }
}
