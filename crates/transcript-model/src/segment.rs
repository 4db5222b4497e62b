//! Recognized speech segments.

use serde::{Deserialize, Serialize};

/// A timestamped unit of text returned by the speech engine.
///
/// Engines usually emit these in playback order without overlaps, but
/// nothing downstream relies on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedSegment {
    /// Start time in seconds.
    pub start_secs: f64,
    /// End time in seconds.
    pub end_secs: f64,
    /// Recognized text, as returned by the engine.
    pub text: String,
}

impl RecognizedSegment {
    pub fn new(start_secs: f64, end_secs: f64, text: impl Into<String>) -> Self {
        Self {
            start_secs,
            end_secs,
            text: text.into(),
        }
    }

    /// Segment length in seconds (never negative).
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }
}

/// Stable-sort segments by start time.
pub fn sort_segments(segments: &mut [RecognizedSegment]) {
    segments.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_clamps_at_zero() {
        assert_eq!(RecognizedSegment::new(2.0, 1.0, "x").duration_secs(), 0.0);
        assert!((RecognizedSegment::new(1.0, 3.5, "x").duration_secs() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut segments = vec![
            RecognizedSegment::new(3.0, 4.0, "c"),
            RecognizedSegment::new(1.0, 2.0, "a"),
            RecognizedSegment::new(1.0, 1.5, "b"),
        ];
        sort_segments(&mut segments);
        let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
