//! Cue building from aligned spans.

use legenda_transcript_model::cue::{escape_html, Cue};

use crate::aligner::AlignedSpan;

/// Gap left before the next cue when a minimum-duration extension is clamped.
pub const CLAMP_EPSILON_SECS: f64 = 0.001;

/// Convert aligned spans into numbered bilingual cues.
///
/// Every cue lasts at least `min_cue_duration_secs` unless that would run
/// into the next cue, in which case it ends [`CLAMP_EPSILON_SECS`] before the
/// next start (but never before its own span's end).
pub fn build_cues(spans: Vec<AlignedSpan>, min_cue_duration_secs: f64) -> Vec<Cue> {
    let next_starts: Vec<Option<f64>> = spans
        .iter()
        .skip(1)
        .map(|s| Some(s.start_secs))
        .chain(std::iter::once(None))
        .collect();

    let mut clamped = 0usize;
    let cues: Vec<Cue> = spans
        .into_iter()
        .zip(next_starts)
        .enumerate()
        .map(|(i, (span, next_start))| {
            let start_secs = span.start_secs;
            let natural_end = span.end_secs.max(start_secs);
            let mut end_secs = natural_end.max(start_secs + min_cue_duration_secs);

            if let Some(next) = next_start {
                if end_secs > next {
                    end_secs = (next - CLAMP_EPSILON_SECS)
                        .max(natural_end)
                        .max(start_secs)
                        .min(next.max(start_secs));
                    clamped += 1;
                }
            }

            Cue {
                index: i + 1,
                start_secs,
                end_secs,
                source_html: escape_html(&span.turn.source_text),
                translation_html: span.turn.translation_text.as_deref().map(escape_html),
            }
        })
        .collect();

    tracing::debug!(cues = cues.len(), clamped, "Built cues");
    cues
}
