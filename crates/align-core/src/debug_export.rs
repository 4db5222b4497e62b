//! Alignment diagnostics report.
//!
//! A side channel for inspecting match quality by hand: one entry per turn
//! with what was compared, which window won and the resulting timing.

use std::path::Path;

use legenda_common::error::LegendaResult;
use serde::Serialize;

use crate::aligner::{AlignedSpan, TokenWindow};

/// Current report schema.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub schema_version: u32,
    pub meta: DebugMeta,
    pub turns: Vec<TurnReport>,
    pub aggregates: AggregateReport,
}

/// Run inputs recorded alongside the per-turn entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugMeta {
    pub generated_at: String,
    pub audio: Option<String>,
    pub source: Option<String>,
    pub translation: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub normalized_source: String,
    pub matched_text: String,
    pub window: Option<TokenWindow>,
    pub matched_segment_count: usize,
    pub score: f64,
    pub gap: bool,
    pub low_confidence: bool,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub turn_count: usize,
    pub gap_count: usize,
    pub low_confidence_count: usize,
    pub mean_score: f64,
    pub min_score: f64,
}

impl DebugMeta {
    /// Empty metadata stamped with the current time.
    pub fn now() -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            ..Default::default()
        }
    }
}

impl DebugReport {
    /// Build a report from aligned spans.
    ///
    /// Spans scoring below `low_confidence_threshold` are flagged.
    pub fn from_spans(spans: &[AlignedSpan], meta: DebugMeta, low_confidence_threshold: f64) -> Self {
        let turns: Vec<TurnReport> = spans
            .iter()
            .map(|span| TurnReport {
                index: span.turn.index,
                text: span.turn.source_text.clone(),
                translation: span.turn.translation_text.clone(),
                normalized_source: span.diagnostics.normalized_source.clone(),
                matched_text: span.diagnostics.matched_text.clone(),
                window: span.diagnostics.window,
                matched_segment_count: span.matched_segments.len(),
                score: span.score,
                gap: span.is_gap(),
                low_confidence: span.score < low_confidence_threshold,
                start: span.start_secs,
                end: span.end_secs,
            })
            .collect();

        let aggregates = AggregateReport {
            turn_count: turns.len(),
            gap_count: turns.iter().filter(|t| t.gap).count(),
            low_confidence_count: turns.iter().filter(|t| t.low_confidence).count(),
            mean_score: if turns.is_empty() {
                0.0
            } else {
                turns.iter().map(|t| t.score).sum::<f64>() / turns.len() as f64
            },
            min_score: turns.iter().map(|t| t.score).fold(1.0_f64, f64::min),
        };

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            meta,
            turns,
            aggregates,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> LegendaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON to `path`.
    pub fn write_json(&self, path: &Path) -> LegendaResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), turns = self.turns.len(), "Wrote debug report");
        Ok(())
    }
}
