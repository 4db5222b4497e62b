//! Legenda Align Core
//!
//! Turns a reference transcript and noisy speech-engine output into
//! subtitle cues:
//! - **Normalization:** Comparison-only folding of case, punctuation and diacritics
//! - **Aligner:** Monotonic window search matching each turn to recognized speech
//! - **Cue Builder:** Minimum-duration policy with non-overlap clamping
//! - **Debug Export:** Per-turn alignment diagnostics as JSON
//!
//! This crate is pure computation apart from writing the debug report.

pub mod aligner;
pub mod cue_builder;
pub mod debug_export;
pub mod normalize;
pub mod similarity;

pub use aligner::{AlignedSpan, Aligner, AlignerConfig};
pub use cue_builder::build_cues;
pub use debug_export::DebugReport;
