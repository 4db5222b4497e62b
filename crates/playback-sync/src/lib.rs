//! Legenda Playback
//!
//! Consumer side of the cue file:
//! - **Parser:** State-machine WebVTT reader yielding bilingual cue records
//! - **Synchronizer:** Active-cue tracking for a playback clock, with a
//!   translation visibility toggle

pub mod parser;
pub mod synchronizer;

pub use parser::{parse_webvtt, ParsedCue, ParsedTrack};
pub use synchronizer::{PlaybackSynchronizer, RenderedCue, SyncState};
