//! Legenda Speech
//!
//! Local speech-to-text for alignment:
//! - **Transcription:** Engine abstraction, model tiers, and segment clean-up
//! - **Whisper:** Whisper command-line backend and its JSON output format
//! - **Extraction:** ffmpeg audio track extraction for video containers

pub mod extract;
pub mod transcription;
pub mod whisper;

pub use transcription::*;
pub use whisper::{SegmentsFileEngine, WhisperCliEngine};
