//! Legenda Transcript Model
//!
//! Defines the data contracts shared by the alignment pipeline:
//! - **Segments:** Timestamped text returned by the speech engine
//! - **Reference:** Human-authored transcript turns with optional translations
//! - **Cues:** Final bilingual subtitle entries
//! - **WebVTT:** Serialization of cues to the subtitle wire format
//!
//! All times are seconds from the start of the audio.

pub mod cue;
pub mod reference;
pub mod segment;
pub mod webvtt;

pub use cue::*;
pub use reference::*;
pub use segment::*;
pub use webvtt::*;
