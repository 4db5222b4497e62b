//! Active-cue tracking against a playback clock.
//!
//! The player calls [`PlaybackSynchronizer::update`] with the current time
//! on every tick. Normal playback only moves forward through the cue list;
//! jumping around the timeline goes through [`PlaybackSynchronizer::seek`].

use serde::Serialize;

use crate::parser::{parse_webvtt, ParsedCue};

/// Grace period after a cue's end during which it stays active.
pub const DEFAULT_TOLERANCE_SECS: f64 = 0.05;

/// Mutable playback state. Reset whenever a new cue file is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState {
    /// Index of the cue on screen.
    pub active: Option<usize>,
    /// Lowest cue index the next forward search starts from.
    cursor: usize,
    /// Whether the translation line is rendered.
    pub show_translation: bool,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            active: None,
            cursor: 0,
            show_translation: true,
        }
    }
}

/// What the player should draw for a cue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCue {
    pub index: usize,
    pub source_html: String,
    /// `None` when the cue has no translation or translations are hidden.
    pub translation_html: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaybackSynchronizer {
    cues: Vec<ParsedCue>,
    state: SyncState,
    tolerance_secs: f64,
}

impl Default for PlaybackSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl PlaybackSynchronizer {
    pub fn new(tolerance_secs: f64) -> Self {
        Self {
            cues: Vec::new(),
            state: SyncState::default(),
            tolerance_secs: tolerance_secs.max(0.0),
        }
    }

    /// Parse and load a cue file. Returns the number of blocks skipped as
    /// malformed.
    pub fn load(&mut self, content: &str) -> usize {
        let track = parse_webvtt(content);
        self.load_cues(track.cues);
        track.skipped_blocks
    }

    /// Replace the cue list and reset playback state.
    pub fn load_cues(&mut self, mut cues: Vec<ParsedCue>) {
        cues.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));
        tracing::debug!(cues = cues.len(), "Loaded cue track");
        self.cues = cues;
        self.state = SyncState::default();
    }

    pub fn cues(&self) -> &[ParsedCue] {
        &self.cues
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Advance to `time_secs` during normal playback.
    ///
    /// The active cue is the latest cue with `start <= time < end + tolerance`.
    /// A clock that steps backwards never moves the active index back.
    pub fn update(&mut self, time_secs: f64) -> Option<usize> {
        if self.cues.is_empty() {
            return None;
        }

        let from = self.state.cursor;
        let started = self.cues[from..].partition_point(|cue| cue.start_secs <= time_secs);
        if started == 0 {
            // Nothing at or after the cursor has started yet.
            if from == 0 {
                self.state.active = None;
            }
            return self.state.active;
        }

        let latest = from + started - 1;
        self.state.cursor = latest;
        let cue = &self.cues[latest];
        self.state.active = (time_secs < cue.end_secs + self.tolerance_secs).then_some(latest);
        self.state.active
    }

    /// Jump to `time_secs`, possibly backwards.
    pub fn seek(&mut self, time_secs: f64) -> Option<usize> {
        tracing::debug!(time = time_secs, "Seek");
        self.state.cursor = 0;
        self.state.active = None;
        self.update(time_secs)
    }

    pub fn active_cue(&self) -> Option<&ParsedCue> {
        self.state.active.and_then(|i| self.cues.get(i))
    }

    /// Flip translation visibility. Returns the new setting.
    pub fn toggle_translation(&mut self) -> bool {
        self.state.show_translation = !self.state.show_translation;
        self.state.show_translation
    }

    pub fn set_translation_visible(&mut self, visible: bool) {
        self.state.show_translation = visible;
    }

    pub fn translation_visible(&self) -> bool {
        self.state.show_translation
    }

    /// Render the cue at `index` under the current visibility setting.
    pub fn render(&self, index: usize) -> Option<RenderedCue> {
        let cue = self.cues.get(index)?;
        Some(RenderedCue {
            index,
            source_html: cue.source_html.clone(),
            translation_html: cue
                .translation_html
                .clone()
                .filter(|_| self.state.show_translation),
        })
    }

    /// Render the active cue, if any.
    pub fn render_active(&self) -> Option<RenderedCue> {
        self.state.active.and_then(|i| self.render(i))
    }
}
