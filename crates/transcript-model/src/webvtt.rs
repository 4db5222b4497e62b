//! WebVTT output.

use std::io::Write;
use std::path::Path;

use legenda_common::error::LegendaResult;

use crate::cue::{Cue, LanguageTags};

/// Generate WebVTT content from cues.
///
/// Each cue block carries its 1-based index as the identifier line.
pub fn to_webvtt(cues: &[Cue], tags: &LanguageTags) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for cue in cues {
        output.push_str(&format!("{}\n", cue.index));
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_time(cue.start_secs),
            format_vtt_time(cue.end_secs),
        ));
        output.push_str(&cue.payload(tags));
        output.push_str("\n\n");
    }

    output
}

/// Format seconds as VTT timestamp: HH:MM:SS.mmm
pub fn format_vtt_time(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Write cues to `path` in one shot.
///
/// Content goes to a temporary file next to the destination which is then
/// renamed over it, so an interrupted run never leaves a truncated file.
pub fn save_webvtt(cues: &[Cue], tags: &LanguageTags, path: &Path) -> LegendaResult<()> {
    let content = to_webvtt(cues, tags);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), cues = cues.len(), "Wrote WebVTT file");
    Ok(())
}
