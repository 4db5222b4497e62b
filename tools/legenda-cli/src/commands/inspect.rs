//! Inspect a WebVTT cue file through the playback synchronizer.

use std::path::PathBuf;

use legenda_common::error::LegendaError;
use legenda_playback::{PlaybackSynchronizer, RenderedCue};
use legenda_transcript_model::format_vtt_time;

pub fn run(path: PathBuf, at: Option<f64>, hide_translation: bool) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(LegendaError::FileNotFound { path }.into());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let mut sync = PlaybackSynchronizer::default();
    let skipped = sync.load(&content);
    sync.set_translation_visible(!hide_translation);

    if sync.cues().is_empty() {
        return Err(LegendaError::subtitle_format(format!(
            "no cues found in {}",
            path.display()
        ))
        .into());
    }
    if skipped > 0 {
        tracing::warn!(skipped, "Skipped malformed cue blocks");
    }

    match at {
        Some(time) => match sync.seek(time).and_then(|i| sync.render(i)) {
            Some(rendered) => print_cue(&sync, &rendered),
            None => println!("No cue active at {}", format_vtt_time(time)),
        },
        None => {
            println!("Cue file: {}", path.display());
            println!("  Cues: {}", sync.cues().len());
            println!();
            for index in 0..sync.cues().len() {
                if let Some(rendered) = sync.render(index) {
                    print_cue(&sync, &rendered);
                }
            }
        }
    }

    Ok(())
}

fn print_cue(sync: &PlaybackSynchronizer, rendered: &RenderedCue) {
    let Some(cue) = sync.cues().get(rendered.index) else {
        return;
    };
    println!(
        "[{}] {} --> {}",
        cue.identifier.as_deref().unwrap_or("-"),
        format_vtt_time(cue.start_secs),
        format_vtt_time(cue.end_secs)
    );
    println!("  {}", rendered.source_html);
    if let Some(translation) = &rendered.translation_html {
        println!("  {translation}");
    }
}
