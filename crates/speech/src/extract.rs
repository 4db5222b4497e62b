//! Audio track extraction.
//!
//! Video containers are demuxed to a 16 kHz mono WAV with ffmpeg before
//! recognition.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use legenda_common::error::{LegendaError, LegendaResult};

/// Extensions the speech engine decodes directly.
const NATIVE_AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "opus"];

/// Sample rate expected by Whisper models.
const EXTRACT_SAMPLE_RATE: u32 = 16_000;

/// Whether `path` needs its audio track extracted first.
pub fn needs_extraction(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => !NATIVE_AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}

/// Extract the first audio track of `input` into `out_dir` as WAV.
pub fn extract_audio_track(ffmpeg: &str, input: &Path, out_dir: &Path) -> LegendaResult<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let output = out_dir.join(format!("{stem}.wav"));

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        "Extracting audio track"
    );

    let result = Command::new(ffmpeg)
        .args(["-y", "-v", "error", "-i"])
        .arg(input)
        .args(["-vn", "-ac", "1", "-ar"])
        .arg(EXTRACT_SAMPLE_RATE.to_string())
        .args(["-f", "wav"])
        .arg(&output)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| LegendaError::transcription(format!("Failed to start {ffmpeg}: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(LegendaError::transcription(format!(
            "{ffmpeg} could not extract audio from {}: {}",
            input.display(),
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Whether a command can be found on `PATH` (or exists, for paths).
pub fn command_exists(binary: &str) -> bool {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(binary).is_file();
    }
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
