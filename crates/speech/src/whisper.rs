//! Whisper command-line backend.
//!
//! Runs the `whisper` tool with word timestamps and JSON output, then reads
//! the JSON it leaves in a scratch directory. Previously produced JSON can be
//! reused through [`SegmentsFileEngine`].

use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use legenda_common::error::{LegendaError, LegendaResult};
use legenda_transcript_model::segment::RecognizedSegment;
use serde::Deserialize;

use crate::extract::{command_exists, extract_audio_track, needs_extraction};
use crate::transcription::{Granularity, SpeechEngine, TranscriptionConfig};

/// Lines of engine stderr kept for error reports.
const STDERR_TAIL_LINES: usize = 8;

/// Top-level Whisper JSON output.
#[derive(Debug, Clone, Deserialize)]
pub struct WhisperOutput {
    #[serde(default)]
    pub language: Option<String>,
    pub segments: Vec<WhisperSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<WhisperWord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhisperWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub probability: Option<f64>,
}

/// A segments file: Whisper JSON, or a plain array of recognized segments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SegmentsDocument {
    Whisper(WhisperOutput),
    Plain(Vec<RecognizedSegment>),
}

impl WhisperOutput {
    /// Flatten into recognized segments at the requested granularity.
    ///
    /// With [`Granularity::Word`], segments without word timings are kept
    /// whole.
    pub fn into_segments(self, granularity: Granularity) -> Vec<RecognizedSegment> {
        let mut out = Vec::new();
        for segment in self.segments {
            if granularity == Granularity::Word && !segment.words.is_empty() {
                out.extend(
                    segment
                        .words
                        .into_iter()
                        .map(|w| RecognizedSegment::new(w.start, w.end, w.word)),
                );
            } else {
                out.push(RecognizedSegment::new(segment.start, segment.end, segment.text));
            }
        }
        out
    }
}

/// Parse a segments document (Whisper JSON or a plain segment array).
pub fn parse_segments_json(
    content: &str,
    granularity: Granularity,
) -> LegendaResult<Vec<RecognizedSegment>> {
    let document: SegmentsDocument = serde_json::from_str(content).map_err(|e| {
        LegendaError::transcription(format!("Unrecognized transcription JSON: {e}"))
    })?;

    Ok(match document {
        SegmentsDocument::Whisper(output) => {
            tracing::debug!(
                language = ?output.language,
                segments = output.segments.len(),
                "Parsed Whisper output"
            );
            output.into_segments(granularity)
        }
        SegmentsDocument::Plain(segments) => segments,
    })
}

/// Runs the Whisper command-line tool.
#[derive(Debug, Clone)]
pub struct WhisperCliEngine {
    binary: String,
    ffmpeg: String,
}

impl WhisperCliEngine {
    pub fn new(binary: impl Into<String>, ffmpeg: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ffmpeg: ffmpeg.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn build_command(&self, audio: &Path, out_dir: &Path, config: &TranscriptionConfig) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(audio)
            .args(["--model", config.model.as_str()])
            .args(["--word_timestamps", "True"])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(out_dir)
            .args(["--verbose", "False"]);
        if let Some(language) = &config.language {
            cmd.arg("--language").arg(language);
        }
        if config.device != "auto" {
            cmd.arg("--device").arg(&config.device);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    fn run(&self, mut cmd: Command) -> LegendaResult<()> {
        let mut child = cmd.spawn().map_err(|e| {
            LegendaError::transcription(format!("Failed to start {}: {e}", self.binary))
        })?;
        tracing::info!(pid = child.id(), binary = %self.binary, "Speech engine started");

        // Progress bars and model download notes arrive on stderr.
        let tail = match child.stderr.take() {
            Some(stderr) => stderr_tail(BufReader::new(stderr)),
            None => VecDeque::new(),
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(LegendaError::transcription(format!(
                "{} exited with {status}: {}",
                self.binary,
                Vec::from(tail).join(" | ")
            )));
        }
        Ok(())
    }
}

impl SpeechEngine for WhisperCliEngine {
    fn recognize(
        &self,
        audio_path: &Path,
        config: &TranscriptionConfig,
    ) -> LegendaResult<Vec<RecognizedSegment>> {
        check_audio(audio_path)?;

        let scratch = tempfile::tempdir()?;
        let audio: PathBuf = if needs_extraction(audio_path) {
            extract_audio_track(&self.ffmpeg, audio_path, scratch.path())?
        } else {
            audio_path.to_path_buf()
        };

        let out_dir = scratch.path().join("whisper");
        std::fs::create_dir_all(&out_dir)?;
        self.run(self.build_command(&audio, &out_dir, config))?;

        let stem = audio
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let json_path = out_dir.join(format!("{stem}.json"));
        let content = std::fs::read_to_string(&json_path).map_err(|e| {
            LegendaError::transcription(format!(
                "{} produced no output at {}: {e}",
                self.binary,
                json_path.display()
            ))
        })?;

        parse_segments_json(&content, config.granularity)
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        "whisper-cli"
    }
}

/// Reads segments from a previously saved transcription instead of running
/// an engine.
#[derive(Debug, Clone)]
pub struct SegmentsFileEngine {
    path: PathBuf,
}

impl SegmentsFileEngine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpeechEngine for SegmentsFileEngine {
    fn recognize(
        &self,
        _audio_path: &Path,
        config: &TranscriptionConfig,
    ) -> LegendaResult<Vec<RecognizedSegment>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LegendaError::transcription(format!(
                "Cannot read segments file {}: {e}",
                self.path.display()
            ))
        })?;
        parse_segments_json(&content, config.granularity)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        "segments-file"
    }
}

/// Log engine stderr at debug level, keeping the last non-blank lines.
fn stderr_tail(reader: impl BufRead) -> VecDeque<String> {
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES + 1);
    for line in reader.lines().map_while(Result::ok) {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        tracing::debug!(target: "legenda_speech::engine", "{line}");
        tail.push_back(line);
        if tail.len() > STDERR_TAIL_LINES {
            tail.pop_front();
        }
    }
    tail
}

fn check_audio(path: &Path) -> LegendaResult<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        LegendaError::transcription(format!("Cannot read audio {}: {e}", path.display()))
    })?;
    if metadata.len() == 0 {
        return Err(LegendaError::transcription(format!(
            "Audio file {} is empty",
            path.display()
        )));
    }
    Ok(())
}
