//! Align a reference transcript to audio and write the cue file.

use std::path::PathBuf;

use clap::Args;
use legenda_align_core::debug_export::{DebugMeta, DebugReport};
use legenda_align_core::{build_cues, AlignedSpan, Aligner, AlignerConfig};
use legenda_common::config::AppConfig;
use legenda_common::error::LegendaResult;
use legenda_speech::{
    transcribe, SegmentsFileEngine, SpeechEngine, TranscriptionConfig, WhisperCliEngine,
};
use legenda_transcript_model::{load_reference, save_webvtt, LanguageTags};
use tokio::task::JoinHandle;

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Audio or video file with the spoken content
    #[arg(long)]
    audio: PathBuf,

    /// Reference transcript, one turn per line
    #[arg(long)]
    source: PathBuf,

    /// Translation, line-parallel to the source
    #[arg(long)]
    translation: Option<PathBuf>,

    /// Whisper model tier (tiny, base, small, medium, large-v2, large-v3)
    #[arg(long)]
    model: Option<String>,

    /// Spoken language hint (ISO 639-1)
    #[arg(long)]
    language: Option<String>,

    /// Inference device (auto, cpu, cuda)
    #[arg(long)]
    device: Option<String>,

    /// Timestamp granularity (word, segment)
    #[arg(long)]
    granularity: Option<String>,

    /// Reuse a saved Whisper JSON instead of running the engine
    #[arg(long)]
    segments: Option<PathBuf>,

    /// Output WebVTT file
    #[arg(short, long, default_value = "output.vtt")]
    output: PathBuf,

    /// Write per-turn alignment diagnostics as JSON
    #[arg(long)]
    dump_debug: Option<PathBuf>,

    /// Minimum cue display time (seconds)
    #[arg(long)]
    min_cue_duration: Option<f64>,

    /// Windows scoring below this become gaps
    #[arg(long)]
    min_score: Option<f64>,

    /// Hard cap on window length in tokens
    #[arg(long)]
    max_window_tokens: Option<usize>,

    /// Window start positions searched past the cursor
    #[arg(long)]
    lookahead_tokens: Option<usize>,
}

pub async fn run(args: AlignArgs, config: AppConfig) -> anyhow::Result<()> {
    let transcription = transcription_config(&args, &config)?;
    let aligner = Aligner::new(aligner_config(&args, &config));

    let engine: Box<dyn SpeechEngine> = match &args.segments {
        Some(path) => Box::new(SegmentsFileEngine::new(path.clone())),
        None => Box::new(WhisperCliEngine::new(
            config.transcription.whisper_binary.clone(),
            config.transcription.ffmpeg_binary.clone(),
        )),
    };

    let source = args.source.clone();
    let translation = args.translation.clone();
    let loader = tokio::task::spawn_blocking(move || {
        load_reference(&source, translation.as_deref())
    });

    let audio = args.audio.clone();
    let engine_config = transcription.clone();
    let recognizer = tokio::task::spawn_blocking(move || {
        transcribe(engine.as_ref(), &audio, &engine_config)
    });

    let (turns, segments) = tokio::try_join!(joined(loader), joined(recognizer))?;
    tracing::info!(
        turns = turns.len(),
        segments = segments.len(),
        "Inputs ready"
    );

    let spans = aligner.align(&turns, &segments)?;

    let threshold = config.cues.low_confidence_threshold;
    let low_confidence: Vec<usize> = spans
        .iter()
        .filter(|span| span.score < threshold)
        .map(|span| span.turn.index + 1)
        .collect();

    // Built before the spans move into cues, written only once the cue file exists.
    let report = args
        .dump_debug
        .as_ref()
        .map(|_| debug_report(&spans, &args, &transcription, threshold));

    let min_cue_duration = args
        .min_cue_duration
        .unwrap_or(config.cues.min_duration_secs);
    let cues = build_cues(spans, min_cue_duration);

    let tags = LanguageTags {
        source: config.cues.source_tag.clone(),
        translation: config.cues.translation_tag.clone(),
    };
    save_webvtt(&cues, &tags, &args.output)?;

    if let (Some(report), Some(path)) = (report, &args.dump_debug) {
        match report.write_json(path) {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote alignment debug report"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write debug report")
            }
        }
    }

    if !low_confidence.is_empty() {
        tracing::warn!(
            count = low_confidence.len(),
            lines = ?low_confidence,
            "Some lines matched the audio poorly; rerun with --dump-debug <path> to inspect them"
        );
    }

    println!("Generated {} cues in {}", cues.len(), args.output.display());
    Ok(())
}

async fn joined<T>(handle: JoinHandle<LegendaResult<T>>) -> anyhow::Result<T> {
    Ok(handle.await??)
}

fn transcription_config(
    args: &AlignArgs,
    config: &AppConfig,
) -> anyhow::Result<TranscriptionConfig> {
    let mut transcription = TranscriptionConfig::from_defaults(&config.transcription)?;
    if let Some(model) = &args.model {
        transcription.model = model.parse()?;
    }
    if let Some(language) = &args.language {
        transcription.language = Some(language.clone()).filter(|l| !l.is_empty());
    }
    if let Some(device) = &args.device {
        transcription.device = device.clone();
    }
    if let Some(granularity) = &args.granularity {
        transcription.granularity = granularity.parse()?;
    }
    Ok(transcription)
}

fn aligner_config(args: &AlignArgs, config: &AppConfig) -> AlignerConfig {
    let mut aligner = AlignerConfig::from(&config.alignment);
    if let Some(min_score) = args.min_score {
        aligner.min_score = min_score;
    }
    if let Some(max_window) = args.max_window_tokens {
        aligner.max_window_tokens = max_window;
    }
    if let Some(lookahead) = args.lookahead_tokens {
        aligner.lookahead_tokens = lookahead;
    }
    aligner
}

fn debug_report(
    spans: &[AlignedSpan],
    args: &AlignArgs,
    transcription: &TranscriptionConfig,
    low_confidence_threshold: f64,
) -> DebugReport {
    let meta = DebugMeta {
        audio: Some(args.audio.display().to_string()),
        source: Some(args.source.display().to_string()),
        translation: args.translation.as_ref().map(|p| p.display().to_string()),
        model: Some(transcription.model.to_string()),
        language: transcription.language.clone(),
        ..DebugMeta::now()
    };
    DebugReport::from_spans(spans, meta, low_confidence_threshold)
}
