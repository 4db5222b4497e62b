//! Check system capabilities.

use legenda_common::config::{config_file_path, AppConfig};
use legenda_speech::extract::command_exists;
use legenda_speech::{ModelTier, SpeechEngine, WhisperCliEngine};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Legenda System Check");
    println!("{}", "=".repeat(50));

    let transcription = &config.transcription;
    let whisper = WhisperCliEngine::new(
        transcription.whisper_binary.clone(),
        transcription.ffmpeg_binary.clone(),
    );
    let whisper_ok = whisper.is_available();
    if whisper_ok {
        println!("[OK] Speech engine: {}", whisper.binary());
    } else {
        println!(
            "[MISSING] Speech engine: {} (install with `pip install openai-whisper`)",
            whisper.binary()
        );
    }

    // Only needed for video containers
    if command_exists(&transcription.ffmpeg_binary) {
        println!("[OK] ffmpeg: {}", transcription.ffmpeg_binary);
    } else {
        println!(
            "[WARN] ffmpeg: {} not found; video inputs cannot be transcribed",
            transcription.ffmpeg_binary
        );
    }

    println!();
    println!("Models:");
    for tier in ModelTier::ALL {
        let marker = if tier.as_str() == transcription.model {
            " (configured)"
        } else {
            ""
        };
        println!(
            "  {:<9} ~{} MB{marker}",
            tier.as_str(),
            tier.size_bytes() / 1_000_000
        );
    }
    if let Err(e) = transcription.model.parse::<ModelTier>() {
        println!("[WARN] {e}");
    }

    println!();
    let path = config_file_path();
    if path.exists() {
        println!("Config: {}", path.display());
    } else {
        println!("Config: {} (not found, using defaults)", path.display());
    }
    println!(
        "  Language: {}  Device: {}  Granularity: {}",
        transcription.language, transcription.device, transcription.granularity
    );

    println!();
    if whisper_ok {
        println!("Speech engine is available. Legenda is ready.");
    } else {
        println!("The speech engine is missing. Alignment still works with --segments.");
    }

    Ok(())
}
