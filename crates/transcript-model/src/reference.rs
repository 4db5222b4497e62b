//! Reference transcript loading.
//!
//! A reference transcript is a plain-text file with one speaker turn per
//! line. Blank lines and `#` comment lines are ignored. An optional
//! translation file pairs with it line by line.

use std::path::Path;

use legenda_common::error::{LegendaError, LegendaResult};
use serde::{Deserialize, Serialize};

/// One line of the reference transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTurn {
    /// Zero-based position among the non-empty lines.
    pub index: usize,
    /// Source-language text (never empty).
    pub source_text: String,
    /// Translation paired by line position, if a translation was supplied.
    pub translation_text: Option<String>,
}

/// Load reference turns from a source transcript and optional translation.
pub fn load_reference(
    source_path: &Path,
    translation_path: Option<&Path>,
) -> LegendaResult<Vec<ReferenceTurn>> {
    let source = read_transcript(source_path)?;
    let translation = translation_path.map(read_transcript).transpose()?;

    let turns = parse_reference(&source, translation.as_deref())?;
    tracing::info!(
        source = %source_path.display(),
        turns = turns.len(),
        translated = translation.is_some(),
        "Loaded reference transcript"
    );
    Ok(turns)
}

/// Build reference turns from in-memory transcript text.
pub fn parse_reference(
    source: &str,
    translation: Option<&str>,
) -> LegendaResult<Vec<ReferenceTurn>> {
    let source_lines = transcript_lines(source);

    let translations: Vec<Option<String>> = match translation {
        Some(text) => {
            let translation_lines = transcript_lines(text);
            if translation_lines.len() != source_lines.len() {
                return Err(LegendaError::InputMismatch {
                    source_count: source_lines.len(),
                    translation_count: translation_lines.len(),
                });
            }
            translation_lines.into_iter().map(Some).collect()
        }
        None => vec![None; source_lines.len()],
    };

    Ok(source_lines
        .into_iter()
        .zip(translations)
        .enumerate()
        .map(|(index, (source_text, translation_text))| ReferenceTurn {
            index,
            source_text,
            translation_text,
        })
        .collect())
}

fn read_transcript(path: &Path) -> LegendaResult<String> {
    if !path.exists() {
        return Err(LegendaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

fn transcript_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
