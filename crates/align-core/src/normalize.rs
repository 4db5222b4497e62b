//! Text normalization for similarity comparison.
//!
//! Normalized text is only ever compared, never shown: output cues keep the
//! reference transcript's original spelling.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, fold diacritics, turn punctuation into spaces and collapse
/// whitespace.
pub fn normalize_text(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Split text into normalized word tokens.
///
/// Text is canonically decomposed and combining marks are dropped, so
/// precomposed and decomposed spellings of the same word fold alike.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut folded = String::with_capacity(text.len());
    for c in text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if c.is_alphanumeric() {
            folded.push(c);
        } else {
            folded.push(' ');
        }
    }
    folded.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_folding() {
        assert_eq!(
            normalize_text("Olá, você está À VONTADE? Não!"),
            "ola voce esta a vontade nao"
        );
        assert_eq!(normalize_text("Açúcar e pão"), "acucar e pao");
    }

    #[test]
    fn test_punctuation_splits_words() {
        assert_eq!(tokenize("d'água — ok...sim"), vec!["d", "agua", "ok", "sim"]);
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(normalize_text("  um \t dois\n\ntrês  "), "um dois tres");
        assert!(tokenize(" ... — ").is_empty());
    }

    #[test]
    fn test_decomposed_and_precomposed_fold_alike() {
        let decomposed = "Na\u{303}o esta\u{301} a\u{300} vontade";
        let precomposed = "Não está à vontade";
        assert_eq!(tokenize(decomposed), vec!["nao", "esta", "a", "vontade"]);
        assert_eq!(tokenize(decomposed), tokenize(precomposed));
    }

    #[test]
    fn test_accents_outside_the_latin_table() {
        assert_eq!(normalize_text("Ṣàngó ǹ bọ̀"), "sango n bo");
    }

    #[test]
    fn test_digits_survive() {
        assert_eq!(tokenize("Em 2024, 3 vezes"), vec!["em", "2024", "3", "vezes"]);
    }
}
