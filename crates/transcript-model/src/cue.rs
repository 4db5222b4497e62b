//! Bilingual subtitle cues.

use serde::{Deserialize, Serialize};

/// One timed subtitle entry with bilingual text.
///
/// Text fields hold HTML-escaped content, ready to be placed inside the
/// language spans of the cue payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// 1-based position in the cue file.
    pub index: usize,
    /// Start time in seconds.
    pub start_secs: f64,
    /// End time in seconds.
    pub end_secs: f64,
    /// Escaped source-language text.
    pub source_html: String,
    /// Escaped translation text, if any.
    pub translation_html: Option<String>,
}

impl Cue {
    /// Display time in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }

    /// Render the cue text payload with one labeled span per language.
    pub fn payload(&self, tags: &LanguageTags) -> String {
        let mut body = format!(
            "<span class=\"{}\">{}</span>",
            tags.source, self.source_html
        );
        if let Some(translation) = &self.translation_html {
            body.push_str(&format!(
                "<br/><span class=\"{}\">{}</span>",
                tags.translation, translation
            ));
        }
        body
    }
}

/// Class names labeling the two language spans of a cue payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTags {
    pub source: String,
    pub translation: String,
}

impl Default for LanguageTags {
    fn default() -> Self {
        Self {
            source: "pt".to_string(),
            translation: "en".to_string(),
        }
    }
}

/// Escape text for use inside a cue payload.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("sem marcação"), "sem marcação");
    }

    #[test]
    fn test_payload_with_translation() {
        let cue = Cue {
            index: 1,
            start_secs: 0.0,
            end_secs: 1.0,
            source_html: "Olá".to_string(),
            translation_html: Some("Hello".to_string()),
        };
        assert_eq!(
            cue.payload(&LanguageTags::default()),
            "<span class=\"pt\">Olá</span><br/><span class=\"en\">Hello</span>"
        );
    }

    #[test]
    fn test_payload_without_translation_uses_custom_tag() {
        let cue = Cue {
            index: 1,
            start_secs: 0.0,
            end_secs: 1.0,
            source_html: "Hola".to_string(),
            translation_html: None,
        };
        let tags = LanguageTags {
            source: "es".to_string(),
            translation: "en".to_string(),
        };
        assert_eq!(cue.payload(&tags), "<span class=\"es\">Hola</span>");
    }
}
