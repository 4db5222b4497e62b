//! WebVTT cue file parser.
//!
//! A line-driven state machine:
//!
//! - `SeekingBlock`: between blocks; a timing line starts a cue, `NOTE`,
//!   `STYLE`, `REGION` and the `WEBVTT` header start a skipped block, any
//!   other line is a cue identifier.
//! - `ReadingTiming`: an identifier was read, the timing line must follow.
//! - `ReadingText`: payload lines until a blank line ends the cue.
//! - `SkippingBlock`: ignore lines until a blank line.
//!
//! Malformed blocks are skipped and counted instead of failing the file.

use serde::Serialize;

/// One parsed cue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCue {
    /// Identifier line, if the block had one.
    pub identifier: Option<String>,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Inner HTML of the first language span (or the whole payload when the
    /// cue has no spans).
    pub source_html: String,
    /// Inner HTML of the second language span.
    pub translation_html: Option<String>,
}

/// Result of parsing a cue file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedTrack {
    pub cues: Vec<ParsedCue>,
    /// Blocks dropped because their timing was missing or malformed.
    pub skipped_blocks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    SeekingBlock,
    ReadingTiming,
    ReadingText,
    SkippingBlock,
}

#[derive(Debug, Default)]
struct PendingCue {
    identifier: Option<String>,
    start_secs: f64,
    end_secs: f64,
    lines: Vec<String>,
}

struct WebVttParser {
    state: ParserState,
    pending: PendingCue,
    track: ParsedTrack,
}

/// Parse WebVTT content into cues.
pub fn parse_webvtt(content: &str) -> ParsedTrack {
    let mut parser = WebVttParser {
        state: ParserState::SeekingBlock,
        pending: PendingCue::default(),
        track: ParsedTrack::default(),
    };

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    for (number, line) in content.lines().enumerate() {
        parser.feed(number + 1, line.trim_end_matches('\r'));
    }
    parser.finish()
}

impl WebVttParser {
    fn feed(&mut self, number: usize, line: &str) {
        let blank = line.trim().is_empty();

        self.state = match self.state {
            ParserState::SeekingBlock if blank => ParserState::SeekingBlock,
            ParserState::SeekingBlock if is_skipped_block(line) => ParserState::SkippingBlock,
            ParserState::SeekingBlock if line.contains("-->") => {
                self.pending = PendingCue::default();
                self.begin_cue(number, line)
            }
            ParserState::SeekingBlock => {
                self.pending = PendingCue {
                    identifier: Some(line.trim().to_string()),
                    ..Default::default()
                };
                ParserState::ReadingTiming
            }

            ParserState::ReadingTiming if line.contains("-->") => self.begin_cue(number, line),
            ParserState::ReadingTiming => {
                tracing::warn!(line = number, "Cue identifier without a timing line");
                self.track.skipped_blocks += 1;
                if blank {
                    ParserState::SeekingBlock
                } else {
                    ParserState::SkippingBlock
                }
            }

            ParserState::ReadingText if blank => {
                self.finish_cue();
                ParserState::SeekingBlock
            }
            ParserState::ReadingText => {
                self.pending.lines.push(line.to_string());
                ParserState::ReadingText
            }

            ParserState::SkippingBlock if blank => ParserState::SeekingBlock,
            ParserState::SkippingBlock => ParserState::SkippingBlock,
        };
    }

    fn begin_cue(&mut self, number: usize, line: &str) -> ParserState {
        match parse_timing_line(line) {
            Some((start_secs, end_secs)) => {
                self.pending.start_secs = start_secs;
                self.pending.end_secs = end_secs;
                self.pending.lines.clear();
                ParserState::ReadingText
            }
            None => {
                tracing::warn!(line = number, text = line, "Malformed cue timing, skipping block");
                self.track.skipped_blocks += 1;
                ParserState::SkippingBlock
            }
        }
    }

    fn finish_cue(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let payload = pending.lines.join("\n");
        let (source_html, translation_html) = split_payload(&payload);
        self.track.cues.push(ParsedCue {
            identifier: pending.identifier,
            start_secs: pending.start_secs,
            end_secs: pending.end_secs,
            source_html,
            translation_html,
        });
    }

    fn finish(mut self) -> ParsedTrack {
        match self.state {
            ParserState::ReadingText => self.finish_cue(),
            ParserState::ReadingTiming => self.track.skipped_blocks += 1,
            ParserState::SeekingBlock | ParserState::SkippingBlock => {}
        }
        self.track
    }
}

fn is_skipped_block(line: &str) -> bool {
    ["WEBVTT", "NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        line.strip_prefix(keyword)
            .map(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
            .unwrap_or(false)
    })
}

/// Parse `start --> end [settings]`.
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    let start = parse_timestamp(start.trim())?;
    let end = parse_timestamp(end)?;
    (end >= start).then_some((start, end))
}

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm` (a `,` separator is accepted too).
pub fn parse_timestamp(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return None,
    };

    let (whole, fraction) = seconds
        .split_once(['.', ','])
        .unwrap_or((seconds, "0"));

    let number = |part: &str| -> Option<u64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    let hours = number(hours)?;
    let minutes = number(minutes)?;
    let whole = number(whole)?;
    if minutes >= 60 || whole >= 60 {
        return None;
    }
    number(fraction)?;
    let fraction: f64 = format!("0.{fraction}").parse().ok()?;

    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60)?
        .checked_add(whole)?;
    Some(total as f64 + fraction)
}

/// Pull the inner HTML of the first two `<span ...>` regions out of a payload.
fn split_payload(payload: &str) -> (String, Option<String>) {
    let mut spans = Vec::new();
    let mut rest = payload;

    while let Some(open) = rest.find("<span") {
        let Some(tag_end) = rest[open..].find('>') else {
            break;
        };
        let inner_start = open + tag_end + 1;
        let Some(close) = rest[inner_start..].find("</span>") else {
            break;
        };
        spans.push(rest[inner_start..inner_start + close].to_string());
        rest = &rest[inner_start + close + "</span>".len()..];
    }

    let mut spans = spans.into_iter();
    match spans.next() {
        Some(source) => (source, spans.next()),
        None => (payload.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\n\
        \n\
        NOTE generated by hand\n\
        spanning two lines\n\
        \n\
        1\n\
        00:00:01.000 --> 00:00:02.500\n\
        <span class=\"pt\">Olá</span><br/><span class=\"en\">Hello</span>\n\
        \n\
        00:00:03.000 --> 00:00:04.000 align:start\n\
        sem etiquetas\n\
        segunda linha\n\
        \n\
        broken\n\
        00:00:05.000 -> 00:00:06.000\n\
        lost text\n\
        \n\
        4\n\
        00:01:05.250 --> 00:01:06.000\n\
        <span class=\"pt\">Último</span>";

    #[test]
    fn test_parses_blocks_with_and_without_identifiers() {
        let track = parse_webvtt(SAMPLE);
        assert_eq!(track.cues.len(), 3);
        assert_eq!(track.skipped_blocks, 1);

        let first = &track.cues[0];
        assert_eq!(first.identifier.as_deref(), Some("1"));
        assert_eq!((first.start_secs, first.end_secs), (1.0, 2.5));
        assert_eq!(first.source_html, "Olá");
        assert_eq!(first.translation_html.as_deref(), Some("Hello"));

        let second = &track.cues[1];
        assert_eq!(second.identifier, None);
        assert_eq!(second.source_html, "sem etiquetas\nsegunda linha");
        assert_eq!(second.translation_html, None);

        let last = &track.cues[2];
        assert!((last.start_secs - 65.25).abs() < 1e-9);
        assert_eq!(last.source_html, "Último");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}WEBVTT\r\n\r\n00:00.500 --> 00:01.000\r\ntexto\r\n";
        let track = parse_webvtt(content);
        assert_eq!(track.cues.len(), 1);
        assert_eq!(track.cues[0].start_secs, 0.5);
        assert_eq!(track.cues[0].source_html, "texto");
    }

    #[test]
    fn test_timestamp_forms() {
        assert_eq!(parse_timestamp("01:01:01.500"), Some(3661.5));
        assert_eq!(parse_timestamp("00:02,250"), Some(2.25));
        assert_eq!(parse_timestamp("00:00:07"), Some(7.0));
        assert_eq!(parse_timestamp("00:61:00.000"), None);
        assert_eq!(parse_timestamp("aa:00:00.000"), None);
        assert_eq!(parse_timestamp("12.5"), None);
    }

    #[test]
    fn test_overflowing_hours_are_rejected() {
        assert_eq!(parse_timestamp("18446744073709551615:00:00.000"), None);
        assert_eq!(parse_timestamp("99999999999999999999:00:00.000"), None);

        let track = parse_webvtt(
            "WEBVTT\n\n18446744073709551615:00:00.000 --> 18446744073709551615:00:01.000\nx\n\n\
             00:00:01.000 --> 00:00:02.000\ny\n",
        );
        assert_eq!(track.skipped_blocks, 1);
        assert_eq!(track.cues.len(), 1);
        assert_eq!(track.cues[0].source_html, "y");
    }

    #[test]
    fn test_inverted_timing_is_skipped() {
        let track = parse_webvtt("WEBVTT\n\n00:00:05.000 --> 00:00:04.000\nx\n");
        assert!(track.cues.is_empty());
        assert_eq!(track.skipped_blocks, 1);
    }

    #[test]
    fn test_identifier_without_timing_at_eof() {
        let track = parse_webvtt("WEBVTT\n\n7");
        assert!(track.cues.is_empty());
        assert_eq!(track.skipped_blocks, 1);
    }
}
