//! Transcript-to-speech alignment.
//!
//! Matches each reference turn to a contiguous stretch of recognized speech.
//!
//! # Algorithm
//!
//! 1. **Explode** recognized segments into timed tokens: every normalized word
//!    gets a slice of its segment's time, proportional to its length.
//! 2. **Cursor**: a single position into the token stream, starting at 0 and
//!    only ever moving forward.
//! 3. **Window search**: for each turn, score every window starting within
//!    the lookahead from the cursor and no longer than the window bound.
//!    The score is a Dice coefficient over a weighted longest common
//!    subsequence of tokens, so word order matters and near-spellings count.
//! 4. **Selection**: highest score, then shortest window, then earliest start.
//! 5. **Gap fallback**: below `min_score` the turn gets a zero-length span at
//!    the previous span's end and the cursor stays put.
//! 6. **Advance**: the cursor jumps to the end of the chosen window.
//!
//! Splitting segments into tokens is what lets one long engine segment be
//! shared by two turns without their spans overlapping in time.

use legenda_common::config::AlignmentDefaults;
use legenda_common::error::{LegendaError, LegendaResult};
use legenda_transcript_model::reference::ReferenceTurn;
use legenda_transcript_model::segment::{sort_segments, RecognizedSegment};
use serde::Serialize;

use crate::normalize::tokenize;
use crate::similarity::{lcs_step, overlap_score, token_similarity};

/// Scores closer than this are treated as equal when breaking ties.
const SCORE_EPSILON: f64 = 1e-9;

/// Configuration for the aligner.
#[derive(Debug, Clone)]
pub struct AlignerConfig {
    /// Best windows scoring below this turn into zero-length gap spans.
    pub min_score: f64,

    /// Minimum token similarity for two words to count as a match.
    pub token_match_threshold: f64,

    /// Window length bound as a multiple of the turn's token count.
    pub window_growth: f64,

    /// Extra tokens allowed on top of the scaled bound.
    pub window_slack: usize,

    /// Hard cap on window length in tokens.
    pub max_window_tokens: usize,

    /// Number of start positions searched past the cursor.
    /// Raised to three times the turn length for long turns.
    pub lookahead_tokens: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self::from(&AlignmentDefaults::default())
    }
}

impl From<&AlignmentDefaults> for AlignerConfig {
    fn from(defaults: &AlignmentDefaults) -> Self {
        Self {
            min_score: defaults.min_score,
            token_match_threshold: defaults.token_match_threshold,
            window_growth: defaults.window_growth,
            window_slack: defaults.window_slack,
            max_window_tokens: defaults.max_window_tokens,
            lookahead_tokens: defaults.lookahead_tokens,
        }
    }
}

/// A reference turn with the time span assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSpan {
    /// The turn this span belongs to.
    pub turn: ReferenceTurn,
    /// Start time in seconds.
    pub start_secs: f64,
    /// End time in seconds (equal to start for gap spans).
    pub end_secs: f64,
    /// Recognized segments touched by the matched window, in order.
    pub matched_segments: Vec<RecognizedSegment>,
    /// Match quality in `[0.0, 1.0]`.
    pub score: f64,
    /// What was compared, for the debug report.
    pub diagnostics: SpanDiagnostics,
}

impl AlignedSpan {
    /// Whether the turn found no acceptable match.
    pub fn is_gap(&self) -> bool {
        self.diagnostics.window.is_none()
    }
}

/// Comparison details behind a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanDiagnostics {
    /// Normalized turn text.
    pub normalized_source: String,
    /// Normalized text of the chosen window (or of the best rejected window).
    pub matched_text: String,
    /// Chosen token window, `None` for gap spans.
    pub window: Option<TokenWindow>,
}

/// Half-open range `[start, end)` into the aligner's token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenWindow {
    pub start: usize,
    pub end: usize,
}

impl TokenWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A normalized recognized word with an interpolated time range.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedToken {
    pub text: String,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Index of the source segment in start-time order.
    pub segment: usize,
}

#[derive(Debug, Clone, Copy)]
struct WindowCandidate {
    window: TokenWindow,
    score: f64,
}

impl WindowCandidate {
    fn beats(&self, other: &WindowCandidate) -> bool {
        if self.score > other.score + SCORE_EPSILON {
            return true;
        }
        if (self.score - other.score).abs() > SCORE_EPSILON {
            return false;
        }
        (self.window.len(), self.window.start) < (other.window.len(), other.window.start)
    }
}

/// The transcript aligner.
pub struct Aligner {
    config: AlignerConfig,
}

impl Aligner {
    /// Create a new aligner with the given configuration.
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    /// Create an aligner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AlignerConfig::default())
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Align reference turns against recognized segments.
    ///
    /// Returns exactly one span per turn, in turn order, with
    /// `span[i].end_secs <= span[i + 1].start_secs`.
    pub fn align(
        &self,
        turns: &[ReferenceTurn],
        segments: &[RecognizedSegment],
    ) -> LegendaResult<Vec<AlignedSpan>> {
        if turns.is_empty() {
            return Err(LegendaError::alignment("no reference turns to align"));
        }

        let mut ordered = segments.to_vec();
        sort_segments(&mut ordered);
        let tokens = explode_segments(&ordered);
        if tokens.is_empty() {
            return Err(LegendaError::alignment(format!(
                "no recognized speech to align {} turns against",
                turns.len()
            )));
        }

        let mut spans = Vec::with_capacity(turns.len());
        let mut cursor = 0usize;
        let mut previous_end = 0.0_f64;

        for turn in turns {
            let turn_tokens = tokenize(&turn.source_text);
            let best = self.best_window(&turn_tokens, &tokens, cursor);

            let accepted = best.filter(|c| c.score >= self.config.min_score);
            let span = match accepted {
                Some(candidate) => {
                    let window = candidate.window;
                    let start_secs = tokens[window.start].start_secs.max(previous_end);
                    let end_secs = tokens[window.end - 1].end_secs.max(start_secs);
                    cursor = window.end;

                    AlignedSpan {
                        turn: turn.clone(),
                        start_secs,
                        end_secs,
                        matched_segments: matched_segments(&ordered, &tokens[window.start..window.end]),
                        score: candidate.score,
                        diagnostics: SpanDiagnostics {
                            normalized_source: turn_tokens.join(" "),
                            matched_text: window_text(&tokens, window),
                            window: Some(window),
                        },
                    }
                }
                None => {
                    tracing::debug!(
                        turn = turn.index,
                        best_score = best.map(|c| c.score).unwrap_or(0.0),
                        cursor,
                        "No acceptable window, emitting gap span"
                    );
                    AlignedSpan {
                        turn: turn.clone(),
                        start_secs: previous_end,
                        end_secs: previous_end,
                        matched_segments: Vec::new(),
                        score: best.map(|c| c.score).unwrap_or(0.0),
                        diagnostics: SpanDiagnostics {
                            normalized_source: turn_tokens.join(" "),
                            matched_text: best
                                .map(|c| window_text(&tokens, c.window))
                                .unwrap_or_default(),
                            window: None,
                        },
                    }
                }
            };

            tracing::trace!(
                turn = turn.index,
                start = span.start_secs,
                end = span.end_secs,
                score = span.score,
                "Aligned turn"
            );
            previous_end = span.end_secs;
            spans.push(span);
        }

        let gaps = spans.iter().filter(|s| s.is_gap()).count();
        tracing::info!(
            turns = spans.len(),
            tokens = tokens.len(),
            gaps,
            "Alignment complete"
        );

        Ok(spans)
    }

    /// Longest window considered for a turn of `turn_len` tokens.
    fn max_window(&self, turn_len: usize) -> usize {
        let scaled = (turn_len as f64 * self.config.window_growth).ceil() as usize;
        (scaled + self.config.window_slack)
            .min(self.config.max_window_tokens)
            .max(1)
    }

    /// Number of window start positions searched for a turn.
    fn lookahead(&self, turn_len: usize) -> usize {
        self.config.lookahead_tokens.max(turn_len * 3).max(1)
    }

    /// Search forward from `cursor` for the best-scoring window.
    ///
    /// Returns `None` when the turn has no comparable words or the cursor
    /// is past the last token.
    fn best_window(
        &self,
        turn_tokens: &[String],
        tokens: &[TimedToken],
        cursor: usize,
    ) -> Option<WindowCandidate> {
        if turn_tokens.is_empty() || cursor >= tokens.len() {
            return None;
        }

        let max_window = self.max_window(turn_tokens.len());
        let last_start = (cursor + self.lookahead(turn_tokens.len())).min(tokens.len());
        let horizon = (last_start + max_window).min(tokens.len());

        // weights[p][i]: match weight of token `cursor + p` against turn token `i`
        let weights: Vec<Vec<f64>> = tokens[cursor..horizon]
            .iter()
            .map(|token| {
                turn_tokens
                    .iter()
                    .map(|word| {
                        let similarity = token_similarity(word, &token.text);
                        if similarity >= self.config.token_match_threshold {
                            similarity
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        let mut best: Option<WindowCandidate> = None;

        for start in cursor..last_start {
            let mut column = vec![0.0_f64; turn_tokens.len() + 1];
            let longest = max_window.min(tokens.len() - start);

            for len in 1..=longest {
                let row = &weights[start + len - 1 - cursor];
                column = lcs_step(&column, |i| row[i]);

                let candidate = WindowCandidate {
                    window: TokenWindow {
                        start,
                        end: start + len,
                    },
                    score: overlap_score(column[turn_tokens.len()], turn_tokens.len(), len),
                };

                if best.map_or(true, |b| candidate.beats(&b)) {
                    best = Some(candidate);
                }
            }

            // A perfect match at the earliest start cannot be beaten.
            if best.map_or(false, |b| b.score >= 1.0 - SCORE_EPSILON) {
                break;
            }
        }

        best
    }
}

/// Split segments into normalized word tokens with interpolated times.
///
/// Each token gets a share of its segment's duration proportional to its
/// character count. The last token of a segment ends exactly at the
/// segment's end.
pub fn explode_segments(segments: &[RecognizedSegment]) -> Vec<TimedToken> {
    let mut tokens = Vec::new();

    for (segment_index, segment) in segments.iter().enumerate() {
        let words = tokenize(&segment.text);
        if words.is_empty() {
            continue;
        }

        let duration = segment.duration_secs();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let last = words.len() - 1;
        let mut elapsed_chars = 0usize;

        for (i, word) in words.into_iter().enumerate() {
            let start_secs = segment.start_secs + duration * elapsed_chars as f64 / total_chars as f64;
            elapsed_chars += word.chars().count();
            let end_secs = if i == last {
                segment.end_secs.max(segment.start_secs)
            } else {
                segment.start_secs + duration * elapsed_chars as f64 / total_chars as f64
            };

            tokens.push(TimedToken {
                text: word,
                start_secs,
                end_secs,
                segment: segment_index,
            });
        }
    }

    tokens
}

fn matched_segments(segments: &[RecognizedSegment], window: &[TimedToken]) -> Vec<RecognizedSegment> {
    let mut indices: Vec<usize> = window.iter().map(|t| t.segment).collect();
    indices.dedup();
    indices.into_iter().map(|i| segments[i].clone()).collect()
}

fn window_text(tokens: &[TimedToken], window: TokenWindow) -> String {
    tokens[window.start..window.end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
