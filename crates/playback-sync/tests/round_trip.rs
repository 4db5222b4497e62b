//! Cue files written by the model crate read back unchanged.

use legenda_playback::{parse_webvtt, PlaybackSynchronizer};
use legenda_transcript_model::{escape_html, to_webvtt, Cue, LanguageTags};
use proptest::prelude::*;

const WORDS: &[&str] = &["olá", "Tudo bem?", "a & b", "<música>", "São Paulo", "fim."];

fn arb_cues() -> impl Strategy<Value = Vec<Cue>> {
    prop::collection::vec(
        (
            1u64..5_000,
            1u64..5_000,
            0..WORDS.len(),
            prop::option::of(0..WORDS.len()),
        ),
        0..12,
    )
    .prop_map(|raw| {
        let mut cursor_ms = 0u64;
        raw.into_iter()
            .enumerate()
            .map(|(i, (gap_ms, len_ms, source, translation))| {
                let start_ms = cursor_ms + gap_ms;
                let end_ms = start_ms + len_ms;
                cursor_ms = end_ms;
                Cue {
                    index: i + 1,
                    start_secs: start_ms as f64 / 1000.0,
                    end_secs: end_ms as f64 / 1000.0,
                    source_html: escape_html(WORDS[source]),
                    translation_html: translation.map(|t| escape_html(WORDS[t])),
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn written_cues_parse_back(cues in arb_cues()) {
        let vtt = to_webvtt(&cues, &LanguageTags::default());
        let track = parse_webvtt(&vtt);

        prop_assert_eq!(track.skipped_blocks, 0);
        prop_assert_eq!(track.cues.len(), cues.len());
        for (written, read) in cues.iter().zip(&track.cues) {
            prop_assert_eq!(read.identifier.clone(), Some(written.index.to_string()));
            prop_assert!((read.start_secs - written.start_secs).abs() < 1e-6);
            prop_assert!((read.end_secs - written.end_secs).abs() < 1e-6);
            prop_assert_eq!(&read.source_html, &written.source_html);
            prop_assert_eq!(&read.translation_html, &written.translation_html);
        }
    }

    #[test]
    fn forward_playback_only_moves_ahead(cues in arb_cues(), steps in prop::collection::vec(0u64..100_000, 1..40)) {
        let mut sync = PlaybackSynchronizer::default();
        sync.load(&to_webvtt(&cues, &LanguageTags::default()));

        let mut times: Vec<u64> = steps;
        times.sort_unstable();

        let mut highest: Option<usize> = None;
        for ms in times {
            if let Some(index) = sync.update(ms as f64 / 1000.0) {
                if let Some(previous) = highest {
                    prop_assert!(index >= previous);
                }
                highest = Some(index);
            }
        }
    }
}

#[test]
fn interview_track_playback() {
    let cues = vec![
        Cue {
            index: 1,
            start_secs: 3.5,
            end_secs: 6.8,
            source_html: "Bom dia a todos.".to_string(),
            translation_html: Some("Good morning, everyone.".to_string()),
        },
        Cue {
            index: 2,
            start_secs: 7.2,
            end_secs: 11.265,
            source_html: "Hoje falamos de cinema.".to_string(),
            translation_html: Some("Today we talk about cinema.".to_string()),
        },
    ];

    let mut sync = PlaybackSynchronizer::default();
    assert_eq!(sync.load(&to_webvtt(&cues, &LanguageTags::default())), 0);

    assert!(sync.update(1.0).is_none());
    assert_eq!(sync.update(4.0), Some(0));
    assert!(sync.update(7.0).is_none());

    let active = sync.update(8.0).unwrap();
    let rendered = sync.render(active).unwrap();
    assert_eq!(rendered.source_html, "Hoje falamos de cinema.");
    assert_eq!(
        rendered.translation_html.as_deref(),
        Some("Today we talk about cinema.")
    );

    sync.toggle_translation();
    assert_eq!(sync.render_active().unwrap().translation_html, None);
}
