use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use marginalia::annotations::{sort_annotations, Annotation};
use marginalia::cfi::{self, ParsedPosition, PositionComponent, SPINE_WEIGHT};
use marginalia::merge::HighlightMerger;

const COLORS: [&str; 3] = ["yellow", "blue", "pink"];
const WORDS: [&str; 6] = ["alpha", "beta", "gamma.", "delta!", "epsilon", "zeta?"];

fn arb_step() -> impl Strategy<Value = (u32, Option<String>)> {
    (0..10_000u32, proptest::option::of("[a-z0-9]{1,8}"))
}

fn render_steps(steps: &[(u32, Option<String>)]) -> String {
    steps
        .iter()
        .map(|(index, label)| match label {
            Some(label) => format!("/{index}[{label}]"),
            None => format!("/{index}"),
        })
        .collect()
}

fn small_position() -> impl Strategy<Value = ParsedPosition> {
    (
        proptest::collection::vec(0..3u32, 1..3),
        proptest::collection::vec(0..3u32, 0..3),
        proptest::option::of(0..3u32),
    )
        .prop_map(|(spine, content, offset)| ParsedPosition {
            spine_path: spine.into_iter().map(PositionComponent::new).collect(),
            content_path: content.into_iter().map(PositionComponent::new).collect(),
            character_offset: offset,
            raw: String::new(),
        })
}

/// Fragments laid out along one chapter with strictly increasing begin offsets
fn arb_fragments() -> impl Strategy<Value = Vec<Annotation>> {
    proptest::collection::vec(
        (
            0..COLORS.len(),
            0..200u32,
            1..50u32,
            0..WORDS.len(),
            proptest::option::of(0..120i64),
        ),
        0..20,
    )
    .prop_map(|specs| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut offset = 0u32;

        specs
            .into_iter()
            .enumerate()
            .map(|(i, (color, gap, len, word, secs))| {
                let begin = offset + gap;
                let end = begin + len;
                offset = end;

                let annotation = Annotation::new(
                    &format!("h{i}"),
                    "book-1",
                    COLORS[color],
                    &format!("epubcfi(/6/4!/4/2/1:{begin})"),
                    &format!("epubcfi(/6/4!/4/2/1:{end})"),
                    WORDS[word],
                );
                match secs {
                    Some(secs) => annotation.with_created_at(base + Duration::seconds(i as i64 * 30 + secs)),
                    None => annotation,
                }
            })
            .collect()
    })
}

/// Batches mixing usable, garbage and empty anchors with patchy metadata
fn arb_mixed_batch() -> impl Strategy<Value = Vec<Annotation>> {
    proptest::collection::vec(
        (
            0..2usize,
            0..3u8,
            0..3u32,
            0..300u32,
            0..WORDS.len(),
            proptest::option::of(0..600i64),
            proptest::option::of(0..600i64),
            proptest::option::of(0..5_000u32),
        ),
        0..12,
    )
    .prop_map(|specs| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        specs
            .into_iter()
            .enumerate()
            .map(|(i, (color, anchor, item, begin, word, created, updated, location))| {
                let (begin_anchor, end_anchor) = match anchor {
                    0 => (
                        format!("epubcfi(/6/{}!/4/2/1:{begin})", (item + 1) * 2),
                        format!("epubcfi(/6/{}!/4/2/1:{})", (item + 1) * 2, begin + 20),
                    ),
                    1 => ("garbage".to_string(), "garbage".to_string()),
                    _ => (String::new(), String::new()),
                };

                let mut annotation = Annotation::new(
                    &format!("h{i}"),
                    "book-1",
                    COLORS[color],
                    &begin_anchor,
                    &end_anchor,
                    WORDS[word],
                );
                if let Some(secs) = created {
                    annotation = annotation.with_created_at(base + Duration::seconds(secs));
                }
                if let Some(secs) = updated {
                    annotation = annotation.with_updated_at(base + Duration::seconds(secs));
                }
                if let Some(location) = location {
                    annotation = annotation.with_location(&location.to_string());
                }
                annotation
            })
            .collect()
    })
}

fn ids(annotations: &[Annotation]) -> Vec<String> {
    annotations.iter().map(|a| a.id.clone()).collect()
}

proptest! {
    #[test]
    fn prop_parser_recovers_components(
        spine in proptest::collection::vec(arb_step(), 1..5),
        content in proptest::collection::vec(arb_step(), 0..6),
        offset in proptest::option::of(0..100_000u32),
    ) {
        let mut raw = format!("epubcfi({}", render_steps(&spine));
        if !content.is_empty() || offset.is_some() {
            raw.push('!');
            raw.push_str(&render_steps(&content));
            if let Some(offset) = offset {
                raw.push_str(&format!(":{offset}"));
            }
        }
        raw.push(')');

        let pos = cfi::parse(&raw).expect("well-formed position");
        let spine_back: Vec<(u32, Option<String>)> =
            pos.spine_path.iter().map(|s| (s.index, s.label.clone())).collect();
        let content_back: Vec<(u32, Option<String>)> =
            pos.content_path.iter().map(|s| (s.index, s.label.clone())).collect();

        prop_assert_eq!(spine_back, spine);
        prop_assert_eq!(content_back, content);
        prop_assert_eq!(pos.character_offset, offset);
        prop_assert_eq!(pos.to_string(), raw);
    }

    #[test]
    fn prop_parser_is_total(raw in ".*") {
        if let Some(pos) = cfi::parse(&raw) {
            prop_assert!(!pos.spine_path.is_empty());
        }
    }

    #[test]
    fn prop_parser_is_total_on_cfi_alphabet(raw in "[/!:\\[\\]^0-9a-z()]{0,40}") {
        if let Some(pos) = cfi::parse(&raw) {
            prop_assert!(!pos.spine_path.is_empty());
        }
    }

    #[test]
    fn prop_comparator_is_total_order(
        a in small_position(),
        b in small_position(),
        c in small_position(),
    ) {
        prop_assert_eq!(a.cmp(&a), Ordering::Equal);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    #[test]
    fn prop_spine_difference_is_never_adjacent(
        prefix in proptest::collection::vec(0..50u32, 0..4),
        from in 0..1_000u32,
        delta in 1..1_000u32,
        content_a in proptest::collection::vec(0..1_000u32, 0..4),
        content_b in proptest::collection::vec(0..1_000u32, 0..4),
        offset_a in proptest::option::of(0..10_000u32),
        offset_b in proptest::option::of(0..10_000u32),
    ) {
        let build = |last: u32, content: &[u32], offset: Option<u32>| ParsedPosition {
            spine_path: prefix.iter().copied().chain(std::iter::once(last)).map(PositionComponent::new).collect(),
            content_path: content.iter().copied().map(PositionComponent::new).collect(),
            character_offset: offset,
            raw: String::new(),
        };
        let a = build(from, content_a.as_slice(), offset_a);
        let b = build(from + delta, content_b.as_slice(), offset_b);

        for d in [cfi::distance(&a, &b), cfi::distance(&b, &a)] {
            prop_assert!(d.abs() >= SPINE_WEIGHT - prefix.len() as f64);
        }
        prop_assert!(!cfi::are_adjacent(&a, &b, 100.0));
        prop_assert!(a < b);
    }

    #[test]
    fn prop_sort_is_deterministic(
        (original, shuffled) in arb_fragments().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(ids(&sort_annotations(original)), ids(&sort_annotations(shuffled)));
    }

    #[test]
    fn prop_mixed_metadata_sort_is_deterministic(
        (original, shuffled) in arb_mixed_batch().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(ids(&sort_annotations(original)), ids(&sort_annotations(shuffled)));
    }

    #[test]
    fn prop_mixed_metadata_merge_is_deterministic(
        (original, shuffled) in arb_mixed_batch().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let merger = HighlightMerger::default();
        prop_assert_eq!(ids(&merger.merge(original)), ids(&merger.merge(shuffled)));
    }

    #[test]
    fn prop_mixed_metadata_merge_is_idempotent(batch in arb_mixed_batch()) {
        let merger = HighlightMerger::default();
        let once = merger.merge(batch);
        let again = merger.merge_with_stats(once.clone());

        prop_assert_eq!(again.reduction_count(), 0);
        prop_assert_eq!(ids(&again.annotations), ids(&once));
    }

    #[test]
    fn prop_sort_without_metadata_orders_by_id(
        (original, shuffled) in proptest::collection::hash_set("[a-z]{1,6}", 0..15)
            .prop_map(|set| set.into_iter().map(|id| Annotation::new(&id, "b", "yellow", "", "garbage", "t")).collect::<Vec<_>>())
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let mut expected = ids(&original);
        expected.sort();
        prop_assert_eq!(ids(&sort_annotations(original)), expected.clone());
        prop_assert_eq!(ids(&sort_annotations(shuffled)), expected);
    }

    #[test]
    fn prop_merge_is_idempotent(fragments in arb_fragments()) {
        let merger = HighlightMerger::default();
        let once = merger.merge(fragments);
        let again = merger.merge_with_stats(once.clone());

        prop_assert_eq!(again.reduction_count(), 0);
        prop_assert_eq!(ids(&again.annotations), ids(&once));
    }

    #[test]
    fn prop_merge_keeps_colors_and_text(fragments in arb_fragments()) {
        let by_id: HashMap<String, Annotation> =
            fragments.iter().map(|a| (a.id.clone(), a.clone())).collect();
        let outcome = HighlightMerger::default().merge_with_stats(fragments.clone());

        prop_assert_eq!(outcome.original_count, fragments.len());
        prop_assert_eq!(outcome.merged_count, outcome.annotations.len());

        let mut seen = 0;
        for merged in &outcome.annotations {
            let parts: Vec<&Annotation> = merged.id.split('+').map(|id| &by_id[id]).collect();
            seen += parts.len();

            for part in &parts {
                prop_assert_eq!(&part.color, &merged.color);
            }

            let expected: Vec<&str> = parts.iter().map(|p| p.text.trim()).collect();
            prop_assert_eq!(merged.text.clone(), expected.join(" "));
            prop_assert_eq!(&merged.begin_anchor, &parts[0].begin_anchor);
            prop_assert_eq!(&merged.end_anchor, &parts[parts.len() - 1].end_anchor);
        }
        prop_assert_eq!(seen, fragments.len());
    }
}
