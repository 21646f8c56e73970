//! Reading-order sort for annotations
//!
//! Annotations are ordered by a chain of strategies. Each strategy either
//! decides (`Some`) or abstains (`None`) when one side lacks the data it
//! needs or both sides compare equal, in which case the next one is asked:
//!
//! 1. begin anchor position
//! 2. leading number of the device location marker
//! 3. creation time
//! 4. modification time
//! 5. annotation id

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::types::Annotation;
use crate::cfi::ParsedPosition;

/// Per-annotation values needed by the strategies, computed once per sort
struct SortKey<'a> {
    annotation: &'a Annotation,
    position: Option<ParsedPosition>,
    location: Option<f64>,
}

impl<'a> SortKey<'a> {
    fn new(annotation: &'a Annotation) -> Self {
        Self {
            annotation,
            position: annotation.begin_position(),
            location: annotation.location_value(),
        }
    }
}

fn decisive(ordering: Ordering) -> Option<Ordering> {
    (ordering != Ordering::Equal).then_some(ordering)
}

fn by_position(a: Option<&ParsedPosition>, b: Option<&ParsedPosition>) -> Option<Ordering> {
    decisive(a?.cmp(b?))
}

fn by_location(a: Option<f64>, b: Option<f64>) -> Option<Ordering> {
    decisive(a?.total_cmp(&b?))
}

fn by_timestamp(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<Ordering> {
    decisive(a?.cmp(&b?))
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    by_position(a.position.as_ref(), b.position.as_ref())
        .or_else(|| by_location(a.location, b.location))
        .or_else(|| by_timestamp(a.annotation.created_at, b.annotation.created_at))
        .or_else(|| by_timestamp(a.annotation.updated_at, b.annotation.updated_at))
        .unwrap_or_else(|| a.annotation.id.cmp(&b.annotation.id))
}

/// Compare two annotations in reading order
pub fn compare_annotations(a: &Annotation, b: &Annotation) -> Ordering {
    compare_keys(&SortKey::new(a), &SortKey::new(b))
}

type CanonicalKey<'a> = (
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
);

/// Every field, id first, so only identical annotations tie
fn canonical_key(a: &Annotation) -> CanonicalKey<'_> {
    (
        a.id.as_str(),
        a.begin_anchor.as_str(),
        a.end_anchor.as_str(),
        a.color.as_str(),
        a.book_id.as_str(),
        a.text.as_str(),
        a.note.as_deref(),
        a.location.as_deref(),
        a.created_at,
        a.updated_at,
    )
}

/// Sort annotations into reading order
///
/// The strategy chain is not transitive when annotations carry different
/// subsets of metadata, and `slice::sort_by` may panic on such comparators.
/// A stable insertion sort is used instead; one book rarely has more than a
/// few hundred highlights.
///
/// The input is first put into a canonical order, so the result depends only
/// on which annotations are given and never on the order they arrived in.
pub fn sort_annotations(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    annotations.sort_by(|a, b| canonical_key(a).cmp(&canonical_key(b)));

    let order: Vec<usize> = {
        let keys: Vec<SortKey<'_>> = annotations.iter().map(SortKey::new).collect();
        let mut order: Vec<usize> = Vec::with_capacity(keys.len());

        for i in 0..keys.len() {
            let at = order
                .iter()
                .rposition(|&j| compare_keys(&keys[j], &keys[i]) != Ordering::Greater)
                .map_or(0, |p| p + 1);
            order.insert(at, i);
        }

        order
    };

    let mut slots: Vec<Option<Annotation>> = annotations.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
