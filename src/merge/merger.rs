//! Highlight merging
//!
//! Sorts a book's annotations, splits them by color, folds adjacent
//! fragments together and restores a single reading order.

use serde::Serialize;

use super::classifier::{MergeClassifier, MergeConfig};
use crate::annotations::{group_by_color, sort_annotations, Annotation};

/// Separator between fragment ids in a merged annotation id
pub const ID_SEPARATOR: char = '+';

/// Result of one merge pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// Merged annotations in reading order
    pub annotations: Vec<Annotation>,
    /// Number of annotations before merging
    pub original_count: usize,
    /// Number of annotations after merging
    pub merged_count: usize,
}

impl MergeOutcome {
    /// Number of fragments folded away
    pub fn reduction_count(&self) -> usize {
        self.original_count - self.merged_count
    }

    /// Whether any fragments were folded
    pub fn had_merges(&self) -> bool {
        self.reduction_count() > 0
    }
}

/// Id for the annotation built from `first` and `second`
///
/// Repeated merges nest left to right, so the id of a three-way merge is
/// `a+b+c`. Do not rely on a fixed number of parts.
pub fn composite_id(first: &str, second: &str) -> String {
    format!("{}{}{}", first, ID_SEPARATOR, second)
}

/// Combine two fragments into one annotation spanning both
pub fn combine(first: &Annotation, second: &Annotation) -> Annotation {
    let note = match (&first.note, &second.note) {
        (Some(a), Some(b)) => Some(format!("{}\n{}", a, b)),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    };

    Annotation {
        id: composite_id(&first.id, &second.id),
        text: format!("{} {}", first.text.trim(), second.text.trim()),
        note,
        end_anchor: second.end_anchor.clone(),
        updated_at: second.updated_at.or(first.updated_at),
        ..first.clone()
    }
}

/// Reconciles highlights that a device split into several records
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightMerger {
    classifier: MergeClassifier,
}

impl HighlightMerger {
    /// Create a merger with the given thresholds
    pub fn new(config: MergeConfig) -> Self {
        Self {
            classifier: MergeClassifier::new(config),
        }
    }

    /// The classifier used to pair fragments
    pub fn classifier(&self) -> &MergeClassifier {
        &self.classifier
    }

    /// Merge split highlights of one book
    ///
    /// Passes repeat until one folds nothing. With mixed metadata a fold can
    /// move a merged span in reading order and make two other fragments
    /// adjacent, so the result is only stable once a pass leaves it alone.
    pub fn merge(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        let mut current = annotations;
        loop {
            if current.len() < 2 {
                return current;
            }

            let before = current.len();
            current = self.merge_pass(current);
            if current.len() == before {
                return current;
            }
        }
    }

    /// Merge and report how many fragments were folded
    pub fn merge_with_stats(&self, annotations: Vec<Annotation>) -> MergeOutcome {
        let original_count = annotations.len();
        let book_id = annotations.first().map(|a| a.book_id.clone()).unwrap_or_default();

        let merged = self.merge(annotations);
        let outcome = MergeOutcome {
            original_count,
            merged_count: merged.len(),
            annotations: merged,
        };

        if outcome.had_merges() {
            tracing::info!(
                book_id = %book_id,
                original = outcome.original_count,
                merged = outcome.merged_count,
                reduced = outcome.reduction_count(),
                "Merged split highlights"
            );
        } else {
            tracing::debug!(book_id = %book_id, count = original_count, "No split highlights found");
        }

        outcome
    }

    /// Sort, fold each color group once, restore reading order
    fn merge_pass(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        let merged: Vec<Annotation> = group_by_color(sort_annotations(annotations))
            .into_values()
            .flat_map(|group| self.fold_group(group))
            .collect();

        // Color groups interleave in the book, so restore reading order
        sort_annotations(merged)
    }

    /// Fold one sorted color group, keeping a single pending highlight
    fn fold_group(&self, group: Vec<Annotation>) -> Vec<Annotation> {
        group.into_iter().fold(Vec::new(), |mut folded, next| {
            match folded.pop() {
                Some(current) if self.classifier.should_merge(&current, &next) => {
                    tracing::debug!(first = %current.id, second = %next.id, "Merging highlight fragments");
                    folded.push(combine(&current, &next));
                }
                Some(current) => {
                    folded.push(current);
                    folded.push(next);
                }
                None => folded.push(next),
            }
            folded
        })
    }
}
