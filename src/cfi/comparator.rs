//! CFI Comparison, Ordering and Distance
//!
//! Implements reading-order comparison for parsed positions, plus a signed
//! distance heuristic used to decide whether two positions are close enough
//! to belong to one highlight.

use std::cmp::Ordering;

use super::types::*;

/// Weight of a one-step difference in the spine path
pub const SPINE_WEIGHT: f64 = 1_000_000.0;

/// Weight of a one-step difference in the content path
pub const CONTENT_WEIGHT: f64 = 1_000.0;

impl PartialEq for PositionComponent {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for PositionComponent {}

impl Ord for PositionComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Labels are descriptive only
        self.index.cmp(&other.index)
    }
}

impl PartialOrd for PositionComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParsedPosition {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParsedPosition {}

impl Ord for ParsedPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_steps(&self.spine_path, &other.spine_path)
            .then_with(|| compare_steps(&self.content_path, &other.content_path))
            .then_with(|| self.effective_offset().cmp(&other.effective_offset()))
    }
}

impl PartialOrd for ParsedPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two step sequences
fn compare_steps(a: &[PositionComponent], b: &[PositionComponent]) -> Ordering {
    for (step_a, step_b) in a.iter().zip(b.iter()) {
        let cmp = step_a.cmp(step_b);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    // Shorter path comes first on a shared prefix
    a.len().cmp(&b.len())
}

/// Weighted difference at the first diverging step, if any
fn step_distance(from: &[PositionComponent], to: &[PositionComponent], weight: f64) -> Option<f64> {
    from.iter()
        .zip(to.iter())
        .enumerate()
        .find(|(_, (a, b))| a.index != b.index)
        .map(|(depth, (a, b))| (f64::from(b.index) - f64::from(a.index)) * weight + depth as f64)
}

/// Signed distance from one position to another
///
/// Not a metric: only the magnitude is meaningful, and only for
/// thresholding. A spine step always outweighs any content step, and a
/// content step always outweighs any plausible character offset.
pub fn distance(from: &ParsedPosition, to: &ParsedPosition) -> f64 {
    if let Some(d) = step_distance(&from.spine_path, &to.spine_path, SPINE_WEIGHT) {
        return d;
    }
    if let Some(d) = step_distance(&from.content_path, &to.content_path, CONTENT_WEIGHT) {
        return d;
    }
    f64::from(to.effective_offset()) - f64::from(from.effective_offset())
}

/// Check whether two positions are within `threshold` of each other
pub fn are_adjacent(first: &ParsedPosition, second: &ParsedPosition, threshold: f64) -> bool {
    distance(first, second).abs() <= threshold
}

/// Determine if position `a` comes before position `b` in reading order
pub fn is_before(a: &ParsedPosition, b: &ParsedPosition) -> bool {
    a < b
}

/// Compare two CFI strings, returning their ordering
/// Returns None if either CFI is unparsable
pub fn compare_position_strings(a: &str, b: &str) -> Option<Ordering> {
    let pos_a = super::parser::parse(a)?;
    let pos_b = super::parser::parse(b)?;
    Some(pos_a.cmp(&pos_b))
}
