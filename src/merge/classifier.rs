//! Split-highlight detection
//!
//! Reading devices sometimes store one highlight as several records when the
//! selection crosses a page or chapter boundary. The classifier decides
//! whether two annotations that sit next to each other in reading order are
//! such fragments. Four signals are checked in order; the first failure
//! rejects the pair:
//!
//! 1. same highlight color
//! 2. end of the first close to start of the second
//! 3. first text does not end a sentence
//! 4. created close together in time
//!
//! Signals 2 and 4 are inconclusive when the data is missing or unusable,
//! and inconclusive never blocks a merge.

use serde::{Deserialize, Serialize};

use crate::annotations::Annotation;
use crate::cfi;

/// Characters that end a sentence, so the next fragment starts a new one
const SENTENCE_TERMINATORS: [char; 5] = ['.', '!', '?', '"', '\''];

/// Thresholds for the merge heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConfig {
    /// Max absolute CFI distance between two fragments
    pub position_threshold: f64,
    /// Max gap between creation times, in seconds
    pub time_threshold_secs: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            position_threshold: 100.0,
            time_threshold_secs: 60.0,
        }
    }
}

impl MergeConfig {
    /// Create a config with explicit thresholds
    pub fn new(position_threshold: f64, time_threshold_secs: f64) -> Self {
        Self {
            position_threshold,
            time_threshold_secs,
        }
    }

    /// Override the position threshold
    pub fn with_position_threshold(mut self, threshold: f64) -> Self {
        self.position_threshold = threshold;
        self
    }

    /// Override the time threshold
    pub fn with_time_threshold_secs(mut self, seconds: f64) -> Self {
        self.time_threshold_secs = seconds;
        self
    }
}

/// Outcome of a single signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Evidence for a merge
    Pass,
    /// Evidence against a merge
    Fail,
    /// Not enough data to tell
    Inconclusive,
}

impl Signal {
    fn from_check(passed: bool) -> Self {
        if passed {
            Signal::Pass
        } else {
            Signal::Fail
        }
    }

    /// Whether this signal allows a merge
    pub fn allows_merge(self) -> bool {
        !matches!(self, Signal::Fail)
    }
}

/// Which signal rejected a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Highlight colors differ
    Color,
    /// Fragments are too far apart
    Position,
    /// First fragment ends a sentence
    Continuity,
    /// Fragments were created too far apart in time
    Time,
}

/// Decision for a pair of annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// The pair is one highlight
    Merge,
    /// The pair stays separate, with the first signal that failed
    Reject(SignalKind),
}

impl MergeDecision {
    /// Whether the pair should be merged
    pub fn is_merge(self) -> bool {
        matches!(self, MergeDecision::Merge)
    }
}

/// Colors must match exactly
pub fn color_signal(first: &Annotation, second: &Annotation) -> Signal {
    Signal::from_check(first.group_key() == second.group_key())
}

/// End of `first` must be within `threshold` of the start of `second`
pub fn position_signal(first: &Annotation, second: &Annotation, threshold: f64) -> Signal {
    match (first.end_position(), second.begin_position()) {
        (Some(end), Some(begin)) => Signal::from_check(cfi::are_adjacent(&end, &begin, threshold)),
        _ => Signal::Inconclusive,
    }
}

/// `first` must not end with sentence-terminating punctuation
///
/// A capitalized continuation is not treated as a break, since it may just
/// be a proper noun.
pub fn continuity_signal(first: &Annotation) -> Signal {
    let ends_sentence = first.text.trim().ends_with(&SENTENCE_TERMINATORS[..]);
    Signal::from_check(!ends_sentence)
}

/// Creation times must be within `threshold_secs` of each other
pub fn time_signal(first: &Annotation, second: &Annotation, threshold_secs: f64) -> Signal {
    match (first.created_at, second.created_at) {
        (Some(a), Some(b)) => {
            let gap = if a > b { a - b } else { b - a };
            let gap_secs = gap.num_seconds() as f64 + f64::from(gap.subsec_nanos()) / 1e9;
            Signal::from_check(gap_secs <= threshold_secs)
        }
        _ => Signal::Inconclusive,
    }
}

/// Decides whether adjacent annotations are fragments of one highlight
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeClassifier {
    config: MergeConfig,
}

impl MergeClassifier {
    /// Create a classifier with the given thresholds
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Evaluate all signals, stopping at the first rejection
    ///
    /// Only meaningful for annotations that are next to each other in
    /// reading order within one color group.
    pub fn evaluate(&self, first: &Annotation, second: &Annotation) -> MergeDecision {
        if !color_signal(first, second).allows_merge() {
            return MergeDecision::Reject(SignalKind::Color);
        }
        if !position_signal(first, second, self.config.position_threshold).allows_merge() {
            return MergeDecision::Reject(SignalKind::Position);
        }
        if !continuity_signal(first).allows_merge() {
            return MergeDecision::Reject(SignalKind::Continuity);
        }
        if !time_signal(first, second, self.config.time_threshold_secs).allows_merge() {
            return MergeDecision::Reject(SignalKind::Time);
        }
        MergeDecision::Merge
    }

    /// Whether `second` continues the highlight started by `first`
    pub fn should_merge(&self, first: &Annotation, second: &Annotation) -> bool {
        self.evaluate(first, second).is_merge()
    }
}
