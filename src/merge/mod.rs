//! Merge module for split highlights
//!
//! Provides:
//! - Pairwise classification of adjacent fragments
//! - Fragment combination with composite ids
//! - Per-book merge passes with statistics
//!
//! # Merge Pass
//!
//! 1. Sort the book's annotations into reading order
//! 2. Split them by highlight color
//! 3. Within each color, fold each annotation into the previous one when
//!    the classifier accepts the pair
//! 4. Put all colors back into a single reading order
//! 5. Repeat until a pass folds nothing
//!
//! # Classification
//!
//! - Colors never mix
//! - Positions must be close, unless they cannot be parsed
//! - A fragment ending a sentence is never continued
//! - Creation times must be close, unless one is missing

mod classifier;
mod merger;

pub use classifier::{
    color_signal, continuity_signal, position_signal, time_signal, MergeClassifier, MergeConfig,
    MergeDecision, Signal, SignalKind,
};
pub use merger::{combine, composite_id, HighlightMerger, MergeOutcome, ID_SEPARATOR};
