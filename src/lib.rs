//! Marginalia Library
//!
//! Puts e-reader highlights in reading order and reconciles highlights that
//! the device split across a page or chapter boundary.
//!
//! # Modules
//!
//! - `cfi`: EPUB CFI parsing, ordering and distance
//! - `annotations`: Highlight records, sorting and grouping
//! - `merge`: Split-highlight classification and merging
//! - `config`: Environment-based configuration
//!
//! # Example
//!
//! ```
//! use marginalia::annotations::Annotation;
//! use marginalia::merge::HighlightMerger;
//!
//! let first = Annotation::new(
//!     "a", "book-1", "yellow",
//!     "epubcfi(/6/14!/4/2/1:10)", "epubcfi(/6/14!/4/2/1:40)",
//!     "It was the best",
//! );
//! let second = Annotation::new(
//!     "b", "book-1", "yellow",
//!     "epubcfi(/6/14!/4/2/1:55)", "epubcfi(/6/14!/4/2/1:90)",
//!     "of times",
//! );
//!
//! let outcome = HighlightMerger::default().merge_with_stats(vec![first, second]);
//! assert_eq!(outcome.reduction_count(), 1);
//! assert_eq!(outcome.annotations[0].text, "It was the best of times");
//! ```

pub mod annotations;
pub mod cfi;
pub mod config;
pub mod error;
pub mod merge;

pub use error::{Error, Result};
