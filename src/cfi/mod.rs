//! CFI (Canonical Fragment Identifier) positions for EPUB highlights
//!
//! This module parses EPUB CFI strings into comparable positions and
//! provides the ordering and distance operations used to put highlights in
//! reading order and to detect fragments that sit next to each other.
//!
//! # Example CFI
//!
//! ```text
//! epubcfi(/6/4[chapter1]!/4/2/1:42)
//!         │  │          │ │ │ │ └── character offset 42
//!         │  │          │ │ │ └──── text node (odd = text)
//!         │  │          │ │ └────── element index
//!         │  │          │ └──────── element index (body)
//!         │  │          └────────── indirection (into content doc)
//!         │  └───────────────────── spine item with ID
//!         └──────────────────────── spine element
//! ```
//!
//! Everything before the `!` is the spine path, everything after it is the
//! content path.
//!
//! # Usage
//!
//! ```
//! use marginalia::cfi::{are_adjacent, is_before, parse};
//!
//! let a = parse("epubcfi(/6/4!/4/2/1:10)").unwrap();
//! let b = parse("epubcfi(/6/4!/4/2/1:20)").unwrap();
//! assert!(is_before(&a, &b));
//! assert!(are_adjacent(&a, &b, 50.0));
//!
//! assert!(parse("not a position").is_none());
//! ```

mod comparator;
mod parser;
mod types;

pub use types::{ParsedPosition, PositionComponent};

pub use parser::parse;

pub use comparator::{
    are_adjacent, compare_position_strings, distance, is_before, CONTENT_WEIGHT, SPINE_WEIGHT,
};
