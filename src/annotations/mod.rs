//! Annotation module
//!
//! Highlight records exported by the reading service, and the operations
//! that put them in order before reconciliation.
//!
//! # Features
//!
//! - Reading-order sort with fallbacks for unusable positions:
//!   - CFI begin anchor
//!   - Device location marker
//!   - Creation / modification time
//!   - Annotation id
//!
//! - Partitioning by book or highlight color
//!
//! - JSON decoding of upstream batches

mod grouping;
mod ordering;
mod types;

pub use grouping::{group_by_book, group_by_color, group_by_key};
pub use ordering::{compare_annotations, sort_annotations};
pub use types::{from_json, Annotation};
