//! Parsed position types for EPUB CFI strings
//!
//! A position is reduced to the parts that matter for ordering highlights:
//! the spine path (which content document), the content path (where inside
//! that document) and an optional character offset.
//! Format: epubcfi(/6/4[chap01ref]!/4/2/22/3:268)
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single step in a position path
///
/// Only `index` takes part in equality and ordering. The label is the
/// optional ID assertion (`/4[chapter1]`) and is kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionComponent {
    /// Child index of this step (even = element, odd = text node)
    pub index: u32,
    /// Optional ID assertion attached to the step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A parsed CFI position
///
/// `spine_path` is never empty: strings that do not select a content
/// document fail to parse instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPosition {
    /// Steps before the indirection (`/6/4` selects a spine item)
    pub spine_path: Vec<PositionComponent>,
    /// Steps inside the content document
    pub content_path: Vec<PositionComponent>,
    /// Character offset within the final text node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_offset: Option<u32>,
    /// The string this position was parsed from
    pub raw: String,
}

impl PositionComponent {
    /// Create a step without a label
    pub fn new(index: u32) -> Self {
        Self { index, label: None }
    }

    /// Create a step with an ID assertion
    pub fn with_label(index: u32, label: impl Into<String>) -> Self {
        Self {
            index,
            label: Some(label.into()),
        }
    }
}

impl ParsedPosition {
    /// Character offset, with a missing offset counting as zero
    pub fn effective_offset(&self) -> u32 {
        self.character_offset.unwrap_or(0)
    }

    /// Get the spine index if this position uses the standard `/6/N` form
    pub fn spine_index(&self) -> Option<u32> {
        // /6 is the spine element in the package document and /N is
        // 2*(spine_index+1), so spine items are numbered 2, 4, 6...
        match self.spine_path.as_slice() {
            [package, item, ..] if package.index == 6 => {
                Some((item.index / 2).saturating_sub(1))
            }
            _ => None,
        }
    }
}

// Display implementations for diagnostics

impl fmt::Display for PositionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.index)?;
        if let Some(ref label) = self.label {
            write!(f, "[")?;
            for ch in label.chars() {
                if matches!(ch, '[' | ']' | '^') {
                    write!(f, "^")?;
                }
                write!(f, "{}", ch)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl fmt::Display for ParsedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epubcfi(")?;
        for step in &self.spine_path {
            write!(f, "{}", step)?;
        }
        if !self.content_path.is_empty() || self.character_offset.is_some() {
            write!(f, "!")?;
            for step in &self.content_path {
                write!(f, "{}", step)?;
            }
            if let Some(offset) = self.character_offset {
                write!(f, ":{}", offset)?;
            }
        }
        write!(f, ")")
    }
}
