//! Annotation records as exported by the reading service
//!
//! An annotation is one highlight as the device reported it. A device may
//! split a single logical highlight into several records when the selection
//! crosses a page or chapter boundary; those records are reconciled by the
//! `merge` module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cfi::{self, ParsedPosition};
use crate::error::Result;

/// A highlight annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Stable identifier, composite (`a+b`) for merged highlights
    pub id: String,
    /// The book this annotation belongs to
    pub book_id: String,
    /// Highlight color as reported by the device (case-sensitive)
    pub color: String,
    /// CFI where the highlighted span starts
    pub begin_anchor: String,
    /// CFI where the highlighted span ends
    pub end_anchor: String,
    /// The highlighted passage
    pub text: String,
    /// Optional note attached by the reader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Device-native location marker (e.g. "1234-1240")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Annotation {
    /// Create a highlight spanning `begin_anchor..end_anchor`
    pub fn new(
        id: &str,
        book_id: &str,
        color: &str,
        begin_anchor: &str,
        end_anchor: &str,
        text: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            book_id: book_id.to_string(),
            color: color.to_string(),
            begin_anchor: begin_anchor.to_string(),
            end_anchor: end_anchor.to_string(),
            text: text.to_string(),
            note: None,
            location: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the note
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Set the device location marker
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the modification timestamp
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Key used to partition highlights before merging
    pub fn group_key(&self) -> &str {
        &self.color
    }

    /// Parsed start position, if the anchor is usable
    pub fn begin_position(&self) -> Option<ParsedPosition> {
        cfi::parse(&self.begin_anchor)
    }

    /// Parsed end position, if the anchor is usable
    pub fn end_position(&self) -> Option<ParsedPosition> {
        cfi::parse(&self.end_anchor)
    }

    /// Leading number of the device location marker
    ///
    /// `"1234-1240"` yields `1234.0`, `"12.5%"` yields `12.5`.
    pub fn location_value(&self) -> Option<f64> {
        let location = self.location.as_deref()?.trim_start();
        let mut end = 0;
        let mut seen_dot = false;

        for (i, ch) in location.char_indices() {
            match ch {
                '0'..='9' => end = i + 1,
                '.' if !seen_dot && end == i && i > 0 => seen_dot = true,
                _ => break,
            }
        }

        if end == 0 {
            return None;
        }
        location[..end].parse().ok()
    }

    /// Check whether this annotation carries any highlighted text
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Decode a batch of annotations from the JSON exported upstream
pub fn from_json(json: &str) -> Result<Vec<Annotation>> {
    Ok(serde_json::from_str(json)?)
}
