//! CFI Parser
//!
//! Parses EPUB CFI strings into comparable `ParsedPosition` values.
//!
//! Highlights exported by reading devices carry positions of very uneven
//! quality, so parsing is lenient: anything that does not look like a step is
//! skipped, and only a missing spine path makes the whole string unusable.
//!
//! Grammar accepted (simplified):
//! ```text
//! position  = ["epubcfi("] spine ["!" content [":" offset]] [")"]
//! spine     = step+
//! content   = step*
//! step      = "/" number ["[" label "]"]
//! ```

use super::types::{ParsedPosition, PositionComponent};

const WRAPPER_OPEN: &str = "epubcfi(";
const WRAPPER_CLOSE: char = ')';

/// Scanner state over one part of a position string
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance past the next occurrence of `target`
    fn skip_past(&mut self, target: char) -> bool {
        while let Some(ch) = self.advance() {
            if ch == target {
                return true;
            }
        }
        false
    }

    /// Consume a maximal run of ASCII digits
    fn digits(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// Parse label text after an opening bracket, handling `^` escapes
    fn label(&mut self) -> Option<String> {
        let start = self.pos;
        let mut label = String::new();
        let mut escaped = false;

        while let Some(ch) = self.advance() {
            if escaped {
                label.push(ch);
                escaped = false;
            } else if ch == '^' {
                escaped = true;
            } else if ch == ']' {
                return Some(label);
            } else {
                label.push(ch);
            }
        }

        // Unclosed bracket: drop the label and keep scanning its contents
        self.pos = start;
        None
    }

    /// Collect every `/index[label]` step in the input
    fn components(mut self) -> Vec<PositionComponent> {
        let mut steps = Vec::new();

        while self.skip_past('/') {
            // No digits (or too many for u32) means no step here
            let Ok(index) = self.digits().parse::<u32>() else {
                continue;
            };
            let label = if self.skip_if('[') { self.label() } else { None };
            steps.push(PositionComponent { index, label });
        }

        steps
    }
}

/// Strip the `epubcfi(...)` wrapper if present
fn unwrap_wrapper(raw: &str) -> &str {
    let Some(start) = raw.find(WRAPPER_OPEN) else {
        return raw;
    };
    let inner = &raw[start + WRAPPER_OPEN.len()..];
    match inner.rfind(WRAPPER_CLOSE) {
        Some(end) => &inner[..end],
        None => inner,
    }
}

/// Split a trailing `:digits` character offset off the content part
fn split_offset(part: &str) -> (&str, Option<u32>) {
    let bytes = part.as_bytes();
    let mut start = bytes.len();
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }

    if start == bytes.len() || start == 0 || bytes[start - 1] != b':' {
        return (part, None);
    }

    // An offset that overflows is still removed from the path
    (&part[..start - 1], part[start..].parse().ok())
}

/// Parse a CFI string into a `ParsedPosition`
///
/// Returns `None` when no spine step can be found. Never panics on
/// malformed input.
pub fn parse(raw: &str) -> Option<ParsedPosition> {
    let content = unwrap_wrapper(raw.trim());

    let (spine_part, document_part) = content.split_once('!').unwrap_or((content, ""));

    let spine_path = Scanner::new(spine_part).components();
    if spine_path.is_empty() {
        tracing::trace!(raw = %raw, "Position has no spine steps");
        return None;
    }

    let (path_part, character_offset) = split_offset(document_part);
    let content_path = Scanner::new(path_part).components();

    Some(ParsedPosition {
        spine_path,
        content_path,
        character_offset,
        raw: raw.to_string(),
    })
}
