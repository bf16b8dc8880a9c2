//! Printer: turns a source text into a printed copy
//!
//! Source texts follow the Project Gutenberg plain-text layout: a free-form
//! header carrying `Title:` and `Author:` lines, then a `*** START OF` marker
//! where the body begins.

use crate::error::{ParseError, PressError, Result};
use crate::storage::SourceLibrary;
use crate::types::BookRecord;
use regex::Regex;
use std::sync::Arc;

/// Marks the start of the body in a source text
pub const BODY_MARKER: &str = "*** START OF";

/// Title, author and body extracted from a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub title: String,
    pub author: String,
    pub body: String,
}

/// Prints copies of titles held in a [`SourceLibrary`]
pub struct Printer {
    library: Arc<dyn SourceLibrary>,
    title_pattern: Regex,
    author_pattern: Regex,
}

impl Printer {
    pub fn new(library: Arc<dyn SourceLibrary>) -> Self {
        Self {
            library,
            title_pattern: header_pattern("Title"),
            author_pattern: header_pattern("Author"),
        }
    }

    /// Print one copy of a title at the given edition.
    ///
    /// The source is re-read on every call. Failures are logged here and
    /// returned; callers stop the current print run on the first one.
    pub fn print(&self, key: &str, edition: u32) -> Result<BookRecord> {
        match self.read_source(key) {
            Ok(source) => Ok(BookRecord::new(
                source.title,
                source.author,
                source.body,
                edition,
            )),
            Err(e) => {
                tracing::warn!("Failed to print {} (edition {}): {}", key, edition, e);
                Err(e)
            }
        }
    }

    /// Read and parse the source for a title without printing it
    pub fn read_source(&self, key: &str) -> Result<SourceText> {
        let raw = self.library.read(key)?;
        let text =
            String::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding(key.to_string()))?;
        self.parse(key, &text)
    }

    /// Split a source text into header fields and body
    pub fn parse(&self, key: &str, text: &str) -> Result<SourceText> {
        let text = normalize_lines(text);

        let start = text
            .find(BODY_MARKER)
            .ok_or_else(|| PressError::from(ParseError::MissingBodyMarker(key.to_string())))?;

        let header = &text[..start];
        Ok(SourceText {
            title: extract_field(&self.title_pattern, header),
            author: extract_field(&self.author_pattern, header),
            body: text[start..].to_string(),
        })
    }
}

/// Case-insensitive `Label: value` matcher. The value runs to end of line.
fn header_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}:\s*(.+)", regex::escape(label)))
        .expect("header pattern is a valid regex")
}

/// First match of a header field, trimmed. Missing fields are empty.
fn extract_field(pattern: &Regex, header: &str) -> String {
    pattern
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Re-join lines with `\n`, terminating every line (including the last)
fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}
