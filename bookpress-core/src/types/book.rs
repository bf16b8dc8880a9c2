//! The printed book record - one physical copy coming off the press

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Non-whitespace characters that fit on one page
pub const CHARS_PER_PAGE: usize = 750;

/// A single printed copy of a title
///
/// Records are immutable once printed. The `id` tells physical copies apart;
/// everything else is shared by every copy of the same print run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    id: Uuid,
    title: String,
    author: String,
    content: String,
    edition: u32,
}

impl BookRecord {
    /// Create a new copy with a fresh id
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        edition: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            content: content.into(),
            edition,
        }
    }

    /// Unique id of this physical copy
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn edition(&self) -> u32 {
        self.edition
    }

    /// Number of pages, rounded up
    pub fn pages(&self) -> usize {
        page_count(&self.content)
    }
}

/// Count pages for a body of text: non-whitespace characters over
/// [`CHARS_PER_PAGE`], rounded up.
pub fn page_count(content: &str) -> usize {
    content
        .chars()
        .filter(|c| !c.is_whitespace())
        .count()
        .div_ceil(CHARS_PER_PAGE)
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Edition: {}", self.edition)
    }
}
