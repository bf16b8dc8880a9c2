//! Core value types

mod book;

pub use book::{page_count, BookRecord, CHARS_PER_PAGE};
