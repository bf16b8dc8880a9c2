//! Per-title shelves and edition counters

use crate::error::{PressError, Result};
use crate::types::BookRecord;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Stock held for a single title: its current edition and a bounded FIFO shelf
#[derive(Debug)]
pub struct TitleStock {
    edition: u32,
    shelf: VecDeque<BookRecord>,
    capacity: usize,
}

impl TitleStock {
    fn new(capacity: usize) -> Self {
        Self {
            edition: 0,
            shelf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn edition(&self) -> u32 {
        self.edition
    }

    /// Copies currently on the shelf
    pub fn len(&self) -> usize {
        self.shelf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelf.is_empty()
    }

    /// Remove up to `n` copies from the front of the shelf, oldest first
    pub fn take_up_to(&mut self, n: usize) -> Vec<BookRecord> {
        let count = n.min(self.shelf.len());
        self.shelf.drain(..count).collect()
    }

    /// Append copies to the back of the shelf until it is full.
    /// Returns how many were shelved; the rest are dropped.
    pub fn refill(&mut self, copies: Vec<BookRecord>) -> usize {
        let room = self.capacity.saturating_sub(self.shelf.len());
        let offered = copies.len();
        self.shelf.extend(copies.into_iter().take(room));
        let shelved = offered.min(room);
        if shelved < offered {
            tracing::debug!("Shelf full, dropped {} copies", offered - shelved);
        }
        shelved
    }

    /// Advance the edition counter, returning the new edition
    pub fn bump_edition(&mut self) -> u32 {
        self.edition += 1;
        self.edition
    }
}

/// Shelves for every title the press knows about
///
/// The set of titles is fixed at construction. Each title sits behind its own
/// mutex so requests for different titles never block each other.
#[derive(Debug)]
pub struct InventoryStore {
    capacity: usize,
    titles: HashMap<String, Mutex<TitleStock>>,
}

impl InventoryStore {
    /// Create empty stock (edition 0, empty shelf) for each title-key
    pub fn new<I, S>(keys: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles = keys
            .into_iter()
            .map(|key| (key.into(), Mutex::new(TitleStock::new(capacity))))
            .collect();
        Self { capacity, titles }
    }

    /// Maximum copies kept on each shelf
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &str) -> bool {
        self.titles.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.titles.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Take exclusive access to one title's stock
    pub fn lock(&self, key: &str) -> Result<MutexGuard<'_, TitleStock>> {
        self.titles
            .get(key)
            .ok_or_else(|| PressError::NotFound(key.to_string()))?
            .lock()
            .map_err(|_| PressError::Poisoned(key.to_string()))
    }

    /// Current edition of a title
    pub fn edition(&self, key: &str) -> Result<u32> {
        Ok(self.lock(key)?.edition())
    }

    /// Copies currently shelved for a title
    pub fn shelf_len(&self, key: &str) -> Result<usize> {
        Ok(self.lock(key)?.len())
    }
}
