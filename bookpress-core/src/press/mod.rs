//! The press: prints copies on demand and keeps each title's shelf stocked
//!
//! A request is served from the shelf first. Any shortfall is printed as a new
//! edition. Whenever a request leaves the shelf empty, the press prints a
//! fresh run (another edition) to refill it for later requests.

mod inventory;
mod printer;

pub use inventory::{InventoryStore, TitleStock};
pub use printer::{Printer, SourceText, BODY_MARKER};

use crate::config::PressConfig;
use crate::error::{ConfigError, PressError, Result, StorageError};
use crate::storage::{LocalLibrary, SourceLibrary};
use crate::types::BookRecord;
use std::sync::Arc;

/// Outcome of a single request
#[derive(Debug)]
pub struct Fulfillment {
    /// Number of copies asked for
    pub requested: usize,

    /// Copies handed out: shelf copies first, then freshly printed ones
    pub copies: Vec<BookRecord>,

    /// How many of `copies` came off the shelf
    pub from_shelf: usize,

    /// How many of `copies` were printed for this request
    pub printed: usize,

    /// Copies printed onto the shelf after the request was served
    pub restocked: usize,

    /// Title edition once the request completed
    pub edition: u32,

    /// Error that cut printing of the shortfall short
    pub print_error: Option<PressError>,

    /// Error that cut the restock short
    pub restock_error: Option<PressError>,
}

impl Fulfillment {
    fn new(requested: usize, edition: u32) -> Self {
        Self {
            requested,
            copies: Vec::new(),
            from_shelf: 0,
            printed: 0,
            restocked: 0,
            edition,
            print_error: None,
            restock_error: None,
        }
    }

    /// Whether fewer copies were handed out than requested
    pub fn is_short(&self) -> bool {
        self.copies.len() < self.requested
    }
}

/// Prints and shelves copies of every title in a source library
pub struct Press {
    inventory: InventoryStore,
    printer: Printer,
}

impl Press {
    /// Open a press over a local directory of source texts
    pub fn open(config: &PressConfig) -> Result<Self> {
        config.validate()?;
        let library = LocalLibrary::new(config.source_dir.clone());
        tracing::debug!("Opening source library at {}", library.root().display());
        Self::with_library(Arc::new(library), config.shelf_capacity)
    }

    /// Build a press over any source library.
    ///
    /// Every title-key listed by the library enters the catalogue at edition 0
    /// with an empty shelf. A library whose root does not exist yields an empty
    /// catalogue.
    pub fn with_library(library: Arc<dyn SourceLibrary>, shelf_capacity: usize) -> Result<Self> {
        if shelf_capacity == 0 {
            return Err(ConfigError::Validation("shelf capacity must be at least 1".into()).into());
        }

        let keys = match library.list() {
            Ok(keys) => keys,
            Err(StorageError::NotFound(e)) => {
                tracing::warn!("Source library not found, catalogue is empty: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Press opened with {} titles", keys.len());

        Ok(Self {
            inventory: InventoryStore::new(keys, shelf_capacity),
            printer: Printer::new(library),
        })
    }

    /// All title-keys in print, sorted
    pub fn catalogue(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inventory.keys().map(str::to_string).collect();
        keys.sort();
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inventory.contains(key)
    }

    pub fn shelf_capacity(&self) -> usize {
        self.inventory.capacity()
    }

    pub fn edition(&self, key: &str) -> Result<u32> {
        self.inventory.edition(key)
    }

    pub fn shelf_len(&self, key: &str) -> Result<usize> {
        self.inventory.shelf_len(key)
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Request `amount` copies of a title.
    ///
    /// Unknown titles and lock failures are logged and yield no copies. Print
    /// failures shorten the result without failing the request.
    pub fn request(&self, key: &str, amount: usize) -> Vec<BookRecord> {
        match self.fulfill(key, amount) {
            Ok(fulfillment) => fulfillment.copies,
            Err(e) => {
                tracing::warn!("Request for {} x{} refused: {}", key, amount, e);
                Vec::new()
            }
        }
    }

    /// Request `amount` copies of a title and report how it was served.
    ///
    /// Holds the title's lock for the whole call: shelf consumption, printing,
    /// edition bumps and restocking happen atomically with respect to other
    /// requests for the same title.
    pub fn fulfill(&self, key: &str, amount: usize) -> Result<Fulfillment> {
        let mut stock = self.inventory.lock(key)?;
        let mut report = Fulfillment::new(amount, stock.edition());
        if amount == 0 {
            return Ok(report);
        }

        report.copies = stock.take_up_to(amount);
        report.from_shelf = report.copies.len();

        let shortfall = amount - report.from_shelf;
        if shortfall > 0 {
            let (printed, error) = self.print_run(key, stock.edition() + 1, shortfall);
            if !printed.is_empty() {
                stock.bump_edition();
            }
            report.printed = printed.len();
            report.copies.extend(printed);
            report.print_error = error;
        }
        tracing::debug!(
            "{}: served {} from shelf, printed {} of {} short",
            key,
            report.from_shelf,
            report.printed,
            shortfall
        );

        // An empty shelf always starts a new edition, even if the run fails
        if stock.is_empty() {
            let edition = stock.bump_edition();
            let (restock, error) = self.print_run(key, edition, self.inventory.capacity());
            tracing::info!(
                "{}: restocked {} copies at edition {}",
                key,
                restock.len(),
                edition
            );
            report.restocked = stock.refill(restock);
            report.restock_error = error;
        }

        report.edition = stock.edition();
        Ok(report)
    }

    /// Print up to `count` copies at one edition, stopping at the first failure
    fn print_run(
        &self,
        key: &str,
        edition: u32,
        count: usize,
    ) -> (Vec<BookRecord>, Option<PressError>) {
        let mut copies = Vec::with_capacity(count);
        for _ in 0..count {
            match self.printer.print(key, edition) {
                Ok(copy) => copies.push(copy),
                Err(e) => return (copies, Some(e)),
            }
        }
        (copies, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLibrary;

    fn source(title: &str) -> String {
        format!(
            "Title: {}\nAuthor: Test Author\n\n*** START OF THE BOOK ***\nOnce upon a time.\n",
            title
        )
    }

    fn press_with(titles: &[&str], capacity: usize) -> (Press, Arc<MemoryLibrary>) {
        let library = Arc::new(MemoryLibrary::new());
        for title in titles {
            library.insert(*title, source(title));
        }
        let press = Press::with_library(library.clone(), capacity).unwrap();
        (press, library)
    }

    #[test]
    fn test_catalogue() {
        let (press, _) = press_with(&["b.txt", "a.txt"], 5);
        assert_eq!(press.catalogue(), vec!["a.txt", "b.txt"]);
        assert!(press.contains("a.txt"));
        assert!(!press.contains("c.txt"));
    }

    #[test]
    fn test_first_request_prints_then_restocks() {
        let (press, _) = press_with(&["A"], 5);

        let report = press.fulfill("A", 3).unwrap();
        assert_eq!(report.copies.len(), 3);
        assert_eq!(report.from_shelf, 0);
        assert_eq!(report.printed, 3);
        assert!(report.copies.iter().all(|b| b.edition() == 1));
        assert_eq!(report.restocked, 5);
        assert_eq!(report.edition, 2);
        assert!(!report.is_short());

        assert_eq!(press.edition("A").unwrap(), 2);
        assert_eq!(press.shelf_len("A").unwrap(), 5);
    }

    #[test]
    fn test_request_served_from_shelf() {
        let (press, _) = press_with(&["A"], 5);
        press.request("A", 1);

        let report = press.fulfill("A", 2).unwrap();
        assert_eq!(report.from_shelf, 2);
        assert_eq!(report.printed, 0);
        assert_eq!(report.restocked, 0);
        assert!(report.copies.iter().all(|b| b.edition() == 2));
        assert_eq!(press.shelf_len("A").unwrap(), 3);
        assert_eq!(press.edition("A").unwrap(), 2);
    }

    #[test]
    fn test_emptying_shelf_exactly_triggers_restock() {
        let (press, _) = press_with(&["A"], 5);
        press.request("A", 1);

        let report = press.fulfill("A", 5).unwrap();
        assert_eq!(report.from_shelf, 5);
        assert_eq!(report.printed, 0);
        assert_eq!(report.restocked, 5);
        assert_eq!(report.edition, 3);
        assert_eq!(press.shelf_len("A").unwrap(), 5);
    }

    #[test]
    fn test_shelf_then_shortfall_editions() {
        let (press, _) = press_with(&["A"], 2);
        press.request("A", 1); // edition 2, shelf of 2

        let copies = press.request("A", 5);
        let editions: Vec<u32> = copies.iter().map(|b| b.edition()).collect();
        assert_eq!(editions, vec![2, 2, 3, 3, 3]);
        assert_eq!(press.edition("A").unwrap(), 4);
        assert_eq!(press.shelf_len("A").unwrap(), 2);
    }

    #[test]
    fn test_zero_amount_changes_nothing() {
        let (press, _) = press_with(&["A"], 5);
        assert!(press.request("A", 0).is_empty());
        assert_eq!(press.edition("A").unwrap(), 0);
        assert_eq!(press.shelf_len("A").unwrap(), 0);
    }

    #[test]
    fn test_unknown_title() {
        let (press, _) = press_with(&["A"], 5);
        assert!(press.request("unknown.txt", 1).is_empty());
        assert!(matches!(
            press.fulfill("unknown.txt", 1),
            Err(PressError::NotFound(_))
        ));
        assert_eq!(press.edition("A").unwrap(), 0);
    }

    #[test]
    fn test_missing_source_yields_short_result() {
        let (press, library) = press_with(&["A"], 5);
        library.remove("A");

        let report = press.fulfill("A", 3).unwrap();
        assert!(report.copies.is_empty());
        assert!(report.is_short());
        assert!(report.print_error.is_some());
        assert!(report.restock_error.is_some());
        assert_eq!(report.edition, 1);
        assert_eq!(press.shelf_len("A").unwrap(), 0);
    }

    /// Serves a fixed number of reads, then reports every source as missing
    struct FailingAfter {
        inner: MemoryLibrary,
        reads_left: std::sync::Mutex<usize>,
    }

    impl SourceLibrary for FailingAfter {
        fn read(&self, key: &str) -> crate::storage::StorageResult<Vec<u8>> {
            let mut left = self.reads_left.lock().unwrap();
            if *left == 0 {
                return Err(StorageError::NotFound(key.to_string()));
            }
            *left -= 1;
            self.inner.read(key)
        }

        fn list(&self) -> crate::storage::StorageResult<Vec<String>> {
            self.inner.list()
        }
    }

    #[test]
    fn test_failed_restock_still_advances_edition() {
        let inner = MemoryLibrary::new();
        inner.insert("A", source("A"));
        let library = FailingAfter {
            inner,
            reads_left: std::sync::Mutex::new(3),
        };
        let press = Press::with_library(Arc::new(library), 5).unwrap();

        let report = press.fulfill("A", 3).unwrap();
        assert_eq!(report.copies.len(), 3);
        assert!(report.copies.iter().all(|b| b.edition() == 1));
        assert!(report.print_error.is_none());
        assert_eq!(report.restocked, 0);
        assert!(report.restock_error.is_some());
        assert_eq!(report.edition, 2);
        assert_eq!(press.shelf_len("A").unwrap(), 0);
    }

    #[test]
    fn test_source_restored_after_failure() {
        let (press, library) = press_with(&["A"], 5);
        library.remove("A");
        assert!(press.request("A", 2).is_empty());
        assert_eq!(press.edition("A").unwrap(), 1);

        library.insert("A", source("A"));
        let copies = press.request("A", 2);
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].edition(), 2);
        assert_eq!(press.edition("A").unwrap(), 3);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let library = Arc::new(MemoryLibrary::new());
        assert!(matches!(
            Press::with_library(library, 0),
            Err(PressError::Config(_))
        ));
    }
}
