//! Bookpress Core Library
//!
//! A two-stage book distribution pipeline. The [`Press`] prints copies of
//! titles from plain-text sources and keeps a small shelf of each title in
//! stock; a [`VendingMachine`] sells printed copies to customers for coins.

pub mod config;
pub mod error;
pub mod press;
pub mod storage;
pub mod types;
pub mod vending;

pub use config::{Config, PressConfig, VendingConfig};
pub use error::{ConfigError, ParseError, PressError, Result, StorageError, VendingError};
pub use press::{Fulfillment, Press, Printer};
pub use storage::{LocalLibrary, MemoryLibrary, SourceLibrary};
pub use types::{page_count, BookRecord};
pub use vending::VendingMachine;
