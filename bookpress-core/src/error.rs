//! Error types for Bookpress Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PressError
pub type Result<T> = std::result::Result<T, PressError>;

/// Top-level error type for press operations
#[derive(Debug, Error)]
pub enum PressError {
    #[error("Title not in print: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Title lock poisoned: {0}")]
    Poisoned(String),
}

/// Errors that occur while parsing a source text
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing body marker in {0}")]
    MissingBodyMarker(String),

    #[error("Invalid UTF-8 in {0}")]
    InvalidEncoding(String),
}

/// Errors that occur in a source library backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid title key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::BackendError(e.to_string()),
        }
    }
}

/// Errors surfaced by the vending machine to its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendingError {
    #[error("Invalid coin denomination {0}. Acceptable values are 1, 2, 5, 10, 20, 50, 100 and 200")]
    InvalidCoin(u32),

    #[error("Invalid book index {index} (shelf holds {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Insufficient funds in cassette: price {price}, inserted {cassette}")]
    InsufficientFunds { price: u32, cassette: u32 },

    #[error("{0} is full")]
    Overflow(&'static str),
}

/// Errors that occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),
}
