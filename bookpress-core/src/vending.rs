//! Coin-operated vending machine selling printed copies

use crate::config::VendingConfig;
use crate::error::{ConfigError, VendingError};
use crate::types::BookRecord;
use sha2::{Digest, Sha256};

/// Result type for vending operations
pub type VendingResult<T> = std::result::Result<T, VendingError>;

/// Coin values the machine accepts
pub const DENOMINATIONS: [u32; 8] = [1, 2, 5, 10, 20, 50, 100, 200];

/// A vending machine with a shelf of books, a cassette holding the customer's
/// inserted coins, and a safe holding revenue
pub struct VendingMachine {
    shelf: Vec<BookRecord>,
    location_factor: f64,
    cassette: u32,
    safe: u32,
    password_digest: String,
}

impl VendingMachine {
    /// Create an empty machine. Prices are `ceil(pages * location_factor)`.
    pub fn new(location_factor: f64, password: &str) -> Self {
        Self {
            shelf: Vec::new(),
            location_factor,
            cassette: 0,
            safe: 0,
            password_digest: digest(password),
        }
    }

    /// Create a machine from configuration; a password must be configured
    pub fn from_config(config: &VendingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let password = config.password.as_deref().ok_or_else(|| {
            ConfigError::Validation("vending.password must be set".to_string())
        })?;
        Ok(Self::new(config.location_factor, password))
    }

    /// Total value of coins currently inserted
    pub fn cassette(&self) -> u32 {
        self.cassette
    }

    /// Number of books on the shelf
    pub fn len(&self) -> usize {
        self.shelf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelf.is_empty()
    }

    /// Insert a coin into the cassette
    pub fn insert_coin(&mut self, coin: u32) -> VendingResult<()> {
        if !DENOMINATIONS.contains(&coin) {
            return Err(VendingError::InvalidCoin(coin));
        }
        self.cassette = self
            .cassette
            .checked_add(coin)
            .ok_or(VendingError::Overflow("cassette"))?;
        Ok(())
    }

    /// Abort the transaction, returning every inserted coin's value
    pub fn cancel(&mut self) -> u32 {
        std::mem::take(&mut self.cassette)
    }

    /// Add books to the back of the shelf
    pub fn restock(&mut self, books: Vec<BookRecord>, password: &str) -> VendingResult<()> {
        self.authorize(password)?;
        tracing::debug!("Vending machine restocked with {} books", books.len());
        self.shelf.extend(books);
        Ok(())
    }

    /// Withdraw all revenue from the safe
    pub fn empty_safe(&mut self, password: &str) -> VendingResult<u32> {
        self.authorize(password)?;
        Ok(std::mem::take(&mut self.safe))
    }

    /// One line per book on the shelf, in shelf order
    pub fn catalogue(&self) -> Vec<String> {
        self.shelf.iter().map(|book| book.to_string()).collect()
    }

    /// Price of the book at `index`
    pub fn price(&self, index: usize) -> VendingResult<u32> {
        let book = self.shelf.get(index).ok_or(VendingError::InvalidIndex {
            index,
            len: self.shelf.len(),
        })?;
        Ok((book.pages() as f64 * self.location_factor).ceil() as u32)
    }

    /// Buy the book at `index` with the coins in the cassette.
    ///
    /// The price moves from the cassette to the safe; any remaining credit
    /// stays in the cassette.
    pub fn buy_book(&mut self, index: usize) -> VendingResult<BookRecord> {
        let price = self.price(index)?;
        if price > self.cassette {
            return Err(VendingError::InsufficientFunds {
                price,
                cassette: self.cassette,
            });
        }

        self.safe = self
            .safe
            .checked_add(price)
            .ok_or(VendingError::Overflow("safe"))?;
        self.cassette -= price;
        let book = self.shelf.remove(index);
        tracing::info!("Sold '{}' (edition {}) for {}", book.title(), book.edition(), price);
        Ok(book)
    }

    fn authorize(&self, password: &str) -> VendingResult<()> {
        if digest(password) == self.password_digest {
            Ok(())
        } else {
            Err(VendingError::InvalidPassword)
        }
    }
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "password123";

    /// A book of exactly `pages` pages
    fn book(title: &str, pages: usize) -> BookRecord {
        BookRecord::new(title, "Author", "x".repeat(pages * 750), 1)
    }

    fn stocked(factor: f64) -> VendingMachine {
        let mut machine = VendingMachine::new(factor, PASSWORD);
        machine
            .restock(vec![book("book1", 10), book("book2", 3)], PASSWORD)
            .unwrap();
        machine
    }

    #[test]
    fn test_insert_valid_coins() {
        let mut machine = VendingMachine::new(1.0, PASSWORD);
        for coin in DENOMINATIONS {
            machine.insert_coin(coin).unwrap();
        }
        assert_eq!(machine.cassette(), 388);
    }

    #[test]
    fn test_insert_invalid_coin() {
        let mut machine = VendingMachine::new(1.0, PASSWORD);
        machine.insert_coin(5).unwrap();
        assert_eq!(machine.insert_coin(3), Err(VendingError::InvalidCoin(3)));
        assert_eq!(machine.insert_coin(0), Err(VendingError::InvalidCoin(0)));
        assert_eq!(machine.cassette(), 5);
    }

    #[test]
    fn test_cancel_returns_cassette() {
        let mut machine = VendingMachine::new(1.0, PASSWORD);
        machine.insert_coin(10).unwrap();
        machine.insert_coin(2).unwrap();
        assert_eq!(machine.cancel(), 12);
        assert_eq!(machine.cassette(), 0);
        assert_eq!(machine.cancel(), 0);
    }

    #[test]
    fn test_restock_requires_password() {
        let mut machine = VendingMachine::new(1.0, PASSWORD);
        assert_eq!(
            machine.restock(vec![book("b", 1)], "wrong"),
            Err(VendingError::InvalidPassword)
        );
        assert!(machine.is_empty());
    }

    #[test]
    fn test_catalogue() {
        let machine = stocked(1.0);
        assert_eq!(
            machine.catalogue(),
            vec![
                "Title: book1\nAuthor: Author\nEdition: 1\n",
                "Title: book2\nAuthor: Author\nEdition: 1\n",
            ]
        );
    }

    #[test]
    fn test_price_uses_location_factor() {
        let machine = stocked(1.5);
        assert_eq!(machine.price(0), Ok(15));
        assert_eq!(machine.price(1), Ok(5)); // 4.5 rounds up
        assert_eq!(
            machine.price(2),
            Err(VendingError::InvalidIndex { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_buy_book() {
        let mut machine = stocked(1.0);
        machine.insert_coin(10).unwrap();
        machine.insert_coin(5).unwrap();

        let bought = machine.buy_book(0).unwrap();
        assert_eq!(bought.title(), "book1");
        assert_eq!(machine.cassette(), 5);
        assert_eq!(machine.len(), 1);
        assert_eq!(machine.empty_safe(PASSWORD), Ok(10));
        assert_eq!(machine.empty_safe(PASSWORD), Ok(0));
    }

    #[test]
    fn test_buy_with_insufficient_funds() {
        let mut machine = stocked(1.0);
        machine.insert_coin(5).unwrap();

        assert_eq!(
            machine.buy_book(0).unwrap_err(),
            VendingError::InsufficientFunds {
                price: 10,
                cassette: 5
            }
        );
        assert_eq!(machine.cassette(), 5);
        assert_eq!(machine.len(), 2);
        assert_eq!(machine.empty_safe(PASSWORD), Ok(0));
    }

    #[test]
    fn test_full_cassette_rejects_coin() {
        let mut machine = VendingMachine::new(1.0, PASSWORD);
        machine.cassette = u32::MAX - 1;

        assert_eq!(machine.insert_coin(1), Ok(()));
        assert_eq!(
            machine.insert_coin(2),
            Err(VendingError::Overflow("cassette"))
        );
        assert_eq!(machine.cassette(), u32::MAX);
    }

    #[test]
    fn test_full_safe_blocks_sale() {
        let mut machine = stocked(1.0);
        machine.safe = u32::MAX - 5;
        machine.insert_coin(10).unwrap();

        assert_eq!(machine.buy_book(0), Err(VendingError::Overflow("safe")));
        assert_eq!(machine.cassette(), 10);
        assert_eq!(machine.len(), 2);
        assert_eq!(machine.empty_safe(PASSWORD), Ok(u32::MAX - 5));
    }

    #[test]
    fn test_buy_invalid_index() {
        let mut machine = stocked(1.0);
        machine.insert_coin(200).unwrap();
        assert!(matches!(
            machine.buy_book(7),
            Err(VendingError::InvalidIndex { index: 7, .. })
        ));
        assert_eq!(machine.cassette(), 200);
    }

    #[test]
    fn test_empty_safe_requires_password() {
        let mut machine = stocked(1.0);
        machine.insert_coin(10).unwrap();
        machine.buy_book(0).unwrap();
        assert_eq!(machine.empty_safe("nope"), Err(VendingError::InvalidPassword));
        assert_eq!(machine.empty_safe(PASSWORD), Ok(10));
    }

    #[test]
    fn test_from_config_requires_password() {
        let config = VendingConfig::default();
        assert!(VendingMachine::from_config(&config).is_err());

        let config = VendingConfig {
            location_factor: 2.0,
            password: Some(PASSWORD.to_string()),
        };
        let mut machine = VendingMachine::from_config(&config).unwrap();
        machine.restock(vec![book("b", 2)], PASSWORD).unwrap();
        assert_eq!(machine.price(0), Ok(4));
    }
}
