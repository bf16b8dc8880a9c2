//! Vend command implementation

use super::open_press;
use anyhow::{Context, Result};
use bookpress_core::{Config, VendingMachine};

/// Stock a vending machine with copies of every title, insert coins and
/// optionally buy one book
pub fn vend(config: &Config, copies: usize, coins: &[u32], buy: Option<usize>) -> Result<()> {
    let press = open_press(config)?;
    let mut machine = VendingMachine::from_config(&config.vending)
        .context("Vending machine needs a password (--password or [vending] password)")?;
    let password = config.vending.password.as_deref().unwrap_or_default();

    for title in press.catalogue() {
        let books = press.request(&title, copies);
        tracing::debug!("Stocking {} copies of {}", books.len(), title);
        machine.restock(books, password)?;
    }

    if machine.is_empty() {
        println!("Nothing to sell");
    }
    for (index, entry) in machine.catalogue().iter().enumerate() {
        println!("[{}] price {}", index, machine.price(index)?);
        for line in entry.lines() {
            println!("    {}", line);
        }
    }

    for &coin in coins {
        if let Err(e) = machine.insert_coin(coin) {
            eprintln!("Rejected coin: {}", e);
        }
    }
    println!("Cassette: {}", machine.cassette());

    if let Some(index) = buy {
        match machine.buy_book(index) {
            Ok(book) => {
                println!(
                    "Sold '{}' by {} (edition {})",
                    book.title(),
                    book.author(),
                    book.edition()
                );
            }
            Err(e) => {
                let refund = machine.cancel();
                eprintln!("Refunded {}", refund);
                return Err(e).context("Purchase failed");
            }
        }
    }

    println!("Change: {}", machine.cancel());
    println!("Safe:   {}", machine.empty_safe(password)?);

    Ok(())
}
