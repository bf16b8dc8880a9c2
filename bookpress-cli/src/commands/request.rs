//! Request command implementation

use super::open_press;
use anyhow::{bail, Context, Result};
use bookpress_core::{BookRecord, Config};
use serde::Serialize;

/// One delivered copy
#[derive(Serialize)]
struct CopyInfo {
    id: String,
    title: String,
    author: String,
    edition: u32,
    pages: usize,
}

impl From<&BookRecord> for CopyInfo {
    fn from(book: &BookRecord) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            edition: book.edition(),
            pages: book.pages(),
        }
    }
}

/// Request output
#[derive(Serialize)]
struct RequestReport {
    title: String,
    requested: usize,
    delivered: usize,
    from_shelf: usize,
    printed: usize,
    restocked: usize,
    edition: u32,
    shelf: usize,
    copies: Vec<CopyInfo>,
    print_error: Option<String>,
    restock_error: Option<String>,
}

/// Request copies of a title and report how the press served them
pub fn request(config: &Config, title: &str, amount: usize, json: bool) -> Result<()> {
    let press = open_press(config)?;

    let fulfillment = press
        .fulfill(title, amount)
        .with_context(|| format!("Request for '{}' failed", title))?;

    let report = RequestReport {
        title: title.to_string(),
        requested: fulfillment.requested,
        delivered: fulfillment.copies.len(),
        from_shelf: fulfillment.from_shelf,
        printed: fulfillment.printed,
        restocked: fulfillment.restocked,
        edition: fulfillment.edition,
        shelf: press.shelf_len(title)?,
        copies: fulfillment.copies.iter().map(CopyInfo::from).collect(),
        print_error: fulfillment.print_error.as_ref().map(|e| e.to_string()),
        restock_error: fulfillment.restock_error.as_ref().map(|e| e.to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Title:       {}", report.title);
        println!(
            "Delivered:   {} of {} ({} from shelf, {} printed)",
            report.delivered, report.requested, report.from_shelf, report.printed
        );
        for copy in &report.copies {
            println!(
                "  {}  {} by {}, edition {}, {} pages",
                copy.id, copy.title, copy.author, copy.edition, copy.pages
            );
        }
        println!("Edition:     {}", report.edition);
        println!(
            "Shelf:       {} of {} ({} restocked)",
            report.shelf,
            press.shelf_capacity(),
            report.restocked
        );
    }

    if let Some(e) = &fulfillment.restock_error {
        tracing::warn!("Restock of '{}' stopped early: {}", title, e);
    }
    if fulfillment.is_short() {
        match &fulfillment.print_error {
            Some(e) => bail!(
                "Delivered {} of {} copies of '{}': {}",
                report.delivered,
                report.requested,
                title,
                e
            ),
            None => bail!(
                "Delivered {} of {} copies of '{}'",
                report.delivered,
                report.requested,
                title
            ),
        }
    }

    Ok(())
}
