//! Info command implementation

use super::open_press;
use anyhow::{bail, Context, Result};
use bookpress_core::{page_count, Config};
use serde::Serialize;

/// Title info output
#[derive(Serialize)]
struct TitleInfo {
    key: String,
    title: String,
    author: String,
    pages: usize,
    characters: usize,
}

/// Display information about a title without printing it
pub fn info(config: &Config, title: &str, json: bool) -> Result<()> {
    let press = open_press(config)?;
    if !press.contains(title) {
        bail!("'{}' is not in the catalogue", title);
    }

    let source = press
        .printer()
        .read_source(title)
        .with_context(|| format!("Failed to read source for {}", title))?;

    let info = TitleInfo {
        key: title.to_string(),
        pages: page_count(&source.body),
        characters: source.body.chars().count(),
        title: source.title,
        author: source.author,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Key:         {}", info.key);
        println!("Title:       {}", info.title);
        if !info.author.is_empty() {
            println!("Author:      {}", info.author);
        }
        println!("Pages:       {}", info.pages);
        println!("Characters:  {}", info.characters);
    }

    Ok(())
}
