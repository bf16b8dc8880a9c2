//! Catalogue command implementation

use super::open_press;
use anyhow::Result;
use bookpress_core::Config;

/// List every title the press can print
pub fn catalogue(config: &Config, json: bool) -> Result<()> {
    let press = open_press(config)?;
    let titles = press.catalogue();

    if json {
        println!("{}", serde_json::to_string_pretty(&titles)?);
    } else if titles.is_empty() {
        println!(
            "No titles found in {}",
            config.press.source_dir.display()
        );
    } else {
        for title in &titles {
            println!("{}", title);
        }
    }

    Ok(())
}
