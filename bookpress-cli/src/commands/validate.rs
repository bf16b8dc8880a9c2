//! Validate command implementation

use super::open_press;
use anyhow::{bail, Context, Result};
use bookpress_core::Config;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Check that source texts can be printed
pub fn validate(config: &Config, title: Option<&str>, jobs: usize) -> Result<()> {
    let press = open_press(config)?;

    if let Some(title) = title {
        if !press.contains(title) {
            bail!("'{}' is not in the catalogue", title);
        }
        return match press.printer().read_source(title) {
            Ok(source) => {
                println!("Valid source text");
                println!("  Title:  {}", source.title);
                println!("  Author: {}", source.author);
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid source text: {}", e);
                bail!("Validation failed for {}", title);
            }
        };
    }

    let titles = press.catalogue();
    if titles.is_empty() {
        println!(
            "No titles found in {}",
            config.press.source_dir.display()
        );
        return Ok(());
    }

    println!("Validating {} titles", titles.len());

    let pb = ProgressBar::new(titles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("##-"),
    );

    let valid_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    pool.install(|| {
        titles.par_iter().for_each(|title| {
            match press.printer().read_source(title) {
                Ok(_) => {
                    valid_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Invalid source {}: {}", title, e);
                }
            }
            pb.inc(1);
        })
    });

    pb.finish();

    let valid = valid_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nValidation complete:");
    println!("  Valid:   {}", valid);
    println!("  Invalid: {}", errors);

    if errors > 0 {
        bail!("Validation found {} invalid source texts", errors);
    }

    Ok(())
}
