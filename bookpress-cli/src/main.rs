//! Bookpress CLI - print, shelve and sell books from plain-text sources

mod commands;

use anyhow::{Context, Result};
use bookpress_core::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a count argument (must be at least 1)
fn parse_at_least_one(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "bookpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of source texts, one file per title
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    /// Copies kept on each title's shelf (must be at least 1)
    #[arg(long, global = true, value_parser = parse_at_least_one)]
    shelf_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the titles in print
    Catalogue {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request copies of a title from the press
    Request {
        /// Title key (source file name)
        title: String,

        /// Number of copies
        #[arg(short, long, default_value = "1")]
        amount: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display information about a title
    Info {
        /// Title key (source file name)
        title: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate source texts (all titles unless one is given)
    Validate {
        /// Title key (source file name)
        title: Option<String>,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_at_least_one)]
        jobs: usize,
    },

    /// Stock a vending machine from the press and make a purchase
    Vend {
        /// Copies of each title to stock
        #[arg(long, default_value = "1")]
        copies: usize,

        /// Coin to insert (repeatable)
        #[arg(long = "coin")]
        coins: Vec<u32>,

        /// Shelf index of the book to buy
        #[arg(short, long)]
        buy: Option<usize>,

        /// Price multiplier applied to page counts
        #[arg(long)]
        location_factor: Option<f64>,

        /// Operator password
        #[arg(long)]
        password: Option<String>,
    },
}

/// Build the effective configuration: file (if any), then command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.source_dir {
        config.press.source_dir = dir.clone();
    }
    if let Some(capacity) = cli.shelf_capacity {
        config.press.shelf_capacity = capacity;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookpress_cli=debug,bookpress_core=debug"
    } else {
        "bookpress_cli=info,bookpress_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Catalogue { json } => commands::catalogue(&config, json),

        Commands::Request {
            title,
            amount,
            json,
        } => commands::request(&config, &title, amount, json),

        Commands::Info { title, json } => commands::info(&config, &title, json),

        Commands::Validate { title, jobs } => commands::validate(&config, title.as_deref(), jobs),

        Commands::Vend {
            copies,
            coins,
            buy,
            location_factor,
            password,
        } => {
            let mut config = config;
            if let Some(factor) = location_factor {
                config.vending.location_factor = factor;
            }
            if password.is_some() {
                config.vending.password = password;
            }
            commands::vend(&config, copies, &coins, buy)
        }
    }
}
