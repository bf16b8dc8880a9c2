//! CLI command implementations

mod catalogue;
mod info;
mod request;
mod validate;
mod vend;

pub use catalogue::catalogue;
pub use info::info;
pub use request::request;
pub use validate::validate;
pub use vend::vend;

use anyhow::{Context, Result};
use bookpress_core::{Config, Press};

/// Open the press described by the configuration
fn open_press(config: &Config) -> Result<Press> {
    Press::open(&config.press).with_context(|| {
        format!(
            "Failed to open press at {}",
            config.press.source_dir.display()
        )
    })
}
