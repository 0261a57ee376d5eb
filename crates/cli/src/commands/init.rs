//! `srcfix init`: write a commented default configuration.

use std::path::Path;

use anyhow::{Context, Result};

use srcfix_core::config::DEFAULT_CONFIG_TOML;

use crate::style;

/// Write the default config to `output`, refusing to overwrite.
pub fn run_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG_TOML).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!(
            "Default configuration written to {}",
            output.display()
        ))
    );
    println!();
    println!("Next steps:");
    println!("  1. Edit the target files and globs for your project");
    println!(
        "  2. Validate with: srcfix validate --config {}",
        output.display()
    );
    println!("  3. Preview with: srcfix conflicts resolve --dry-run");

    Ok(())
}
