//! `srcfix validate`: check the configuration and print a summary.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use srcfix_core::config::SrcfixConfig;
use srcfix_core::discovery::TargetSet;

use crate::style;

pub fn run_validate(config: &SrcfixConfig, source: Option<&Path>) -> Result<ExitCode> {
    match source {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating configuration (defaults or ./srcfix.toml)"),
    }
    println!();
    println!("  {}", style::success("TOML structure is valid"));

    if let Err(e) = config.validate() {
        println!("  {}", style::error(&format!("Validation error: {}", e)));
        return Ok(ExitCode::FAILURE);
    }
    println!("  {}", style::success("All fields are valid"));

    if !config.general.root.is_dir() {
        println!(
            "  {}",
            style::warn(&format!(
                "Root directory {} does not exist",
                config.general.root.display()
            ))
        );
    }

    println!();
    println!("{}", style::header("Configuration summary:"));
    println!("  Root           : {}", config.general.root.display());
    println!("  Log level      : {}", config.general.log_level);
    println!("  Dry run        : {}", config.general.dry_run);
    println!(
        "  Conflict marks : {} / {}",
        config.conflicts.markers.start_marker(),
        config.conflicts.markers.end_marker()
    );
    println!("  Conflict files : {}", describe(&config.conflicts.targets));
    println!(
        "  Import rewrite : {} -> {}",
        config.imports.rule.relative_prefix, config.imports.rule.alias
    );
    println!("  Import files   : {}", describe(&config.imports.targets));
    println!();
    println!("Configuration is valid.");

    Ok(ExitCode::SUCCESS)
}

fn describe(targets: &TargetSet) -> String {
    if !targets.files.is_empty() {
        format!("{} explicit file(s)", targets.files.len())
    } else if targets.exclude.is_empty() {
        format!("include {}", targets.include.join(", "))
    } else {
        format!(
            "include {} {}",
            targets.include.join(", "),
            style::dim(&format!("(exclude {})", targets.exclude.join(", ")))
        )
    }
}
