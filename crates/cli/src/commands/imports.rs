//! `srcfix imports fix`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use srcfix_core::config::SrcfixConfig;
use srcfix_core::imports::ImportRewriter;
use srcfix_core::runner::{self, RunOptions};
use srcfix_core::store::FsStore;

use super::{discovery_for, exit_code};
use crate::sink::ConsoleSink;
use crate::style;

/// Rewrite relative imports in every target file.
pub fn run_fix(config: &SrcfixConfig, paths: Vec<PathBuf>, dry_run: bool) -> Result<ExitCode> {
    let rewriter =
        ImportRewriter::new(config.imports.rule.clone()).context("invalid import rule")?;
    let rule = rewriter.rule();
    println!(
        "{}",
        style::dim(&format!(
            "Rewriting imports: {} -> {}",
            rule.relative_prefix, rule.alias
        ))
    );

    let discovery = discovery_for(&config.general.root, &config.imports.targets, paths);
    let options = RunOptions {
        dry_run: dry_run || config.general.dry_run,
    };

    let summary = runner::run(
        discovery.paths(),
        &FsStore,
        &rewriter,
        &mut ConsoleSink,
        options,
    );
    Ok(exit_code(&summary))
}
