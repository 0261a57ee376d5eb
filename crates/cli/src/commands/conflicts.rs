//! `srcfix conflicts resolve` and `srcfix conflicts scan`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use srcfix_core::config::SrcfixConfig;
use srcfix_core::conflict::ConflictResolver;
use srcfix_core::runner::{self, RunOptions};
use srcfix_core::store::{FileStore, FsStore};

use super::{discovery_for, exit_code};
use crate::sink::ConsoleSink;
use crate::style;

fn resolver(config: &SrcfixConfig) -> Result<ConflictResolver> {
    ConflictResolver::new(&config.conflicts.markers).context("invalid conflict markers")
}

/// Resolve conflict blocks in every target file, keeping the stashed side.
pub fn run_resolve(config: &SrcfixConfig, paths: Vec<PathBuf>, dry_run: bool) -> Result<ExitCode> {
    let resolver = resolver(config)?;
    let discovery = discovery_for(&config.general.root, &config.conflicts.targets, paths);
    let options = RunOptions {
        dry_run: dry_run || config.general.dry_run,
    };

    let summary = runner::run(
        discovery.paths(),
        &FsStore,
        &resolver,
        &mut ConsoleSink,
        options,
    );

    if summary.remaining > 0 {
        println!(
            "{}",
            style::warn(&format!(
                "{} conflict marker(s) could not be matched; run `srcfix conflicts scan` to inspect",
                summary.remaining
            ))
        );
    }

    Ok(exit_code(&summary))
}

/// List conflict blocks in every target file without modifying anything.
pub fn run_scan(config: &SrcfixConfig, paths: Vec<PathBuf>) -> Result<ExitCode> {
    let resolver = resolver(config)?;
    let discovery = discovery_for(&config.general.root, &config.conflicts.targets, paths);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Line", "Ours", "Theirs", "Note"]);

    let mut blocks_total = 0;
    let mut failures = 0;
    let mut warnings = Vec::new();

    for item in discovery.paths() {
        let path = match item {
            Ok(path) => path,
            Err(e) => {
                println!("{}", style::error(&e.to_string()));
                failures += 1;
                continue;
            }
        };

        let text = match FsStore.read(&path) {
            Ok(text) => text,
            Err(e) => {
                println!("{}", style::error(&e.to_string()));
                failures += 1;
                continue;
            }
        };

        let blocks = resolver.scan(&text);
        for block in &blocks {
            let note = if block.has_base_section {
                "diff3 base section (discarded with ours)"
            } else {
                ""
            };
            table.add_row(vec![
                Cell::new(path.display()),
                Cell::new(block.start_line),
                Cell::new(format!("{} line(s)", block.ours_lines())),
                Cell::new(format!("{} line(s)", block.theirs_lines())),
                Cell::new(note),
            ]);
        }
        blocks_total += blocks.len();

        let unmatched = resolver
            .count_start_markers(&text)
            .saturating_sub(blocks.len());
        if unmatched > 0 {
            warnings.push(format!(
                "{}: {} start marker(s) without a matching separator/end marker",
                path.display(),
                unmatched
            ));
        }
    }

    println!();
    if blocks_total == 0 {
        println!("{}", style::success("No conflict blocks found"));
    } else {
        println!(
            "{}",
            style::header(&format!("Conflict Blocks ({})", blocks_total))
        );
        println!();
        println!("{}", table);
    }
    for warning in &warnings {
        println!("{}", style::warn(warning));
    }
    println!();

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
