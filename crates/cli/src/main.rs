//! srcfix command-line tool.
//!
//! Provides subcommands for stripping stash-pop conflict markers, rewriting
//! deep relative imports into the alias form, and generating / validating
//! the configuration file that selects their target files.

mod commands;
mod sink;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use srcfix_core::config::{SrcfixConfig, DEFAULT_CONFIG_FILE};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// srcfix command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "srcfix",
    version,
    about = "Clean up stash-pop conflict markers and rewrite relative imports"
)]
struct Cli {
    /// Path to the TOML configuration file (default: ./srcfix.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the project root from the config file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Override the log level (off, trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve or inspect merge-conflict markers.
    Conflicts {
        #[command(subcommand)]
        action: ConflictsAction,
    },

    /// Rewrite relative imports into the alias form.
    Imports {
        #[command(subcommand)]
        action: ImportsAction,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// Validate the configuration.
    Validate,
}

#[derive(Subcommand, Debug)]
enum ConflictsAction {
    /// Replace every conflict block with its stashed side.
    Resolve {
        /// Files to clean (default: the configured target set).
        paths: Vec<PathBuf>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// List conflict blocks without modifying anything.
    Scan {
        /// Files to scan (default: the configured target set).
        paths: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ImportsAction {
    /// Rewrite matching imports in place.
    Fix {
        /// Files to rewrite (default: the configured target set).
        paths: Vec<PathBuf>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        config: config_path,
        root,
        log_level,
        command,
    } = cli;
    let log_level = log_level.as_deref();
    let config_path = config_path.as_deref();

    match command {
        Commands::Init { output } => {
            init_tracing(log_level.unwrap_or("warn"));
            commands::init::run_init(&output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate => {
            let config = load_config(config_path, root, log_level, false)?;
            commands::validate::run_validate(&config, config_path)
        }
        Commands::Conflicts { action } => {
            let config = load_config(config_path, root, log_level, true)?;
            match action {
                ConflictsAction::Resolve { paths, dry_run } => {
                    commands::conflicts::run_resolve(&config, paths, dry_run)
                }
                ConflictsAction::Scan { paths } => commands::conflicts::run_scan(&config, paths),
            }
        }
        Commands::Imports { action } => {
            let config = load_config(config_path, root, log_level, true)?;
            match action {
                ImportsAction::Fix { paths, dry_run } => {
                    commands::imports::run_fix(&config, paths, dry_run)
                }
            }
        }
    }
}

/// Load the config, apply command-line overrides and start logging.
///
/// `validate` is off for `srcfix validate`, which reports problems itself.
fn load_config(
    path: Option<&Path>,
    root: Option<PathBuf>,
    log_level: Option<&str>,
    validate: bool,
) -> Result<SrcfixConfig> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let mut config = if validate {
        SrcfixConfig::load_and_validate(path, &cwd).context("invalid configuration")?
    } else {
        SrcfixConfig::load_or_default(path, &cwd).context("failed to load configuration file")?
    };
    if let Some(root) = root {
        config.general.root = root;
    }

    init_tracing(log_level.unwrap_or(&config.general.log_level));
    debug!(
        root = %config.general.root.display(),
        dry_run = config.general.dry_run,
        "configuration loaded"
    );
    Ok(config)
}

/// Minimal logging for the CLI; user-facing output goes through the report sink.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
