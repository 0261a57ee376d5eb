//! Subcommand implementations.

pub mod conflicts;
pub mod imports;
pub mod init;
pub mod validate;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use srcfix_core::discovery::{FileDiscovery, TargetSet};
use srcfix_core::report::RunSummary;

use crate::style;

/// Paths given on the command line win over the configured target set.
///
/// Command-line paths are taken relative to the working directory, not the
/// configured root.
fn discovery_for(root: &Path, targets: &TargetSet, paths: Vec<PathBuf>) -> FileDiscovery {
    if paths.is_empty() {
        targets.discovery(root)
    } else {
        FileDiscovery::Explicit {
            root: PathBuf::from("."),
            paths,
        }
    }
}

/// Exit status for a finished run.
fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.files_seen == 0 {
        println!("{}", style::warn("No target files matched."));
    }
    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
