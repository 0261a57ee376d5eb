//! Human-readable run reporting.
//!
//! The runner emits one [`ReportEvent`] per processed file and one summary.
//! Each event renders as a single line; a [`ReportSink`] decides where the
//! lines go (stdout in the CLI, a `Vec<String>` in tests).

use std::fmt;
use std::path::PathBuf;

use crate::transform::TransformKind;

/// Aggregate counts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub kind: TransformKind,
    pub dry_run: bool,
    /// Paths handed to the runner, including ones that failed.
    pub files_seen: usize,
    pub files_changed: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    /// Total substitutions across all changed files.
    pub changes: usize,
    /// Conflict markers left in place across all files.
    pub remaining: usize,
}

impl RunSummary {
    pub fn new(kind: TransformKind, dry_run: bool) -> Self {
        Self {
            kind,
            dry_run,
            files_seen: 0,
            files_changed: 0,
            files_unchanged: 0,
            files_failed: 0,
            changes: 0,
            remaining: 0,
        }
    }

    /// `true` when no file failed.
    pub fn is_clean(&self) -> bool {
        self.files_failed == 0
    }
}

/// One reportable step of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// The file had substitutions (written unless dry-run).
    Changed {
        kind: TransformKind,
        path: PathBuf,
        changes: usize,
        remaining: usize,
        dry_run: bool,
    },
    /// Nothing to substitute; the file was not rewritten.
    Unchanged {
        kind: TransformKind,
        path: PathBuf,
        remaining: usize,
    },
    /// The file could not be processed.
    Failed {
        path: Option<PathBuf>,
        not_found: bool,
        detail: String,
    },
    /// End-of-run totals.
    Summary(RunSummary),
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed {
                kind,
                path,
                changes,
                remaining,
                dry_run,
            } => {
                let verb = if *dry_run { "Would resolve" } else { "Resolved" };
                match kind {
                    TransformKind::Conflicts => write!(
                        f,
                        "✓ {verb} {changes} conflict(s) in {}",
                        path.display()
                    )?,
                    TransformKind::Imports if *dry_run => {
                        write!(f, "✓ Would fix: {} ({changes} import(s))", path.display())?
                    }
                    TransformKind::Imports => write!(f, "✓ Fixed: {}", path.display())?,
                }
                if *remaining > 0 {
                    write!(f, " ({remaining} marker(s) left unresolved)")?;
                }
                Ok(())
            }
            Self::Unchanged {
                path, remaining, ..
            } => {
                write!(f, "- Skipped (no changes): {}", path.display())?;
                if *remaining > 0 {
                    write!(f, " ({remaining} marker(s) left unresolved)")?;
                }
                Ok(())
            }
            Self::Failed {
                path,
                not_found,
                detail,
            } => match (path, not_found) {
                (Some(path), true) => write!(f, "✗ Not found: {}", path.display()),
                (Some(path), false) => {
                    write!(f, "✗ Error processing {}: {detail}", path.display())
                }
                (None, _) => write!(f, "✗ Error: {detail}"),
            },
            Self::Summary(s) => {
                let prefix = if s.dry_run { "[dry run] " } else { "" };
                match s.kind {
                    TransformKind::Conflicts => {
                        write!(f, "{prefix}Total conflicts resolved: {}", s.changes)?
                    }
                    TransformKind::Imports => {
                        write!(f, "{prefix}Done! Fixed {} files.", s.files_changed)?
                    }
                }
                if s.files_failed > 0 {
                    write!(f, " ({} file(s) failed)", s.files_failed)?;
                }
                Ok(())
            }
        }
    }
}

/// Destination for report events.
pub trait ReportSink {
    fn emit(&mut self, event: &ReportEvent);
}

impl ReportSink for Vec<String> {
    fn emit(&mut self, event: &ReportEvent) {
        self.push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_lines() {
        let changed = ReportEvent::Changed {
            kind: TransformKind::Conflicts,
            path: PathBuf::from("app/admin/backup/page.tsx"),
            changes: 3,
            remaining: 0,
            dry_run: false,
        };
        assert_eq!(
            changed.to_string(),
            "✓ Resolved 3 conflict(s) in app/admin/backup/page.tsx"
        );

        let partial = ReportEvent::Changed {
            kind: TransformKind::Conflicts,
            path: PathBuf::from("a.tsx"),
            changes: 1,
            remaining: 2,
            dry_run: true,
        };
        assert_eq!(
            partial.to_string(),
            "✓ Would resolve 1 conflict(s) in a.tsx (2 marker(s) left unresolved)"
        );
    }

    #[test]
    fn test_import_lines() {
        let fixed = ReportEvent::Changed {
            kind: TransformKind::Imports,
            path: PathBuf::from("app/blog/[id]/page.tsx"),
            changes: 2,
            remaining: 0,
            dry_run: false,
        };
        assert_eq!(fixed.to_string(), "✓ Fixed: app/blog/[id]/page.tsx");

        let skipped = ReportEvent::Unchanged {
            kind: TransformKind::Imports,
            path: PathBuf::from("app/faq/page.tsx"),
            remaining: 0,
        };
        assert_eq!(
            skipped.to_string(),
            "- Skipped (no changes): app/faq/page.tsx"
        );
    }

    #[test]
    fn test_failure_lines() {
        let missing = ReportEvent::Failed {
            path: Some(PathBuf::from("app/gone.tsx")),
            not_found: true,
            detail: "file not found".into(),
        };
        assert_eq!(missing.to_string(), "✗ Not found: app/gone.tsx");

        let broken = ReportEvent::Failed {
            path: Some(PathBuf::from("app/x.tsx")),
            not_found: false,
            detail: "permission denied".into(),
        };
        assert_eq!(
            broken.to_string(),
            "✗ Error processing app/x.tsx: permission denied"
        );
    }

    #[test]
    fn test_summary_lines() {
        let mut summary = RunSummary::new(TransformKind::Conflicts, false);
        summary.changes = 7;
        assert_eq!(
            ReportEvent::Summary(summary.clone()).to_string(),
            "Total conflicts resolved: 7"
        );

        summary.files_failed = 1;
        assert!(!summary.is_clean());
        assert_eq!(
            ReportEvent::Summary(summary).to_string(),
            "Total conflicts resolved: 7 (1 file(s) failed)"
        );

        let mut imports = RunSummary::new(TransformKind::Imports, true);
        imports.files_changed = 4;
        assert_eq!(
            ReportEvent::Summary(imports).to_string(),
            "[dry run] Done! Fixed 4 files."
        );
    }

    #[test]
    fn test_vec_sink_collects_lines() {
        let mut sink: Vec<String> = Vec::new();
        sink.emit(&ReportEvent::Summary(RunSummary::new(
            TransformKind::Imports,
            false,
        )));
        assert_eq!(sink, vec!["Done! Fixed 0 files."]);
    }
}
