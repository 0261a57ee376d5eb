//! Per-file processing and run aggregation.
//!
//! A run is a linear pass: for each discovered path, read the whole file,
//! apply one [`TextTransform`], write the result back only if it changed,
//! and report. Failures are per-file; nothing stops the run early.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::discovery::DiscoveredPath;
use crate::errors::FileError;
use crate::report::{ReportEvent, ReportSink, RunSummary};
use crate::store::FileStore;
use crate::transform::TextTransform;

/// Run-wide switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Transform and report, but never write.
    pub dry_run: bool,
}

/// What happened to one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Substitutions made.
    pub changes: usize,
    /// Items left in place (unresolved conflict markers).
    pub remaining: usize,
    /// Whether the file was rewritten on disk.
    pub written: bool,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.changes > 0
    }
}

/// Read, transform and (if changed) write back a single file.
///
/// The file is written only after the full read and transform succeed, and
/// only when the text actually differs, so untouched files keep their
/// modification times.
pub fn process_file<S, T>(
    store: &S,
    path: &Path,
    transform: &T,
    dry_run: bool,
) -> Result<FileOutcome, FileError>
where
    S: FileStore + ?Sized,
    T: TextTransform + ?Sized,
{
    let original = store.read(path)?;
    let outcome = transform.apply(&original);

    let differs = outcome.text != original;
    let written = differs && !dry_run;
    if written {
        store.write(path, &outcome.text)?;
    }

    debug!(
        path = %path.display(),
        kind = %transform.kind(),
        changes = outcome.changes,
        remaining = outcome.remaining,
        written,
        "processed file"
    );

    Ok(FileOutcome {
        path: path.to_path_buf(),
        changes: outcome.changes,
        remaining: outcome.remaining,
        written,
    })
}

/// Process every discovered path and report as it goes.
///
/// Emits one event per path followed by a [`ReportEvent::Summary`], and
/// returns the same summary.
pub fn run<I, S, T, R>(
    paths: I,
    store: &S,
    transform: &T,
    sink: &mut R,
    options: RunOptions,
) -> RunSummary
where
    I: IntoIterator<Item = DiscoveredPath>,
    S: FileStore + ?Sized,
    T: TextTransform + ?Sized,
    R: ReportSink + ?Sized,
{
    let kind = transform.kind();
    let mut summary = RunSummary::new(kind, options.dry_run);
    info!(kind = %kind, dry_run = options.dry_run, "starting run");

    for item in paths {
        summary.files_seen += 1;

        let path = match item {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "discovery error");
                summary.files_failed += 1;
                sink.emit(&ReportEvent::Failed {
                    path: e.path(),
                    not_found: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        match process_file(store, &path, transform, options.dry_run) {
            Ok(outcome) => {
                summary.remaining += outcome.remaining;
                if outcome.changed() {
                    summary.files_changed += 1;
                    summary.changes += outcome.changes;
                    sink.emit(&ReportEvent::Changed {
                        kind,
                        path: outcome.path,
                        changes: outcome.changes,
                        remaining: outcome.remaining,
                        dry_run: options.dry_run,
                    });
                } else {
                    summary.files_unchanged += 1;
                    sink.emit(&ReportEvent::Unchanged {
                        kind,
                        path: outcome.path,
                        remaining: outcome.remaining,
                    });
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to process file");
                summary.files_failed += 1;
                sink.emit(&ReportEvent::Failed {
                    path: Some(e.path().to_path_buf()),
                    not_found: e.is_not_found(),
                    detail: e.detail(),
                });
            }
        }
    }

    info!(
        kind = %kind,
        seen = summary.files_seen,
        changed = summary.files_changed,
        failed = summary.files_failed,
        changes = summary.changes,
        "run complete"
    );
    sink.emit(&ReportEvent::Summary(summary.clone()));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::conflict::{ConflictMarkers, ConflictResolver};
    use crate::errors::DiscoveryError;
    use crate::imports::{ImportRewriter, ImportRule};

    /// In-memory store that records writes.
    #[derive(Default)]
    struct MemoryStore {
        files: RefCell<HashMap<PathBuf, String>>,
        writes: RefCell<Vec<PathBuf>>,
        read_only: bool,
    }

    impl MemoryStore {
        fn with(files: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (path, text) in files {
                store
                    .files
                    .borrow_mut()
                    .insert(PathBuf::from(path), text.to_string());
            }
            store
        }

        fn get(&self, path: &str) -> Option<String> {
            self.files.borrow().get(Path::new(path)).cloned()
        }
    }

    impl FileStore for MemoryStore {
        fn read(&self, path: &Path) -> Result<String, FileError> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| FileError::NotFound {
                    path: path.to_path_buf(),
                })
        }

        fn write(&self, path: &Path, text: &str) -> Result<(), FileError> {
            if self.read_only {
                return Err(FileError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "read-only store",
                    ),
                });
            }
            self.writes.borrow_mut().push(path.to_path_buf());
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }

    const CONFLICTED: &str =
        "A\n<<<<<<< Updated upstream\nX\n=======\nY\n>>>>>>> Stashed changes\nB\n";

    fn resolver() -> ConflictResolver {
        ConflictResolver::new(&ConflictMarkers::default()).unwrap()
    }

    fn ok_paths(paths: &[&str]) -> Vec<DiscoveredPath> {
        paths.iter().map(|p| Ok(PathBuf::from(p))).collect()
    }

    #[test]
    fn test_process_file_writes_changed_text() {
        let store = MemoryStore::with(&[("a.tsx", CONFLICTED)]);
        let outcome = process_file(&store, Path::new("a.tsx"), &resolver(), false).unwrap();
        assert!(outcome.written);
        assert_eq!(outcome.changes, 1);
        assert_eq!(store.get("a.tsx").unwrap(), "A\nY\nB\n");
    }

    #[test]
    fn test_process_file_skips_write_when_unchanged() {
        let store = MemoryStore::with(&[("clean.tsx", "nothing here\n")]);
        let outcome = process_file(&store, Path::new("clean.tsx"), &resolver(), false).unwrap();
        assert!(!outcome.written);
        assert!(!outcome.changed());
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_never_writes() {
        let store = MemoryStore::with(&[("a.tsx", CONFLICTED)]);
        let outcome = process_file(&store, Path::new("a.tsx"), &resolver(), true).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.changes, 1);
        assert_eq!(store.get("a.tsx").unwrap(), CONFLICTED);
    }

    #[test]
    fn test_run_continues_past_failures() {
        let store = MemoryStore::with(&[("a.tsx", CONFLICTED), ("c.tsx", "clean\n")]);
        let mut paths = ok_paths(&["a.tsx", "missing.tsx"]);
        paths.push(Err(DiscoveryError::RootNotFound(PathBuf::from("/gone"))));
        paths.extend(ok_paths(&["c.tsx"]));

        let mut lines: Vec<String> = Vec::new();
        let summary = run(paths, &store, &resolver(), &mut lines, RunOptions::default());

        assert_eq!(summary.files_seen, 4);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.files_unchanged, 1);
        assert_eq!(summary.files_failed, 2);
        assert_eq!(summary.changes, 1);
        assert!(!summary.is_clean());

        assert_eq!(
            lines,
            vec![
                "✓ Resolved 1 conflict(s) in a.tsx".to_string(),
                "✗ Not found: missing.tsx".to_string(),
                "✗ Error processing /gone: discovery root not found: /gone".to_string(),
                "- Skipped (no changes): c.tsx".to_string(),
                "Total conflicts resolved: 1 (2 file(s) failed)".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut store = MemoryStore::with(&[("a.tsx", CONFLICTED)]);
        store.read_only = true;

        let mut lines: Vec<String> = Vec::new();
        let summary = run(
            ok_paths(&["a.tsx"]),
            &store,
            &resolver(),
            &mut lines,
            RunOptions::default(),
        );
        assert_eq!(summary.files_failed, 1);
        assert_eq!(lines[0], "✗ Error processing a.tsx: read-only store");
        assert_eq!(store.get("a.tsx").unwrap(), CONFLICTED);
    }

    #[test]
    fn test_unresolved_markers_are_counted() {
        let store = MemoryStore::with(&[("a.tsx", "<<<<<<< Updated upstream\nX\n")]);
        let mut lines: Vec<String> = Vec::new();
        let summary = run(
            ok_paths(&["a.tsx"]),
            &store,
            &resolver(),
            &mut lines,
            RunOptions::default(),
        );
        assert_eq!(summary.remaining, 1);
        assert_eq!(summary.files_unchanged, 1);
        assert_eq!(
            lines[0],
            "- Skipped (no changes): a.tsx (1 marker(s) left unresolved)"
        );
    }

    #[test]
    fn test_import_run() {
        let store = MemoryStore::with(&[
            ("page.tsx", "import { cn } from '../../../src/utils';\n"),
            ("done.tsx", "import { cn } from '@/utils';\n"),
        ]);
        let rewriter = ImportRewriter::new(ImportRule::default()).unwrap();
        let mut lines: Vec<String> = Vec::new();
        let summary = run(
            ok_paths(&["page.tsx", "done.tsx"]),
            &store,
            &rewriter,
            &mut lines,
            RunOptions::default(),
        );

        assert_eq!(summary.files_changed, 1);
        assert_eq!(
            store.get("page.tsx").unwrap(),
            "import { cn } from '@/utils';\n"
        );
        assert_eq!(lines.last().unwrap(), "Done! Fixed 1 files.");
    }
}
