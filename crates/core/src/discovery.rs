//! Target-file discovery.
//!
//! A run either names its files explicitly or selects them from a directory
//! tree with glob filters. Both forms produce a lazy, finite sequence of
//! paths; problems met along the way are yielded as items so the caller can
//! report them and keep going.
//!
//! # Tree matching
//!
//! | Pattern kind | Tested against |
//! |--------------|----------------|
//! | `include` | root-relative path (forward slashes) |
//! | `exclude` | root-relative path **and** bare file name |
//!
//! Directories matching an exclude pattern are pruned from the walk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::DiscoveryError;

/// Item produced by discovery.
pub type DiscoveredPath = Result<PathBuf, DiscoveryError>;

// ---------------------------------------------------------------------------
// Target set (config form)
// ---------------------------------------------------------------------------

/// Which files a job targets, as written in the config file.
///
/// A non-empty `files` list wins; otherwise the tree under the root is
/// filtered with `include` / `exclude`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet {
    /// Explicit paths, relative to the root.
    #[serde(default)]
    pub files: Vec<String>,
    /// Glob patterns selecting files under the root.
    #[serde(default)]
    pub include: Vec<String>,
    /// Glob patterns removing files (or whole directories) from the selection.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TargetSet {
    /// Whether the set can select anything at all.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.include.is_empty()
    }

    /// Turn the set into a discovery rooted at `root`.
    pub fn discovery(&self, root: &Path) -> FileDiscovery {
        if self.files.is_empty() {
            FileDiscovery::Tree {
                root: root.to_path_buf(),
                include: self.include.clone(),
                exclude: self.exclude.clone(),
            }
        } else {
            FileDiscovery::Explicit {
                root: root.to_path_buf(),
                paths: self.files.iter().map(PathBuf::from).collect(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// How to enumerate target files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDiscovery {
    /// A fixed, ordered list. Missing files are still yielded.
    Explicit { root: PathBuf, paths: Vec<PathBuf> },
    /// Every regular file under `root` passing the glob filters.
    Tree {
        root: PathBuf,
        include: Vec<String>,
        exclude: Vec<String>,
    },
}

impl FileDiscovery {
    /// Lazily enumerate the target paths.
    pub fn paths(&self) -> Box<dyn Iterator<Item = DiscoveredPath> + '_> {
        match self {
            Self::Explicit { root, paths } => {
                debug!(count = paths.len(), "explicit file list");
                Box::new(
                    paths
                        .iter()
                        .map(move |p| -> DiscoveredPath { Ok(under(root, p)) }),
                )
            }
            Self::Tree {
                root,
                include,
                exclude,
            } => walk_tree(root, include, exclude),
        }
    }
}

fn walk_tree<'a>(
    root: &'a Path,
    include: &'a [String],
    exclude: &'a [String],
) -> Box<dyn Iterator<Item = DiscoveredPath> + 'a> {
    if !root.is_dir() {
        warn!(root = %root.display(), "discovery root does not exist");
        return Box::new(std::iter::once(Err::<PathBuf, _>(
            DiscoveryError::RootNotFound(root.to_path_buf()),
        )));
    }

    debug!(
        root = %root.display(),
        include = include.len(),
        exclude = exclude.len(),
        "walking tree"
    );

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(move |entry| {
            // Never prune the root itself.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let rel = relative(root, entry.path());
            !is_excluded(&rel, exclude)
        });

    Box::new(walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return Some(Err(DiscoveryError::Walk(e))),
        };
        if !entry.file_type().is_file() {
            return None;
        }

        let rel = relative(root, entry.path());
        let included = include.iter().any(|p| glob_match::glob_match(p, &rel));
        if included && !is_excluded(&rel, exclude) {
            Some(Ok(under(root, Path::new(&rel))))
        } else {
            None
        }
    }))
}

/// Root-relative path with forward slashes.
fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Match `rel` (and its file name) against the exclude patterns.
fn is_excluded(rel: &str, exclude: &[String]) -> bool {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    exclude
        .iter()
        .any(|p| glob_match::glob_match(p, rel) || glob_match::glob_match(p, name))
}

/// Join `path` onto `root`, keeping paths short when the root is the cwd.
fn under(root: &Path, path: &Path) -> PathBuf {
    if root.as_os_str().is_empty() || root == Path::new(".") {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
