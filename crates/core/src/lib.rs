//! srcfix core library.
//!
//! This crate provides the building blocks for one-pass source-tree
//! maintenance runs: merge-conflict marker resolution, import-alias
//! rewriting, target discovery, whole-file storage, run reporting and
//! configuration.

pub mod config;
pub mod conflict;
pub mod discovery;
pub mod errors;
pub mod imports;
pub mod report;
pub mod runner;
pub mod store;
pub mod transform;

// Re-exports for convenience.
pub use config::SrcfixConfig;
pub use conflict::{ConflictMarkers, ConflictResolver, ResolutionResult};
pub use discovery::{FileDiscovery, TargetSet};
pub use imports::{ImportRewriter, ImportRule};
pub use report::{ReportEvent, ReportSink, RunSummary};
pub use runner::{process_file, run, FileOutcome, RunOptions};
pub use store::{FileStore, FsStore};
pub use transform::{TextTransform, TransformKind, TransformOutcome};
