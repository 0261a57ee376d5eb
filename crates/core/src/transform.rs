//! The seam between whole-file text transforms and the file runner.

use std::fmt;

/// Which maintenance job a transform performs. Drives report wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Conflict-marker cleanup.
    Conflicts,
    /// Import-alias rewrite.
    Imports,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflicts => write!(f, "conflicts"),
            Self::Imports => write!(f, "imports"),
        }
    }
}

/// Result of applying a transform to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    /// The transformed document.
    pub text: String,
    /// Substitutions made (blocks resolved, imports rewritten).
    pub changes: usize,
    /// Items that should have been handled but were left in place.
    pub remaining: usize,
}

/// A pure, whole-document text rewrite.
pub trait TextTransform {
    fn kind(&self) -> TransformKind;

    fn apply(&self, input: &str) -> TransformOutcome;
}
