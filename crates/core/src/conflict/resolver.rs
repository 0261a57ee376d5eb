//! Conflict resolution: keep the stashed ("theirs") side of every block.

use tracing::{debug, info};

use super::detector::{ConflictBlock, ConflictMarkers, ConflictPattern};
use crate::errors::ConfigError;
use crate::transform::{TextTransform, TransformKind, TransformOutcome};

/// Outcome of resolving one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The rewritten document.
    pub text: String,
    /// Start markers present in the input.
    pub blocks_found_before: usize,
    /// Start markers still present in the output (malformed blocks).
    pub blocks_found_after: usize,
}

impl ResolutionResult {
    /// Number of blocks replaced by their theirs side.
    pub fn resolved(&self) -> usize {
        self.blocks_found_before
            .saturating_sub(self.blocks_found_after)
    }

    /// Whether any block was resolved.
    pub fn changed(&self) -> bool {
        self.resolved() > 0
    }
}

/// Stateless resolver for one marker convention.
///
/// The policy is fixed: every matched block is replaced by exactly its
/// theirs text. Unmatched start markers are left where they are.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    pattern: ConflictPattern,
}

impl ConflictResolver {
    /// Build a resolver for the given labels.
    pub fn new(markers: &ConflictMarkers) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: markers.compile()?,
        })
    }

    /// Replace every well-formed block in `document` with its theirs side.
    pub fn resolve(&self, document: &str) -> ResolutionResult {
        let blocks_found_before = self.pattern.count_start_markers(document);
        if blocks_found_before == 0 {
            return ResolutionResult {
                text: document.to_string(),
                blocks_found_before: 0,
                blocks_found_after: 0,
            };
        }

        let mut text = String::with_capacity(document.len());
        let mut last = 0;
        for block in self.pattern.scan(document) {
            text.push_str(&document[last..block.span.start]);
            text.push_str(&block.replacement);
            last = block.span.end;
        }
        text.push_str(&document[last..]);
        let blocks_found_after = self.pattern.count_start_markers(&text);

        debug!(
            before = blocks_found_before,
            after = blocks_found_after,
            "resolved conflict blocks"
        );
        if blocks_found_after > 0 {
            info!(
                remaining = blocks_found_after,
                "conflict markers left unresolved"
            );
        }

        ResolutionResult {
            text,
            blocks_found_before,
            blocks_found_after,
        }
    }

    /// Well-formed blocks in `document`, without modifying it.
    pub fn scan(&self, document: &str) -> Vec<ConflictBlock> {
        self.pattern.scan(document)
    }

    /// Start markers in `document`, matched or not.
    pub fn count_start_markers(&self, document: &str) -> usize {
        self.pattern.count_start_markers(document)
    }
}

impl TextTransform for ConflictResolver {
    fn kind(&self) -> TransformKind {
        TransformKind::Conflicts
    }

    fn apply(&self, input: &str) -> TransformOutcome {
        let result = self.resolve(input);
        TransformOutcome {
            changes: result.resolved(),
            remaining: result.blocks_found_after,
            text: result.text,
        }
    }
}
