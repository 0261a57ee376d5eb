//! Conflict-block detection.
//!
//! A conflict block, as left behind by `git stash pop`, looks like:
//!
//! ```text
//! <<<<<<< Updated upstream
//! ...ours...
//! =======
//! ...theirs...
//! >>>>>>> Stashed changes
//! ```
//!
//! The [`ConflictPattern`] compiled from a set of [`ConflictMarkers`] is the
//! single source of truth for what counts as a block: the resolver replaces
//! exactly the spans this module reports.

use std::ops::Range;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// Separator line between the two sides of a block.
pub const SEPARATOR: &str = "=======";

/// Marker that opens a diff3 common-ancestor section.
pub const BASE_MARKER: &str = "|||||||";

const START_PREFIX: &str = "<<<<<<< ";
const END_PREFIX: &str = ">>>>>>> ";

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// Labels that follow the `<<<<<<<` and `>>>>>>>` marker runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictMarkers {
    /// Label on the start marker (the "ours" side).
    #[serde(default = "default_ours_label")]
    pub ours_label: String,
    /// Label on the end marker (the "theirs" side, which is kept).
    #[serde(default = "default_theirs_label")]
    pub theirs_label: String,
}

fn default_ours_label() -> String {
    "Updated upstream".into()
}
fn default_theirs_label() -> String {
    "Stashed changes".into()
}

impl Default for ConflictMarkers {
    fn default() -> Self {
        Self {
            ours_label: default_ours_label(),
            theirs_label: default_theirs_label(),
        }
    }
}

impl ConflictMarkers {
    /// Full start-marker line, e.g. `<<<<<<< Updated upstream`.
    pub fn start_marker(&self) -> String {
        format!("{START_PREFIX}{}", self.ours_label)
    }

    /// Full end-marker line, e.g. `>>>>>>> Stashed changes`.
    pub fn end_marker(&self) -> String {
        format!("{END_PREFIX}{}", self.theirs_label)
    }

    /// Compile the block-matching pattern for these labels.
    pub fn compile(&self) -> Result<ConflictPattern, ConfigError> {
        if self.ours_label.trim().is_empty() || self.theirs_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "conflicts.ours_label/theirs_label".into(),
                detail: "marker labels must not be empty".into(),
            });
        }

        // Marker lines are anchored to line starts. Either side may be empty,
        // in which case its group is skipped along with its line break.
        let source = format!(
            concat!(
                r"(?ms)^{start}\r?\n(?:(?P<ours>.*?)\r?\n)??(?P<sep>{sep})\r?\n",
                r"(?:(?P<theirs>.*?)\r?\n)??(?P<end>{end})(?P<eol>\r?\n|$)",
            ),
            start = regex_lite::escape(&self.start_marker()),
            sep = regex_lite::escape(SEPARATOR),
            end = regex_lite::escape(&self.end_marker()),
        );
        let block = Regex::new(&source).map_err(|e| ConfigError::InvalidValue {
            field: "conflicts.ours_label/theirs_label".into(),
            detail: e.to_string(),
        })?;

        debug!(pattern = %source, "compiled conflict pattern");
        Ok(ConflictPattern {
            block,
            start_marker: self.start_marker(),
            end_marker: self.end_marker(),
        })
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// Compiled matcher for one marker convention.
#[derive(Debug, Clone)]
pub struct ConflictPattern {
    block: Regex,
    start_marker: String,
    end_marker: String,
}

impl ConflictPattern {
    /// Number of start-marker lines in `text`, matched or not.
    pub fn count_start_markers(&self, text: &str) -> usize {
        text.lines().filter(|l| *l == self.start_marker).count()
    }

    /// Every well-formed block in `text`, in document order.
    ///
    /// A candidate whose sides contain another block's start marker (or, on
    /// the ours side, an end marker) belongs to a malformed block. It is
    /// skipped and the search resumes after its start marker, so one broken
    /// block never swallows its neighbour.
    pub fn scan(&self, text: &str) -> Vec<ConflictBlock> {
        let mut blocks = Vec::new();
        let mut pos = 0;

        while let Some(caps) = self.block.captures_at(text, pos) {
            let (Some(whole), Some(sep), Some(end)) =
                (caps.get(0), caps.name("sep"), caps.name("end"))
            else {
                break;
            };
            let ours = caps.name("ours").map_or("", |m| m.as_str());
            let theirs = caps.name("theirs").map(|m| m.as_str());
            let eol = caps.name("eol").map_or("", |m| m.as_str());

            let crosses_block = has_line(ours, &self.start_marker)
                || has_line(ours, &self.end_marker)
                || theirs.is_some_and(|t| has_line(t, &self.start_marker));
            if crosses_block {
                debug!(
                    line = line_of(text, whole.start()),
                    "skipping malformed conflict block"
                );
                pos = whole.start() + self.start_marker.len();
                continue;
            }

            blocks.push(ConflictBlock {
                span: whole.range(),
                start_line: line_of(text, whole.start()),
                separator_line: line_of(text, sep.start()),
                end_line: line_of(text, end.start()),
                has_base_section: ours.lines().any(|l| l.starts_with(BASE_MARKER)),
                ours: ours.to_string(),
                theirs: theirs.unwrap_or("").to_string(),
                // An empty theirs side removes the block's lines entirely.
                replacement: theirs.map_or_else(String::new, |t| format!("{t}{eol}")),
            });
            pos = whole.end();
        }

        blocks
    }
}

fn has_line(side: &str, marker: &str) -> bool {
    side.lines().any(|l| l == marker)
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One matched conflict block.
///
/// Blocks are transient: they describe a span of one document and are not
/// meaningful once that document has been rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBlock {
    /// Byte range of the whole block, start marker through the end marker's
    /// line break.
    pub span: Range<usize>,
    /// 1-based line of the start marker.
    pub start_line: usize,
    /// 1-based line of the `=======` separator.
    pub separator_line: usize,
    /// 1-based line of the end marker.
    pub end_line: usize,
    /// Text between the start marker and the separator.
    pub ours: String,
    /// Text between the separator and the end marker. This side is kept.
    pub theirs: String,
    /// What the block is replaced with: the theirs side plus the end
    /// marker's line break, or nothing when the theirs side is empty.
    pub replacement: String,
    /// The ours side carries a diff3 `|||||||` ancestor section, which the
    /// two-way pattern folds into the discarded side.
    pub has_base_section: bool,
}

impl ConflictBlock {
    /// Number of lines on the ours side.
    pub fn ours_lines(&self) -> usize {
        self.separator_line - self.start_line - 1
    }

    /// Number of lines on the theirs side.
    pub fn theirs_lines(&self) -> usize {
        self.end_line - self.separator_line - 1
    }
}

/// 1-based line number of byte `offset` in `text`.
fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
