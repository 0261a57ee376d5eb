//! Merge-conflict marker detection and resolution.
//!
//! The conflict subsystem is responsible for:
//! 1. **Detection** -- finding well-formed two-way blocks and their line positions.
//! 2. **Resolution** -- replacing each block with its stashed ("theirs") side.
//!
//! Three-way (diff3) blocks are not resolved specially; [`ConflictBlock`]
//! flags them so callers can warn.

pub mod detector;
pub mod resolver;

pub use detector::{ConflictBlock, ConflictMarkers, ConflictPattern};
pub use resolver::{ConflictResolver, ResolutionResult};
