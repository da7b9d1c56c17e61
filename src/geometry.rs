//! Distance calculations between positions.
//!
//! Positions live on a single axis, so the distance is the absolute
//! difference. `abs_diff` keeps this total over the whole `i64` range.

use super::types::Position;

/// Distance in metres between two positions.
pub fn distance(a: Position, b: Position) -> u64 {
    a.abs_diff(b)
}

/// Inclusive range test: is `candidate` at most `range` metres from `origin`?
pub fn within_range(origin: Position, candidate: Position, range: u64) -> bool {
    distance(origin, candidate) <= range
}
