//! Type definitions shared across the crate.
//!
//! Contains the identifiers and value types used by both sides of the
//! person/network relationship:
//! - Person identity assigned at registration
//! - One-dimensional positions
//! - The transient emission event built for each shout

use std::fmt;

/// Position along a single axis, in metres from a fixed origin.
///
/// Any sign is accepted. A position is a coordinate, not a non-negative
/// measure, so two persons on opposite sides of the origin are simply
/// `|a - b|` apart.
pub type Position = i64;

/// Identity handed out by a network when a person registers with it.
///
/// Ids are allocated in registration order starting at zero and are only
/// unique within a single network. After `u32::MAX` registrations the
/// network logs an error and allocation restarts at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(pub(crate) u32);

impl PersonId {
    /// Raw registration index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single shout in flight.
///
/// Built at the start of a distribution call from the sender's state at that
/// moment and dropped when the call returns.
#[derive(Debug, Clone)]
pub struct Emission<'a> {
    /// Sender id, if the sender is registered on the emitting network.
    pub sender: Option<PersonId>,
    pub message: &'a str,
    /// Sender position at the time of the shout.
    pub origin: Position,
}
