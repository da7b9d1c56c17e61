//! Error types for the `shouty` crate.

/// Errors surfaced by person and network operations.
#[derive(Debug, thiserror::Error)]
pub enum ShoutyError {
    /// The person has no network to shout through, either because it was
    /// built detached or because its network has been dropped.
    #[error("person is not attached to a network")]
    DetachedParticipant,
}
