//! Network error types.

use crate::domain::{DomainError, InvalidStation, Station};

/// Errors from building or querying a metro network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// A line failed validation while the network was being built
    #[error(transparent)]
    Build(#[from] DomainError),

    /// A station name could not be parsed
    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),

    /// A blank name was given where a line name is required
    #[error("a line name must not be blank")]
    BlankLineName,

    /// Two lines share a name
    #[error("duplicate line {line}")]
    DuplicateLine { line: String },

    /// A name in a line map does not match the line stored under it
    #[error("line {line} is stored under the name {key}")]
    KeyMismatch { key: String, line: String },

    /// A line lists an adjacent line the network does not contain
    #[error("line {line} lists unknown adjacent line {other}")]
    UnknownAdjacentLine { line: String, other: String },

    /// A line's adjacency disagrees with the stations it really shares
    #[error("adjacency between {line} and {other} does not match their shared stations")]
    InconsistentAdjacency { line: String, other: String },

    /// No line with the given name
    #[error("line not found: {line}")]
    LineNotFound { line: String },

    /// No line calls at the given station
    #[error("station not found: {station}")]
    StationNotFound { station: String },

    /// The stations are in disconnected parts of the network
    #[error("no route from {from} to {to}")]
    NoRoute { from: Station, to: Station },
}

impl NetworkError {
    /// True for unknown-line and unknown-station errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NetworkError::LineNotFound { .. } | NetworkError::StationNotFound { .. }
        )
    }
}
