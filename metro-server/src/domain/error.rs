//! Domain error types.
//!
//! These errors represent invalid construction of domain values. They are
//! raised once, when a line is built, and are fatal to that construction
//! attempt.

use super::Station;

/// Domain-level errors for line construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A line was given a blank name
    #[error("a line must have a non-blank name")]
    EmptyLineName,

    /// A line was given no stations
    #[error("line {line} must have at least one station")]
    NoStations { line: String },

    /// A line lists itself as adjacent
    #[error("line {line} cannot be adjacent to itself")]
    SelfAdjacent { line: String },

    /// A shared station in the adjacency map is not on the line
    #[error("line {line} shares station {station} with {other} but does not call there")]
    ForeignJunction {
        line: String,
        other: String,
        station: Station,
    },

    /// An adjacency entry has no shared stations
    #[error("line {line} lists {other} as adjacent without a shared station")]
    EmptyJunction { line: String, other: String },
}
