//! Domain types for the metro planner.
//!
//! This module contains the value types that describe a network: stations
//! and the lines that call at them. All types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod error;
mod line;
mod station;

pub use error::DomainError;
pub use line::{Adjacency, Line};
pub use station::{InvalidStation, Station};
