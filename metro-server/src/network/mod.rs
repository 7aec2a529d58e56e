//! The metro network and route search.
//!
//! A [`Metro`] is built once, usually through a [`MetroBuilder`], and is
//! read-only from then on. Route search runs in two phases: a depth-first
//! search over the graph of lines, then stitching the chosen lines into a
//! station-by-station route.

mod builder;
mod error;
mod metro;
mod search;


pub use builder::MetroBuilder;
pub use error::NetworkError;
pub use metro::Metro;
pub use search::{Route, RouteLeg};
