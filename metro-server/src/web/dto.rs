//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Station};
use crate::network::{Route, RouteLeg};

/// Request to find a route between two stations.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    /// Origin station name
    pub from: String,

    /// Destination station name
    pub to: String,
}

/// Every station in the network.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// Station names, in first-appearance order
    pub stations: Vec<String>,
}

/// Summary of one line.
#[derive(Debug, Serialize)]
pub struct LineSummary {
    /// Line name
    pub name: String,

    /// Number of stations on the line
    pub station_count: usize,

    /// Names of lines sharing a station with this one
    pub adjacent: Vec<String>,
}

impl LineSummary {
    pub fn from_line(line: &Line) -> Self {
        Self {
            name: line.name().to_string(),
            station_count: line.len(),
            adjacent: line.adjacent_line_names().map(str::to_string).collect(),
        }
    }
}

/// Every line in the network.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineSummary>,
}

/// A line with its two terminal stations.
#[derive(Debug, Serialize)]
pub struct TerminusResult {
    /// Line name
    pub line: String,

    /// First station on the line
    pub first: String,

    /// Last station on the line
    pub last: String,
}

/// Terminals of every line.
#[derive(Debug, Serialize)]
pub struct TerminiResponse {
    pub termini: Vec<TerminusResult>,
}

/// Stations on one line.
#[derive(Debug, Serialize)]
pub struct LineStationsResponse {
    /// Line name
    pub line: String,

    /// Station names in line order
    pub stations: Vec<String>,
}

/// A line adjacent to another, with the stations they share.
#[derive(Debug, Serialize)]
pub struct AdjacentLineResult {
    /// Adjacent line name
    pub name: String,

    /// Stations where passengers can change, in name order
    pub shared_stations: Vec<String>,
}

/// Lines adjacent to one line.
#[derive(Debug, Serialize)]
pub struct AdjacentLinesResponse {
    /// Line queried
    pub line: String,

    pub adjacent: Vec<AdjacentLineResult>,
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// Line ridden
    pub line: String,

    /// Stations passed, boarding and alighting included
    pub stations: Vec<String>,
}

impl LegResult {
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            line: leg.line().to_string(),
            stations: names(leg.stations()),
        }
    }
}

/// A route between two stations.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Origin station
    pub from: String,

    /// Destination station
    pub to: String,

    /// Every station on the route in travel order
    pub stations: Vec<String>,

    /// Number of changes between lines
    pub changes: usize,

    /// Legs, one per line ridden
    pub legs: Vec<LegResult>,
}

impl RouteResponse {
    pub fn from_route(route: &Route) -> Self {
        Self {
            from: route.origin().to_string(),
            to: route.destination().to_string(),
            stations: names(route.stations()),
            changes: route.changes(),
            legs: route.legs().iter().map(LegResult::from_leg).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

fn names<'a>(stations: impl IntoIterator<Item = &'a Station>) -> Vec<String> {
    stations.into_iter().map(|s| s.name().to_string()).collect()
}
