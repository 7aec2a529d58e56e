//! Incremental network construction.
//!
//! Raw `(station, line)` pairs go in; a validated [`Metro`] comes out. The
//! builder works purely on names. Adjacency between lines is derived only
//! once, in [`MetroBuilder::build`], from the stations each pair of lines
//! has in common.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Adjacency, DomainError, Line, Station};

use super::error::NetworkError;
use super::metro::Metro;

/// Builder for a [`Metro`].
///
/// Lines keep the order they were first added in, and each line keeps its
/// stations in first-insertion order.
///
/// # Example
///
/// ```
/// use metro_server::domain::Station;
/// use metro_server::network::MetroBuilder;
///
/// let mut builder = MetroBuilder::new();
/// for station in ["a", "b", "c"] {
///     builder.add_station(station, "line1").unwrap();
/// }
/// for station in ["c", "d"] {
///     builder.add_station(station, "line2").unwrap();
/// }
/// let metro = builder.build().unwrap();
///
/// let a = Station::parse("a").unwrap();
/// let d = Station::parse("d").unwrap();
/// let route = metro.find_path(&a, &d).unwrap();
/// let names: Vec<&str> = route.stations().iter().map(|s| s.name()).collect();
/// assert_eq!(names, ["a", "b", "c", "d"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetroBuilder {
    /// Line names with their stations, in first-added order.
    lines: Vec<(String, Vec<Station>)>,

    /// Stations already on each line, parallel to `lines`.
    members: Vec<HashSet<Station>>,

    /// Line name to index in `lines`.
    index: HashMap<String, usize>,
}

impl MetroBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line. Adding a line that already exists does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BlankLineName`] if `line_name` is blank.
    pub fn add_line(&mut self, line_name: &str) -> Result<&mut Self, NetworkError> {
        self.line_slot(line_name)?;
        Ok(self)
    }

    /// Record that `station_name` is on `line_name`, creating the line if
    /// needed. A station already on the line keeps its original place.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either name is blank.
    pub fn add_station(
        &mut self,
        station_name: &str,
        line_name: &str,
    ) -> Result<&mut Self, NetworkError> {
        let station = Station::parse(station_name)?;
        let slot = self.line_slot(line_name)?;

        if self.members[slot].insert(station.clone()) {
            self.lines[slot].1.push(station);
        }
        Ok(self)
    }

    /// Number of lines recorded so far.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True if no line has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stations recorded for a line so far.
    pub fn stations_of(&self, line_name: &str) -> Option<&[Station]> {
        self.index
            .get(line_name)
            .map(|&slot| self.lines[slot].1.as_slice())
    }

    /// Build the network.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any recorded line has no stations.
    pub fn build(self) -> Result<Metro, NetworkError> {
        if let Some((name, _)) = self.lines.iter().find(|(_, stations)| stations.is_empty()) {
            return Err(DomainError::NoStations { line: name.clone() }.into());
        }

        let adjacency = self.shared_stations();
        let junctions = adjacency.iter().map(Adjacency::len).sum::<usize>() / 2;

        let lines = self
            .lines
            .into_iter()
            .zip(adjacency)
            .map(|((name, stations), adjacency)| Line::new(name, stations, adjacency))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            lines = lines.len(),
            adjacent_pairs = junctions,
            "network built"
        );

        Metro::new(lines)
    }

    /// Adjacency for each recorded line, by pairwise shared stations.
    fn shared_stations(&self) -> Vec<Adjacency> {
        let mut calls: HashMap<&Station, Vec<usize>> = HashMap::new();
        for (slot, (_, stations)) in self.lines.iter().enumerate() {
            for station in stations {
                calls.entry(station).or_default().push(slot);
            }
        }

        let mut adjacency = vec![Adjacency::new(); self.lines.len()];
        for (station, slots) in calls {
            for &a in &slots {
                for &b in &slots {
                    // A line is never adjacent to itself
                    if a == b {
                        continue;
                    }
                    adjacency[a]
                        .entry(self.lines[b].0.clone())
                        .or_default()
                        .insert(station.clone());
                }
            }
        }
        adjacency
    }

    fn line_slot(&mut self, line_name: &str) -> Result<usize, NetworkError> {
        if line_name.trim().is_empty() {
            return Err(NetworkError::BlankLineName);
        }
        if let Some(&slot) = self.index.get(line_name) {
            return Ok(slot);
        }

        let slot = self.lines.len();
        self.lines.push((line_name.to_string(), Vec::new()));
        self.members.push(HashSet::new());
        self.index.insert(line_name.to_string(), slot);
        Ok(slot)
    }
}
