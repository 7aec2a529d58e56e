//! Line type.
//!
//! A `Line` is an ordered run of stations plus a record of which other lines
//! it meets and where. Other lines are referred to by name only; resolving a
//! name to a `Line` is the job of the network index that owns them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{DomainError, Station};

/// Stations shared with each adjacent line, keyed by that line's name.
pub type Adjacency = BTreeMap<String, BTreeSet<Station>>;

static NO_JUNCTIONS: BTreeSet<Station> = BTreeSet::new();

/// A named transit line.
///
/// # Invariants
///
/// - The name is not blank
/// - There is at least one station, and no station appears twice
/// - Station order is travel order; the first and last are the termini
/// - The line never lists itself as adjacent
/// - Every shared station in the adjacency map is on the line
#[derive(Debug, Clone)]
pub struct Line {
    name: String,
    stations: Vec<Station>,
    positions: HashMap<Station, usize>,
    adjacency: Adjacency,
}

impl Line {
    /// Construct a line, validating its invariants.
    ///
    /// Repeated stations collapse to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `name` is blank
    /// - `stations` is empty
    /// - `adjacency` names this line
    /// - `adjacency` shares a station that is not on this line, or
    ///   lists a line with no shared station at all
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::{BTreeMap, BTreeSet};
    /// use metro_server::domain::{Line, Station};
    ///
    /// let st = |s: &str| Station::parse(s).unwrap();
    ///
    /// let mut adjacency = BTreeMap::new();
    /// adjacency.insert("line2".to_string(), BTreeSet::from([st("d")]));
    ///
    /// let line = Line::new("line1", [st("a"), st("b"), st("c"), st("d")], adjacency).unwrap();
    /// assert_eq!(line.first_terminal(), &st("a"));
    /// assert_eq!(line.last_terminal(), &st("d"));
    /// assert!(line.is_adjacent_to("line2"));
    /// assert_eq!(line.to_string(), "line1: a <-> b <-> c <-> d");
    /// ```
    pub fn new(
        name: impl Into<String>,
        stations: impl IntoIterator<Item = Station>,
        adjacency: Adjacency,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyLineName);
        }

        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for station in stations {
            if !positions.contains_key(&station) {
                positions.insert(station.clone(), ordered.len());
                ordered.push(station);
            }
        }

        if ordered.is_empty() {
            return Err(DomainError::NoStations { line: name });
        }

        if adjacency.contains_key(&name) {
            return Err(DomainError::SelfAdjacent { line: name });
        }

        for (other, shared) in &adjacency {
            if shared.is_empty() {
                return Err(DomainError::EmptyJunction {
                    line: name,
                    other: other.clone(),
                });
            }
            if let Some(station) = shared.iter().find(|s| !positions.contains_key(*s)) {
                return Err(DomainError::ForeignJunction {
                    line: name,
                    other: other.clone(),
                    station: station.clone(),
                });
            }
        }

        Ok(Line {
            name,
            stations: ordered,
            positions,
            adjacency,
        })
    }

    /// Returns the line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stations in travel order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Returns the number of stations on the line (always at least one).
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false; a line has at least one station.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether the named line shares a station with this one.
    pub fn is_adjacent_to(&self, line_name: &str) -> bool {
        self.adjacency.contains_key(line_name)
    }

    /// Check whether the line calls at `station`.
    pub fn contains(&self, station: &Station) -> bool {
        self.positions.contains_key(station)
    }

    /// Returns the index of `station` in travel order.
    pub fn position_of(&self, station: &Station) -> Option<usize> {
        self.positions.get(station).copied()
    }

    /// Returns the first terminus.
    pub fn first_terminal(&self) -> &Station {
        // Non-empty: validated at construction
        &self.stations[0]
    }

    /// Returns the last terminus.
    pub fn last_terminal(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }

    /// Returns the stations shared with the named line.
    ///
    /// Empty if the lines are not adjacent.
    pub fn intersecting_stations_of(&self, line_name: &str) -> &BTreeSet<Station> {
        self.adjacency.get(line_name).unwrap_or(&NO_JUNCTIONS)
    }

    /// Names of adjacent lines, in name order.
    pub fn adjacent_line_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    /// Returns the full adjacency map.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Returns the stations passed riding from `from` to `to`, both inclusive.
    ///
    /// The run is reversed when `to` comes before `from` on the line, so the
    /// result always starts at `from`. Returns `None` if either station is
    /// not on the line.
    pub fn segment(&self, from: &Station, to: &Station) -> Option<Vec<Station>> {
        let start = self.position_of(from)?;
        let end = self.position_of(to)?;

        let run = if start <= end {
            self.stations[start..=end].to_vec()
        } else {
            self.stations[end..=start].iter().rev().cloned().collect()
        };
        Some(run)
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.stations == other.stations
            && self.adjacency == other.adjacency
    }
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.stations.hash(state);
        self.adjacency.hash(state);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, station) in self.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(" <-> ")?;
            }
            write!(f, "{station}")?;
        }
        Ok(())
    }
}
