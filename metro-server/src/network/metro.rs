//! The network index.
//!
//! `Metro` owns every line and the lookup tables derived from them. The
//! tables are computed once, in the constructor, and never change; all
//! queries take `&self` and can run concurrently.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::domain::{Adjacency, Line, Station};

use super::error::NetworkError;
use super::search::{LineId, Route, find_line_chain, stitch};

/// A metro network: a set of lines and the stations they share.
#[derive(Debug, Clone)]
pub struct Metro {
    /// Lines in name order, addressed by `LineId`.
    lines: Vec<Line>,

    by_name: HashMap<String, LineId>,

    /// Every line calling at a station, in ascending `LineId` order.
    station_lines: HashMap<Station, Vec<LineId>>,

    /// Adjacency resolved to ids, in adjacency (name) order.
    neighbours: Vec<Vec<LineId>>,
}

impl Metro {
    /// Build a network from a set of finished lines.
    ///
    /// # Errors
    ///
    /// Returns `Err` if two lines share a name, a line lists an adjacent
    /// line that is not in the set, or any line's adjacency disagrees with
    /// the stations it actually shares with other lines.
    pub fn new(lines: impl IntoIterator<Item = Line>) -> Result<Self, NetworkError> {
        let mut lines: Vec<Line> = lines.into_iter().collect();
        lines.sort_by(|a, b| a.name().cmp(b.name()));

        if let Some(pair) = lines.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(NetworkError::DuplicateLine {
                line: pair[0].name().to_string(),
            });
        }

        let by_name: HashMap<String, LineId> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.name().to_string(), LineId(i)))
            .collect();

        let station_lines = index_stations(&lines);

        let mut neighbours = Vec::with_capacity(lines.len());
        for line in &lines {
            let mut ids = Vec::new();
            for other in line.adjacent_line_names() {
                let id = by_name
                    .get(other)
                    .copied()
                    .ok_or_else(|| NetworkError::UnknownAdjacentLine {
                        line: line.name().to_string(),
                        other: other.to_string(),
                    })?;
                ids.push(id);
            }
            neighbours.push(ids);
        }

        check_adjacency(&lines, &station_lines)?;

        Ok(Metro {
            lines,
            by_name,
            station_lines,
            neighbours,
        })
    }

    /// Build a network from a map of line name to line.
    ///
    /// # Errors
    ///
    /// As [`Metro::new`], and also if a key differs from the name of the
    /// line stored under it.
    pub fn from_map(lines: HashMap<String, Line>) -> Result<Self, NetworkError> {
        if let Some((key, line)) = lines.iter().find(|(key, line)| key.as_str() != line.name()) {
            return Err(NetworkError::KeyMismatch {
                key: key.clone(),
                line: line.name().to_string(),
            });
        }
        Self::new(lines.into_values())
    }

    /// Find a route between two stations.
    ///
    /// Stations on a common line are joined along the first such line in
    /// name order. Otherwise the search starts from the first line calling
    /// at `start` and returns *a* route, not necessarily the shortest.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::StationNotFound`] if no line calls at either station
    /// - [`NetworkError::NoRoute`] if the stations are in disconnected parts
    ///   of the network
    pub fn find_path(&self, start: &Station, end: &Station) -> Result<Route, NetworkError> {
        let start_line = self.first_line_at(start)?;
        let end_lines = self.line_ids_at(end)?;

        if start == end {
            return Ok(Route::stay(&self.lines[start_line.0], start.clone()));
        }

        let no_route = || NetworkError::NoRoute {
            from: start.clone(),
            to: end.clone(),
        };

        // Stations on a common line are joined by that line alone
        let shared = self
            .line_ids_at(start)?
            .iter()
            .find(|id| end_lines.binary_search(id).is_ok())
            .copied();

        let chain = match shared {
            Some(line) => vec![line],
            None => find_line_chain(&self.neighbours, start_line, |id| {
                end_lines.binary_search(&id).is_ok()
            })
            .ok_or_else(no_route)?,
        };

        let chain: Vec<&Line> = chain.iter().map(|id| &self.lines[id.0]).collect();
        let route = stitch(&chain, start, end).ok_or_else(no_route)?;

        debug!(
            from = %start,
            to = %end,
            lines = chain.len(),
            stations = route.len(),
            changes = route.changes(),
            "route found"
        );

        Ok(route)
    }

    /// Returns the lines sharing at least one station with the named line,
    /// in name order.
    pub fn adjacent_lines(&self, line_name: &str) -> Result<Vec<&Line>, NetworkError> {
        let id = self.line_id(line_name)?;
        Ok(self.neighbours[id.0]
            .iter()
            .map(|other| &self.lines[other.0])
            .collect())
    }

    /// Returns the stations on the named line in travel order.
    pub fn stations_on_line(&self, line_name: &str) -> Result<&[Station], NetworkError> {
        let id = self.line_id(line_name)?;
        Ok(self.lines[id.0].stations())
    }

    /// Every distinct station, walking lines in name order and keeping the
    /// first appearance of each.
    pub fn all_stations(&self) -> Vec<&Station> {
        let mut seen = HashSet::new();
        self.lines
            .iter()
            .flat_map(|line| line.stations())
            .filter(|station| seen.insert(*station))
            .collect()
    }

    /// Render every station name, one per line, in [`Metro::all_stations`]
    /// order.
    pub fn output_all_stations(&self) -> String {
        let mut out = String::new();
        for station in self.all_stations() {
            out.push_str(station.name());
            out.push('\n');
        }
        out
    }

    /// Each line with its first and last terminus, in name order.
    pub fn termini(&self) -> Vec<(&str, &Station, &Station)> {
        self.lines
            .iter()
            .map(|line| (line.name(), line.first_terminal(), line.last_terminal()))
            .collect()
    }

    /// Look up a line by name.
    pub fn line(&self, name: &str) -> Option<&Line> {
        self.by_name.get(name).map(|id| &self.lines[id.0])
    }

    /// All lines in name order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.lines.iter()
    }

    /// Lines calling at `station`, in name order. Empty for unknown stations.
    pub fn lines_at<'a>(
        &'a self,
        station: &Station,
    ) -> impl Iterator<Item = &'a Line> + use<'a> {
        self.station_lines
            .get(station)
            .into_iter()
            .flatten()
            .map(|id| &self.lines[id.0])
    }

    /// Look up a station by name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.station_lines.get_key_value(name).map(|(s, _)| s)
    }

    /// Check whether any line calls at `station`.
    pub fn contains(&self, station: &Station) -> bool {
        self.station_lines.contains_key(station)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of distinct stations.
    pub fn station_count(&self) -> usize {
        self.station_lines.len()
    }

    fn line_id(&self, name: &str) -> Result<LineId, NetworkError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| NetworkError::LineNotFound {
                line: name.to_string(),
            })
    }

    fn line_ids_at(&self, station: &Station) -> Result<&[LineId], NetworkError> {
        self.station_lines
            .get(station)
            .map(Vec::as_slice)
            .ok_or_else(|| NetworkError::StationNotFound {
                station: station.name().to_string(),
            })
    }

    fn first_line_at(&self, station: &Station) -> Result<LineId, NetworkError> {
        // Entries are never empty: a station is only indexed via a line
        self.line_ids_at(station)?
            .first()
            .copied()
            .ok_or_else(|| NetworkError::StationNotFound {
                station: station.name().to_string(),
            })
    }
}

/// Build the reverse index from station to the lines calling there.
fn index_stations(lines: &[Line]) -> HashMap<Station, Vec<LineId>> {
    let mut index: HashMap<Station, Vec<LineId>> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        for station in line.stations() {
            index.entry(station.clone()).or_default().push(LineId(i));
        }
    }
    index
}

/// Adjacency each line should have, derived from the stations it shares.
fn derive_adjacency(
    lines: &[Line],
    station_lines: &HashMap<Station, Vec<LineId>>,
) -> Vec<Adjacency> {
    let mut derived: Vec<Adjacency> = vec![BTreeMap::new(); lines.len()];
    for (station, ids) in station_lines {
        for &a in ids {
            for &b in ids {
                if a != b {
                    derived[a.0]
                        .entry(lines[b.0].name().to_string())
                        .or_insert_with(BTreeSet::new)
                        .insert(station.clone());
                }
            }
        }
    }
    derived
}

fn check_adjacency(
    lines: &[Line],
    station_lines: &HashMap<Station, Vec<LineId>>,
) -> Result<(), NetworkError> {
    let derived = derive_adjacency(lines, station_lines);
    for (line, expected) in lines.iter().zip(&derived) {
        if line.adjacency() == expected {
            continue;
        }
        let other = expected
            .keys()
            .chain(line.adjacency().keys())
            .find(|name| expected.get(*name) != line.adjacency().get(*name))
            .cloned()
            .unwrap_or_default();
        return Err(NetworkError::InconsistentAdjacency {
            line: line.name().to_string(),
            other,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(s: &str) -> Station {
        Station::parse(s).unwrap()
    }

    fn stations(names: &[&str]) -> Vec<Station> {
        names.iter().map(|s| st(s)).collect()
    }

    fn line(name: &str, names: &[&str], adjacency: &[(&str, &[&str])]) -> Line {
        let adjacency: Adjacency = adjacency
            .iter()
            .map(|(other, shared)| (other.to_string(), shared.iter().map(|s| st(s)).collect()))
            .collect();
        Line::new(name, stations(names), adjacency).unwrap()
    }

    // line1 a - b - c - d
    // line2 d - e - f - g - h
    // line3 b - j - k - d
    // line4 j - l - m - n - f
    fn sample_lines() -> Vec<Line> {
        vec![
            line(
                "line1",
                &["a", "b", "c", "d"],
                &[("line2", &["d"]), ("line3", &["b", "d"])],
            ),
            line(
                "line2",
                &["d", "e", "f", "g", "h"],
                &[("line1", &["d"]), ("line3", &["d"]), ("line4", &["f"])],
            ),
            line(
                "line3",
                &["b", "j", "k", "d"],
                &[("line1", &["b", "d"]), ("line2", &["d"]), ("line4", &["j"])],
            ),
            line(
                "line4",
                &["j", "l", "m", "n", "f"],
                &[("line2", &["f"]), ("line3", &["j"])],
            ),
        ]
    }

    fn sample() -> Metro {
        Metro::new(sample_lines()).unwrap()
    }

    fn names(lines: &[&Line]) -> Vec<String> {
        lines.iter().map(|l| l.name().to_string()).collect()
    }

    #[test]
    fn path_between_lines_passes_junction() {
        let metro = sample();
        let route = metro.find_path(&st("h"), &st("b")).unwrap();
        assert_eq!(
            route.stations(),
            stations(&["h", "g", "f", "e", "d", "c", "b"]).as_slice()
        );
        assert_eq!(route.lines().collect::<Vec<_>>(), vec!["line2", "line1"]);
        assert_eq!(route.changes(), 1);
    }

    #[test]
    fn path_through_several_lines() {
        // line1 -> line2 -> line3 -> line4 in adjacency order, changing at d
        // without riding line2, then at j
        let metro = sample();
        let route = metro.find_path(&st("a"), &st("n")).unwrap();
        assert_eq!(
            route.stations(),
            stations(&["a", "b", "c", "d", "k", "j", "l", "m", "n"]).as_slice()
        );
        assert_eq!(
            route.lines().collect::<Vec<_>>(),
            vec!["line1", "line3", "line4"]
        );
    }

    #[test]
    fn path_on_one_line_either_direction() {
        let metro = sample();
        let route = metro.find_path(&st("e"), &st("g")).unwrap();
        assert_eq!(route.stations(), stations(&["e", "f", "g"]).as_slice());

        let route = metro.find_path(&st("g"), &st("e")).unwrap();
        assert_eq!(route.stations(), stations(&["g", "f", "e"]).as_slice());
    }

    #[test]
    fn path_to_self_is_single_station() {
        let metro = sample();
        for station in metro.all_stations() {
            let route = metro.find_path(station, station).unwrap();
            assert_eq!(route.stations(), std::slice::from_ref(station));
        }
    }

    #[test]
    fn path_from_unknown_station() {
        let metro = sample();
        let err = metro.find_path(&st("zz"), &st("a")).unwrap_err();
        assert_eq!(
            err,
            NetworkError::StationNotFound {
                station: "zz".into()
            }
        );
        let err = metro.find_path(&st("a"), &st("zz")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_station_to_itself_is_not_found() {
        let metro = sample();
        let err = metro.find_path(&st("zz"), &st("zz")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn no_route_between_disconnected_lines() {
        let mut lines = sample_lines();
        lines.push(line("island", &["p", "q"], &[]));
        let metro = Metro::new(lines).unwrap();

        let err = metro.find_path(&st("a"), &st("q")).unwrap_err();
        assert_eq!(
            err,
            NetworkError::NoRoute {
                from: st("a"),
                to: st("q")
            }
        );
    }

    #[test]
    fn adjacent_lines_in_name_order() {
        let metro = sample();
        assert_eq!(
            names(&metro.adjacent_lines("line2").unwrap()),
            vec!["line1", "line3", "line4"]
        );
        assert_eq!(
            names(&metro.adjacent_lines("line4").unwrap()),
            vec!["line2", "line3"]
        );
    }

    #[test]
    fn adjacent_lines_of_unknown_line() {
        let metro = sample();
        let err = metro.adjacent_lines("nonexistent").unwrap_err();
        assert_eq!(
            err,
            NetworkError::LineNotFound {
                line: "nonexistent".into()
            }
        );

        let empty = Metro::new(Vec::new()).unwrap();
        assert!(empty.adjacent_lines("nonexistent").is_err());
    }

    #[test]
    fn stations_on_line_verbatim() {
        let metro = sample();
        assert_eq!(
            metro.stations_on_line("line3").unwrap(),
            stations(&["b", "j", "k", "d"]).as_slice()
        );
        assert!(metro.stations_on_line("line9").unwrap_err().is_not_found());
    }

    #[test]
    fn output_all_stations_first_appearance_order() {
        let metro = sample();
        assert_eq!(metro.output_all_stations(), "a\nb\nc\nd\ne\nf\ng\nh\nj\nk\nl\nm\nn\n");
        assert_eq!(metro.station_count(), 13);
        assert_eq!(metro.line_count(), 4);
    }

    #[test]
    fn termini_per_line() {
        let metro = sample();
        let termini = metro.termini();
        assert_eq!(termini[0], ("line1", &st("a"), &st("d")));
        assert_eq!(termini[3], ("line4", &st("j"), &st("f")));
    }

    #[test]
    fn reverse_index_covers_every_station() {
        let metro = sample();
        for line in metro.lines() {
            for station in line.stations() {
                assert!(metro.lines_at(station).any(|l| l == line));
            }
        }
        let at_d: Vec<_> = metro.lines_at(&st("d")).map(Line::name).collect();
        assert_eq!(at_d, vec!["line1", "line2", "line3"]);
        assert_eq!(metro.lines_at(&st("zz")).count(), 0);
    }

    #[test]
    fn station_lookup_by_name() {
        let metro = sample();
        assert_eq!(metro.station("k"), Some(&st("k")));
        assert_eq!(metro.station("K"), None);
        assert!(metro.contains(&st("k")));
        assert_eq!(metro.line("line2").map(Line::len), Some(5));
    }

    #[test]
    fn rejects_duplicate_lines() {
        let mut lines = sample_lines();
        let duplicate = lines[0].clone();
        lines.push(duplicate);
        let err = Metro::new(lines).unwrap_err();
        assert_eq!(
            err,
            NetworkError::DuplicateLine {
                line: "line1".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_adjacent_line() {
        let lines = vec![line("line1", &["a", "b"], &[("ghost", &["a"])])];
        let err = Metro::new(lines).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownAdjacentLine { other, .. } if other == "ghost"));
    }

    #[test]
    fn rejects_one_sided_adjacency() {
        let lines = vec![
            line("line1", &["a", "b"], &[("line2", &["b"])]),
            line("line2", &["b", "c"], &[]),
        ];
        let err = Metro::new(lines).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InconsistentAdjacency {
                line: "line2".into(),
                other: "line1".into()
            }
        );
    }

    #[test]
    fn rejects_missing_adjacency() {
        // Both lines call at b but neither says so
        let lines = vec![
            line("line1", &["a", "b"], &[]),
            line("line2", &["b", "c"], &[]),
        ];
        assert!(matches!(
            Metro::new(lines),
            Err(NetworkError::InconsistentAdjacency { .. })
        ));
    }

    #[test]
    fn from_map_checks_keys() {
        let mut map: HashMap<String, Line> = sample_lines()
            .into_iter()
            .map(|l| (l.name().to_string(), l))
            .collect();
        let metro = Metro::from_map(map.clone()).unwrap();
        assert_eq!(metro.line_count(), 4);

        let line1 = map.remove("line1").unwrap();
        map.insert("renamed".into(), line1);
        let err = Metro::from_map(map).unwrap_err();
        assert_eq!(
            err,
            NetworkError::KeyMismatch {
                key: "renamed".into(),
                line: "line1".into()
            }
        );
    }

    #[test]
    fn metro_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Metro>();
    }
}
