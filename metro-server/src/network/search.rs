//! Two-phase route search.
//!
//! Routing happens first over the line graph, where each line is a node and
//! lines sharing a station are connected. A depth-first search finds some
//! chain of lines from a line calling at the origin to a line calling at
//! the destination. The chain is then stitched into a station sequence by
//! riding each line, in the right direction, from where the traveller is to
//! the junction with the next line.
//!
//! The search finds *a* route, the first in adjacency order, not the
//! shortest one.

use tracing::trace;

use crate::domain::{Line, Station};

/// Index of a line in the network's line table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct LineId(pub(crate) usize);

/// Stations ridden on one line.
///
/// Legs are only built by the route search and always hold at least one
/// station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLeg {
    line: String,
    stations: Vec<Station>,
}

impl RouteLeg {
    /// Returns `None` if `stations` is empty.
    fn new(line: &Line, stations: Vec<Station>) -> Option<Self> {
        if stations.is_empty() {
            return None;
        }
        Some(RouteLeg {
            line: line.name().to_string(),
            stations,
        })
    }

    /// Name of the line ridden.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Stations passed, boarding and alighting stations included.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Station the leg starts from.
    pub fn board(&self) -> &Station {
        &self.stations[0]
    }

    /// Station the leg ends at.
    pub fn alight(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }
}

/// A route between two stations.
///
/// Consecutive legs meet at a junction station, which appears once in
/// [`Route::stations`]. A route is never empty: a route from a station to
/// itself is that single station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    legs: Vec<RouteLeg>,
    stations: Vec<Station>,
}

impl Route {
    /// Build a route from its legs. Returns `None` if there are no legs or
    /// any leg is empty.
    fn from_legs(legs: Vec<RouteLeg>) -> Option<Self> {
        let mut stations = Vec::new();
        for leg in &legs {
            let (first, rest) = leg.stations.split_first()?;
            if stations.last() != Some(first) {
                stations.push(first.clone());
            }
            stations.extend(rest.iter().cloned());
        }

        if stations.is_empty() {
            return None;
        }
        Some(Route { legs, stations })
    }

    /// A route that goes nowhere: `station` on `line`.
    pub(crate) fn stay(line: &Line, station: Station) -> Self {
        let leg = RouteLeg {
            line: line.name().to_string(),
            stations: vec![station.clone()],
        };
        Route {
            legs: vec![leg],
            stations: vec![station],
        }
    }

    /// Returns the legs, one per line ridden.
    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    /// Returns every station on the route in travel order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Consume the route, returning the station sequence.
    pub fn into_stations(self) -> Vec<Station> {
        self.stations
    }

    /// Returns the number of stations on the route.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false; a route holds at least one station.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first station.
    pub fn origin(&self) -> &Station {
        &self.stations[0]
    }

    /// Returns the last station.
    pub fn destination(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }

    /// Number of changes between lines.
    pub fn changes(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    /// Names of the lines ridden, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.legs.iter().map(|leg| leg.line.as_str())
    }
}

/// Depth-first search over the line graph.
///
/// `neighbours[i]` lists the lines adjacent to line `i`, in the order they
/// should be tried. Returns the chain of lines from `start` to the first
/// line found satisfying `is_goal`, or `None` if every line reachable from
/// `start` has been explored. The walk keeps an explicit stack, so deep
/// chains of lines cannot overflow the call stack; a visited set bounds it
/// to one visit per line.
pub(crate) fn find_line_chain(
    neighbours: &[Vec<LineId>],
    start: LineId,
    is_goal: impl Fn(LineId) -> bool,
) -> Option<Vec<LineId>> {
    let mut visited = vec![false; neighbours.len()];
    visited[start.0] = true;

    if is_goal(start) {
        return Some(vec![start]);
    }

    // Each frame is a line on the candidate chain and the next neighbour to try.
    let mut chain: Vec<(LineId, usize)> = vec![(start, 0)];

    loop {
        let frame = chain.last_mut()?;
        let line = frame.0;
        let candidate = neighbours[line.0].get(frame.1).copied();
        frame.1 += 1;

        match candidate {
            Some(next) if !visited[next.0] => {
                visited[next.0] = true;
                chain.push((next, 0));
                trace!(from = line.0, to = next.0, depth = chain.len(), "line search descend");

                if is_goal(next) {
                    return Some(chain.into_iter().map(|(id, _)| id).collect());
                }
            }
            Some(_) => {}
            None => {
                chain.pop();
                trace!(line = line.0, depth = chain.len(), "line search backtrack");
            }
        }
    }
}

/// Pick where to change from `previous` to the line named `next`.
///
/// The junction nearest to `position` along `previous` wins, so a traveller
/// already standing at a junction changes there. Ties go to the first
/// junction in name order.
fn choose_transfer(previous: &Line, next: &str, position: &Station) -> Option<Station> {
    let here = previous.position_of(position)?;
    previous
        .intersecting_stations_of(next)
        .iter()
        .filter_map(|s| previous.position_of(s).map(|at| (s, here.abs_diff(at))))
        .min_by_key(|(_, distance)| *distance)
        .map(|(s, _)| s.clone())
}

/// Turn a chain of adjacent lines into a station-level route.
///
/// `chain[0]` must call at `origin` and the last line at `destination`.
/// Returns `None` if the chain does not join up.
pub(crate) fn stitch(chain: &[&Line], origin: &Station, destination: &Station) -> Option<Route> {
    let (last, earlier) = chain.split_last()?;

    let mut legs = Vec::new();
    let mut position = origin.clone();

    for (i, previous) in earlier.iter().enumerate() {
        let next = chain[i + 1];
        let transfer = choose_transfer(previous, next.name(), &position)?;
        let ride = previous.segment(&position, &transfer)?;

        // Already at the junction: nothing ridden on this line
        if ride.len() > 1 {
            legs.push(RouteLeg::new(previous, ride)?);
        }
        position = transfer;
    }

    let ride = last.segment(&position, destination)?;
    if ride.len() > 1 || legs.is_empty() {
        legs.push(RouteLeg::new(last, ride)?);
    }

    Route::from_legs(legs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Adjacency;

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

    fn ids(raw: &[usize]) -> Vec<LineId> {
        raw.iter().map(|&i| LineId(i)).collect()
    }

    #[test]
    fn chain_of_one_when_start_is_goal() {
        let neighbours = vec![ids(&[1]), ids(&[0])];
        let chain = find_line_chain(&neighbours, LineId(0), |id| id == LineId(0));
        assert_eq!(chain, Some(ids(&[0])));
    }

    #[test]
    fn chain_follows_adjacency_order() {
        // 0 - 1 - 3
        //  \- 2 -/
        let neighbours = vec![ids(&[1, 2]), ids(&[0, 3]), ids(&[0, 3]), ids(&[1, 2])];
        let chain = find_line_chain(&neighbours, LineId(0), |id| id == LineId(3));
        assert_eq!(chain, Some(ids(&[0, 1, 3])));
    }

    #[test]
    fn chain_backtracks_out_of_dead_ends() {
        // 0 - 1 - 2 (dead end), 0 - 3 - 4 (goal)
        let neighbours = vec![
            ids(&[1, 3]),
            ids(&[0, 2]),
            ids(&[1]),
            ids(&[0, 4]),
            ids(&[3]),
        ];
        let chain = find_line_chain(&neighbours, LineId(0), |id| id == LineId(4));
        assert_eq!(chain, Some(ids(&[0, 3, 4])));
    }

    #[test]
    fn chain_terminates_on_cycles_without_goal() {
        let neighbours = vec![ids(&[1, 2]), ids(&[0, 2]), ids(&[0, 1]), ids(&[])];
        let chain = find_line_chain(&neighbours, LineId(0), |id| id == LineId(3));
        assert_eq!(chain, None);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = 100_000;
        let neighbours: Vec<Vec<LineId>> = (0..n)
            .map(|i| {
                let mut adj = Vec::new();
                if i > 0 {
                    adj.push(LineId(i - 1));
                }
                if i + 1 < n {
                    adj.push(LineId(i + 1));
                }
                adj
            })
            .collect();
        let chain = find_line_chain(&neighbours, LineId(0), |id| id == LineId(n - 1)).unwrap();
        assert_eq!(chain.len(), n);
    }

    #[test]
    fn stitch_single_line_forward_and_reverse() {
        let l = line("line1", &["a", "b", "c", "d"], &[]);
        let route = stitch(&[&l], &st("b"), &st("d")).unwrap();
        assert_eq!(route.stations(), stations(&["b", "c", "d"]).as_slice());

        let route = stitch(&[&l], &st("d"), &st("a")).unwrap();
        assert_eq!(route.stations(), stations(&["d", "c", "b", "a"]).as_slice());
        assert_eq!(route.changes(), 0);
    }

    #[test]
    fn stitch_reverses_each_leg_as_needed() {
        let line1 = line("line1", &["a", "b", "c", "d"], &[("line2", &["d"])]);
        let line2 = line("line2", &["d", "e", "f", "g", "h"], &[("line1", &["d"])]);

        let route = stitch(&[&line2, &line1], &st("h"), &st("b")).unwrap();
        assert_eq!(
            route.stations(),
            stations(&["h", "g", "f", "e", "d", "c", "b"]).as_slice()
        );
        assert_eq!(route.lines().collect::<Vec<_>>(), vec!["line2", "line1"]);
        assert_eq!(route.legs()[0].alight(), &st("d"));
        assert_eq!(route.legs()[1].board(), &st("d"));
    }

    #[test]
    fn stitch_changes_at_nearest_junction() {
        // line1 meets line3 at both b and d; riding from c, d is nearer
        let line1 = line("line1", &["a", "b", "c", "d", "x"], &[("line3", &["b", "d"])]);
        let line3 = line("line3", &["b", "j", "k", "d"], &[("line1", &["b", "d"])]);

        let route = stitch(&[&line1, &line3], &st("x"), &st("k")).unwrap();
        assert_eq!(route.stations(), stations(&["x", "d", "k"]).as_slice());
    }

    #[test]
    fn stitch_skips_lines_not_ridden() {
        // Starting at the junction d, nothing is ridden on line1
        let line1 = line("line1", &["a", "d"], &[("line2", &["d"])]);
        let line2 = line("line2", &["d", "e"], &[("line1", &["d"])]);

        let route = stitch(&[&line1, &line2], &st("d"), &st("e")).unwrap();
        assert_eq!(route.stations(), stations(&["d", "e"]).as_slice());
        assert_eq!(route.lines().collect::<Vec<_>>(), vec!["line2"]);
    }

    #[test]
    fn stitch_rejects_broken_chain() {
        let line1 = line("line1", &["a", "b"], &[]);
        let line2 = line("line2", &["c", "d"], &[]);
        assert!(stitch(&[&line1, &line2], &st("a"), &st("d")).is_none());
        assert!(stitch(&[], &st("a"), &st("d")).is_none());
    }

    #[test]
    fn route_accessors() {
        let l = line("line1", &["a", "b", "c"], &[]);
        let route = stitch(&[&l], &st("a"), &st("c")).unwrap();
        assert_eq!(route.origin(), &st("a"));
        assert_eq!(route.destination(), &st("c"));
        assert_eq!(route.len(), 3);
        assert!(!route.is_empty());
        assert_eq!(route.into_stations(), stations(&["a", "b", "c"]));
    }

    #[test]
    fn leg_needs_a_station() {
        let l = line("line1", &["a", "b"], &[]);
        assert!(RouteLeg::new(&l, Vec::new()).is_none());

        let leg = RouteLeg::new(&l, stations(&["b"])).unwrap();
        assert_eq!(leg.line(), "line1");
        assert_eq!(leg.board(), &st("b"));
        assert_eq!(leg.alight(), &st("b"));
    }

    #[test]
    fn stitched_legs_are_never_empty() {
        let line1 = line("line1", &["a", "b", "d"], &[("line2", &["d"])]);
        let line2 = line("line2", &["d", "e"], &[("line1", &["d"])]);

        let route = stitch(&[&line1, &line2], &st("a"), &st("e")).unwrap();
        for leg in route.legs() {
            assert!(!leg.stations().is_empty());
            assert_eq!(leg.board(), &leg.stations()[0]);
        }
        assert_eq!(route.legs()[0].stations(), stations(&["a", "b", "d"]).as_slice());
        assert_eq!(route.legs()[1].line(), "line2");
    }

    #[test]
    fn stay_route_is_single_station() {
        let l = line("line1", &["a", "b"], &[]);
        let route = Route::stay(&l, st("a"));
        assert_eq!(route.stations(), stations(&["a"]).as_slice());
        assert_eq!(route.changes(), 0);
    }
}
