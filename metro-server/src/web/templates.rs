//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Line;
use crate::network::{Route, RouteLeg};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the line list and route form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lines: Vec<LineView>,
    pub station_count: usize,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Route result fragment.
#[derive(Template)]
#[template(path = "route.html")]
pub struct RouteTemplate {
    pub route: RouteView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Line view model for templates.
#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub first: String,
    pub last: String,
    pub station_count: usize,
    pub adjacent: Vec<String>,
}

impl LineView {
    /// Create from a domain Line.
    pub fn from_line(line: &Line) -> Self {
        Self {
            name: line.name().to_string(),
            first: line.first_terminal().to_string(),
            last: line.last_terminal().to_string(),
            station_count: line.len(),
            adjacent: line.adjacent_line_names().map(str::to_string).collect(),
        }
    }

    /// Adjacent line names joined for display, or "none".
    pub fn adjacent_summary(&self) -> String {
        if self.adjacent.is_empty() {
            "none".to_string()
        } else {
            self.adjacent.join(", ")
        }
    }
}

/// Route view model for templates.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub from: String,
    pub to: String,
    pub stop_count: usize,
    pub changes: usize,
    pub legs: Vec<LegView>,
}

impl RouteView {
    /// Create from a network Route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            from: route.origin().to_string(),
            to: route.destination().to_string(),
            stop_count: route.len(),
            changes: route.changes(),
            legs: route.legs().iter().map(LegView::from_leg).collect(),
        }
    }

    /// Returns e.g. "no changes", "1 change" or "2 changes".
    pub fn changes_summary(&self) -> String {
        match self.changes {
            0 => "no changes".to_string(),
            1 => "1 change".to_string(),
            n => format!("{n} changes"),
        }
    }
}

/// One leg of a route for display.
#[derive(Debug, Clone)]
pub struct LegView {
    pub line: String,
    pub board: String,
    pub alight: String,
    /// Stations passed between boarding and alighting
    pub via: Vec<String>,
}

impl LegView {
    /// Create from a network RouteLeg.
    pub fn from_leg(leg: &RouteLeg) -> Self {
        let via = match leg.stations() {
            [_, middle @ .., _] => middle.iter().map(|s| s.to_string()).collect(),
            _ => Vec::new(),
        };
        Self {
            line: leg.line().to_string(),
            board: leg.board().to_string(),
            alight: leg.alight().to_string(),
            via,
        }
    }

    /// Returns e.g. "Calling at b, c, and d", or an empty string for a
    /// leg with no intermediate stations.
    pub fn calling_points_summary(&self) -> String {
        match self.via.as_slice() {
            [] => String::new(),
            [only] => format!("Calling at {only}"),
            [first, second] => format!("Calling at {first} and {second}"),
            [rest @ .., last] => format!("Calling at {}, and {}", rest.join(", "), last),
        }
    }
}
