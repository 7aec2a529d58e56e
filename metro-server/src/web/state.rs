//! Application state for the web layer.

use std::sync::Arc;

use crate::network::Metro;

/// Shared application state.
///
/// The network is immutable once built, so handlers share it without locks.
#[derive(Clone)]
pub struct AppState {
    /// The metro network being served
    pub metro: Arc<Metro>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(metro: Metro) -> Self {
        Self {
            metro: Arc::new(metro),
        }
    }
}
