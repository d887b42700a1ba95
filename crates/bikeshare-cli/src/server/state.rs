//! Application state for the web server.

use std::sync::Arc;

use bikeshare::{Dashboard, FilterSpec};

use super::error::ApiError;

/// Shared application state.
///
/// The dashboard is read-only once loaded, so handlers share it without locks.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }

    /// Resolve raw query selectors into a filter.
    pub fn filter(&self, weather: Option<&str>, year: Option<&str>) -> Result<FilterSpec, ApiError> {
        Ok(self.dashboard.parse_filter(weather, year)?)
    }
}
