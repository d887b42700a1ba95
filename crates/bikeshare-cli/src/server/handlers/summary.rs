//! Full dashboard report handler.

use axum::{
    extract::{Query, State},
    Json,
};
use bikeshare::DashboardReport;
use serde::Deserialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Weather/year selectors accepted by every analysis endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub weather: Option<String>,
    pub year: Option<String>,
}

/// GET /api/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DashboardReport>, ApiError> {
    let spec = state.filter(query.weather.as_deref(), query.year.as_deref())?;
    let report = state.dashboard.report(&spec)?;
    Ok(Json(report))
}
