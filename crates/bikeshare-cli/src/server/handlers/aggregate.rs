//! Grouped aggregation and trend handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use bikeshare::{AggregationResult, AxisValue, CategoryField, Metric, Reducer};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query for `/api/aggregate`.
#[derive(Debug, Default, Deserialize)]
pub struct AggregateQuery {
    /// Field to group by; defaults to weather.
    pub by: Option<String>,
    /// Comma-separated metrics; defaults to total.
    pub metrics: Option<String>,
    /// `sum` or `mean`; defaults to mean.
    pub reducer: Option<String>,
    pub weather: Option<String>,
    pub year: Option<String>,
}

/// Query for `/api/trend`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// Comma-separated metrics; defaults to all three.
    pub metrics: Option<String>,
    /// `sum` or `mean`; defaults to sum.
    pub reducer: Option<String>,
    pub weather: Option<String>,
    pub year: Option<String>,
}

/// One metric laid out along the field's display axis.
#[derive(Serialize)]
pub struct AxisSeries {
    pub metric: Metric,
    pub values: Vec<AxisValue>,
}

#[derive(Serialize)]
pub struct AggregateResponse {
    pub result: AggregationResult,
    pub series: Vec<AxisSeries>,
}

fn parse_metrics(raw: Option<&str>, default: &[Metric]) -> Result<Vec<Metric>, ApiError> {
    match raw {
        None => Ok(default.to_vec()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| m.parse::<Metric>().map_err(ApiError::BadRequest))
            .collect(),
    }
}

fn parse_reducer(raw: Option<&str>, default: Reducer) -> Result<Reducer, ApiError> {
    raw.map_or(Ok(default), |r| r.parse().map_err(ApiError::BadRequest))
}

/// GET /api/aggregate
pub async fn get_aggregate(
    State(state): State<AppState>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let field: CategoryField = query
        .by
        .as_deref()
        .map_or(Ok(CategoryField::Weather), |by| by.parse::<CategoryField>())
        .map_err(ApiError::BadRequest)?;
    let metrics = parse_metrics(query.metrics.as_deref(), &[Metric::Total])?;
    let reducer = parse_reducer(query.reducer.as_deref(), Reducer::Mean)?;
    let spec = state.filter(query.weather.as_deref(), query.year.as_deref())?;

    let dashboard = &state.dashboard;
    let result = dashboard.breakdown(&spec, field, &metrics, reducer)?;
    let series = result
        .metrics
        .iter()
        .map(|metric| AxisSeries {
            metric: *metric,
            values: dashboard.on_axis(&result, field, *metric),
        })
        .collect();

    Ok(Json(AggregateResponse { result, series }))
}

/// GET /api/trend
pub async fn get_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<AggregationResult>, ApiError> {
    let metrics = parse_metrics(query.metrics.as_deref(), &Metric::ALL)?;
    let reducer = parse_reducer(query.reducer.as_deref(), Reducer::Sum)?;
    let spec = state.filter(query.weather.as_deref(), query.year.as_deref())?;

    let result = state.dashboard.trend(&spec, &metrics, reducer)?;
    Ok(Json(result))
}
