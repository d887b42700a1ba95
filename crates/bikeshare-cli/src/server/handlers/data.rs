//! Preview, label and source metadata handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use bikeshare::{LabelField, Record, SourceMetadata, TablePreview, YearIndicator};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Maximum number of rows to return in preview.
const MAX_PREVIEW_ROWS: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// Number of rows; defaults to the configured preview size.
    pub rows: Option<usize>,
}

/// Response for the data preview endpoint.
#[derive(Serialize)]
pub struct PreviewResponse {
    pub records: Vec<Record>,
    /// Total record count in the dataset.
    pub total_rows: usize,
    /// Whether the dataset has more rows than returned.
    pub truncated: bool,
    /// Leading rows of the hourly table, when one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<TablePreview>,
}

#[derive(Serialize)]
pub struct LabelEntry {
    pub code: i64,
    pub label: String,
}

/// Label tables used to build selectors and legends.
#[derive(Serialize)]
pub struct LabelsResponse {
    pub base_year: i32,
    pub years: Vec<LabelEntry>,
    pub weather: Vec<LabelEntry>,
    pub season: Vec<LabelEntry>,
    pub weekday: Vec<LabelEntry>,
    pub working_day: Vec<LabelEntry>,
}

/// GET /api/preview
pub async fn get_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let dashboard = &state.dashboard;
    let rows = query
        .rows
        .unwrap_or(dashboard.config().preview_rows)
        .min(MAX_PREVIEW_ROWS);
    let records = dashboard.dataset().head(rows).to_vec();
    let total_rows = dashboard.dataset().len();

    Ok(Json(PreviewResponse {
        truncated: total_rows > records.len(),
        records,
        total_rows,
        hourly: dashboard.hourly_preview().cloned(),
    }))
}

/// GET /api/labels
pub async fn get_labels(State(state): State<AppState>) -> Json<LabelsResponse> {
    let labels = state.dashboard.labels();
    let entries = |field: LabelField| -> Vec<LabelEntry> {
        labels
            .labels(field)
            .into_iter()
            .map(|(code, label)| LabelEntry {
                code,
                label: label.to_string(),
            })
            .collect()
    };

    Json(LabelsResponse {
        base_year: labels.base_year,
        years: YearIndicator::ALL
            .into_iter()
            .map(|y| LabelEntry {
                code: y.code().into(),
                label: labels.year_label(y),
            })
            .collect(),
        weather: entries(LabelField::Weather),
        season: entries(LabelField::Season),
        weekday: entries(LabelField::Weekday),
        working_day: entries(LabelField::WorkingDay),
    })
}

/// GET /api/source
pub async fn get_source(State(state): State<AppState>) -> Result<Json<SourceMetadata>, ApiError> {
    state
        .dashboard
        .source()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Dataset was not loaded from a file".to_string()))
}
