//! Dashboard facade: one dataset, one configuration, one report per filter.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{
    AggregationEngine, AggregationResult, CategoryField, DEFAULT_BASE_YEAR, FilterSpec, GroupKey,
    Reducer, Subset,
};
use crate::error::{BikeshareError, Result};
use crate::input::{Loader, LoaderConfig, SourceMetadata, TablePreview};
use crate::labels::{LabelField, LabelTable};
use crate::model::{Dataset, Metric, Record, Season, WeatherCondition, Weekday};

/// Configuration for a dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Calendar year of year indicator 0.
    pub base_year: i32,
    /// Loader settings.
    pub loader: LoaderConfig,
    /// Order in which seasons are displayed.
    pub season_order: Vec<Season>,
    /// Number of records shown in the data preview.
    pub preview_rows: usize,
    /// Optional hourly table shown next to the daily preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_source: Option<PathBuf>,
    /// Label overrides applied over the built-in tables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<LabelField, IndexMap<i64, String>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            loader: LoaderConfig::default(),
            season_order: Season::DISPLAY_ORDER.to_vec(),
            preview_rows: 5,
            hourly_source: None,
            labels: IndexMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BikeshareError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: DashboardConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_year(mut self, base_year: i32) -> Self {
        self.base_year = base_year;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.loader.delimiter = Some(delimiter);
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_hourly_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.hourly_source = Some(path.into());
        self
    }

    /// Check the season order is a permutation of all four seasons.
    pub fn validate(&self) -> Result<()> {
        let complete = self.season_order.len() == Season::ALL.len()
            && Season::ALL.iter().all(|s| self.season_order.contains(s));
        if !complete {
            return Err(BikeshareError::Config(format!(
                "season_order must list each season exactly once, got {:?}",
                self.season_order
            )));
        }
        Ok(())
    }

    /// Label table for this configuration.
    pub fn label_table(&self) -> LabelTable {
        LabelTable::new(self.base_year).with_overrides(&self.labels)
    }
}

/// One position on a fixed display axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisValue {
    pub key: GroupKey,
    pub label: String,
    /// Reduced value, `None` when the category has no records.
    pub value: Option<f64>,
    pub records: usize,
}

/// The weekday with the highest mean total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusiestDay {
    pub weekday: Weekday,
    pub label: String,
    pub mean_total: f64,
}

/// Everything a dashboard page shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub filter: FilterSpec,
    /// Records left after filtering.
    pub records: usize,
    /// Sums of total/casual/registered by weather condition.
    pub weather_totals: AggregationResult,
    /// Means of total/casual/registered by weather condition.
    pub weather_means: AggregationResult,
    /// Sums of total/casual/registered per (year, month), chronological.
    pub monthly_trend: AggregationResult,
    /// Mean total per season, in configured display order.
    pub season_means: Vec<AxisValue>,
    /// Mean total for working days and weekends.
    pub working_day_means: Vec<AxisValue>,
    /// Mean total per weekday, Monday through Sunday.
    pub weekday_means: Vec<AxisValue>,
    pub busiest_weekday: Option<BusiestDay>,
}

impl DashboardReport {
    /// True when the filter matched nothing; renderers show an empty state.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// A loaded dataset plus the engine and labels used to present it.
pub struct Dashboard {
    dataset: Dataset,
    source: Option<SourceMetadata>,
    hourly_preview: Option<TablePreview>,
    config: DashboardConfig,
    engine: AggregationEngine,
    labels: LabelTable,
}

impl Dashboard {
    /// Create a dashboard over an in-memory dataset with default settings.
    pub fn new(dataset: Dataset) -> Result<Self> {
        Self::with_config(dataset, DashboardConfig::default())
    }

    /// Create a dashboard over an in-memory dataset.
    ///
    /// Fails if the configuration or its label table is invalid.
    pub fn with_config(dataset: Dataset, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let labels = config.label_table();
        labels.validate()?;

        Ok(Self {
            dataset,
            source: None,
            hourly_preview: None,
            engine: AggregationEngine::with_base_year(config.base_year),
            config,
            labels,
        })
    }

    /// Load a dataset file and build a dashboard over it.
    pub fn open(path: impl AsRef<Path>, config: DashboardConfig) -> Result<Self> {
        let loader = Loader::with_config(config.loader.clone());
        let (dataset, source) = loader.load_file(path)?;
        let hourly_preview = config
            .hourly_source
            .as_ref()
            .map(|hourly| loader.preview_file(hourly, config.preview_rows))
            .transpose()?;
        info!(
            file = %source.file,
            records = dataset.len(),
            hash = %source.hash,
            "dataset ready"
        );

        let mut dashboard = Self::with_config(dataset, config)?;
        dashboard.source = Some(source);
        dashboard.hourly_preview = hourly_preview;
        Ok(dashboard)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Metadata of the file the dataset came from, if loaded from disk.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Parse raw weather/year selections into a filter.
    pub fn parse_filter(&self, weather: Option<&str>, year: Option<&str>) -> Result<FilterSpec> {
        self.labels.parse_filter(weather, year)
    }

    /// Records matching `spec`.
    pub fn select(&self, spec: &FilterSpec) -> Subset<'_> {
        self.engine.filter(&self.dataset, spec)
    }

    /// First records of the dataset, unfiltered.
    pub fn preview(&self) -> &[Record] {
        self.dataset.head(self.config.preview_rows)
    }

    /// First rows of the hourly table, when one was configured.
    pub fn hourly_preview(&self) -> Option<&TablePreview> {
        self.hourly_preview.as_ref()
    }

    /// Grouped reduction over the filtered data.
    pub fn breakdown(
        &self,
        spec: &FilterSpec,
        field: CategoryField,
        metrics: &[Metric],
        reducer: Reducer,
    ) -> Result<AggregationResult> {
        let subset = self.select(spec);
        self.engine.aggregate_by_category(&subset, field, metrics, reducer)
    }

    /// Monthly trend over the filtered data.
    pub fn trend(
        &self,
        spec: &FilterSpec,
        metrics: &[Metric],
        reducer: Reducer,
    ) -> Result<AggregationResult> {
        let subset = self.select(spec);
        self.engine.aggregate_time_trend(&subset, metrics, reducer)
    }

    /// Canonical display axis for a field, if it has one.
    pub fn display_axis(&self, field: CategoryField) -> Option<Vec<GroupKey>> {
        let axis = match field {
            CategoryField::Weather => WeatherCondition::ALL.into_iter().map(GroupKey::Weather).collect(),
            CategoryField::Season => self
                .config
                .season_order
                .iter()
                .copied()
                .map(GroupKey::Season)
                .collect(),
            CategoryField::Weekday => Weekday::MONDAY_FIRST.into_iter().map(GroupKey::Weekday).collect(),
            CategoryField::WorkingDay => vec![GroupKey::WorkingDay(true), GroupKey::WorkingDay(false)],
            CategoryField::Year | CategoryField::Month => return None,
        };
        Some(axis)
    }

    /// Lay a result out along the field's display axis with labels.
    ///
    /// Fields without a fixed axis keep the result's own rows.
    pub fn on_axis(&self, result: &AggregationResult, field: CategoryField, metric: Metric) -> Vec<AxisValue> {
        match self.display_axis(field) {
            Some(axis) => result
                .reindex(&axis)
                .into_iter()
                .map(|(key, row)| AxisValue {
                    key,
                    label: self.labels.key_label(&key),
                    value: row.and_then(|r| r.value(metric)),
                    records: row.map(|r| r.records).unwrap_or(0),
                })
                .collect(),
            None => result
                .rows
                .iter()
                .map(|row| AxisValue {
                    key: row.key,
                    label: self.labels.key_label(&row.key),
                    value: row.value(metric),
                    records: row.records,
                })
                .collect(),
        }
    }

    /// Compute every panel for a filter selection.
    pub fn report(&self, spec: &FilterSpec) -> Result<DashboardReport> {
        let subset = self.select(spec);
        let engine = &self.engine;
        let all_metrics = Metric::ALL;

        let weather_totals =
            engine.aggregate_by_category(&subset, CategoryField::Weather, &all_metrics, Reducer::Sum)?;
        let weather_means =
            engine.aggregate_by_category(&subset, CategoryField::Weather, &all_metrics, Reducer::Mean)?;
        let monthly_trend = engine.aggregate_time_trend(&subset, &all_metrics, Reducer::Sum)?;

        let season = engine.aggregate_by_category(&subset, CategoryField::Season, &[Metric::Total], Reducer::Mean)?;
        let working = engine.aggregate_by_category(
            &subset,
            CategoryField::WorkingDay,
            &[Metric::Total],
            Reducer::Mean,
        )?;
        let weekday = engine.aggregate_by_category(&subset, CategoryField::Weekday, &[Metric::Total], Reducer::Mean)?;

        let busiest_weekday = engine.busiest_weekday(&subset)?.map(|(day, mean)| BusiestDay {
            weekday: day,
            label: self.labels.key_label(&GroupKey::Weekday(day)),
            mean_total: mean,
        });

        debug!(records = subset.len(), empty = subset.is_empty(), "built dashboard report");

        Ok(DashboardReport {
            filter: *spec,
            records: subset.len(),
            weather_totals,
            weather_means,
            monthly_trend,
            season_means: self.on_axis(&season, CategoryField::Season, Metric::Total),
            working_day_means: self.on_axis(&working, CategoryField::WorkingDay, Metric::Total),
            weekday_means: self.on_axis(&weekday, CategoryField::Weekday, Metric::Total),
            busiest_weekday,
        })
    }
}
