//! Command implementations.

pub mod breakdown;
pub mod preview;
pub mod serve;
pub mod summary;
pub mod trend;
pub mod weather;

use std::path::{Path, PathBuf};

use bikeshare::{AxisValue, Dashboard, DashboardConfig, FilterSpec};
use colored::Colorize;

use crate::cli::FilterArgs;

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub base_year: Option<i32>,
    pub delimiter: Option<char>,
    pub hourly: Option<PathBuf>,
    pub verbose: bool,
}

impl Options {
    /// Config file values with command-line overrides applied.
    pub fn dashboard_config(&self) -> bikeshare::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(year) = self.base_year {
            config = config.with_base_year(year);
        }
        if let Some(delimiter) = self.delimiter {
            config = config.with_delimiter(delimiter);
        }
        if let Some(hourly) = &self.hourly {
            config = config.with_hourly_source(hourly);
        }
        Ok(config)
    }
}

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load the data file and build a dashboard over it.
pub fn open_dashboard(file: &Path, options: &Options) -> bikeshare::Result<Dashboard> {
    let config = options.dashboard_config()?;
    let dashboard = Dashboard::open(file, config)?;
    if options.verbose {
        if let Some(source) = dashboard.source() {
            println!(
                "{} {} ({} rows, {})",
                "Loaded".dimmed(),
                source.file,
                source.row_count,
                source.format
            );
        }
    }
    Ok(dashboard)
}

/// Resolve filter arguments against the dashboard's labels.
pub fn resolve_filter(dashboard: &Dashboard, filter: &FilterArgs) -> bikeshare::Result<FilterSpec> {
    dashboard.parse_filter(filter.weather.as_deref(), filter.year.as_deref())
}

/// One-line description of a filter selection.
pub fn describe_filter(dashboard: &Dashboard, spec: &FilterSpec) -> String {
    let labels = dashboard.labels();
    let weather = spec
        .weather
        .map(|w| labels.key_label(&bikeshare::GroupKey::Weather(w)))
        .unwrap_or_else(|| "all".to_string());
    let year = spec
        .year
        .map(|y| labels.year_label(y))
        .unwrap_or_else(|| "all".to_string());
    format!("weather: {}, year: {}", weather, year)
}

/// Message shown instead of an empty chart.
pub fn print_empty_state() {
    println!(
        "{}",
        "No records match the selected filters.".yellow().bold()
    );
}

/// Horizontal bar scaled against `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

/// Print labelled values with bars; missing values print as `-`.
pub fn print_axis(title: &str, values: &[AxisValue]) {
    println!("{}", title.yellow().bold());
    let max = values
        .iter()
        .filter_map(|v| v.value)
        .fold(0.0_f64, f64::max);
    let width = values.iter().map(|v| v.label.len()).max().unwrap_or(0);

    for value in values {
        match value.value {
            Some(v) => println!(
                "  {:<width$}  {:>10.1}  {}",
                value.label,
                v,
                bar(v, max, 30).cyan(),
                width = width
            ),
            None => println!("  {:<width$}  {:>10}", value.label, "-".dimmed(), width = width),
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(100.0, 100.0, 10).chars().count(), 10);
        assert!(bar(0.0, 100.0, 10).is_empty());
        assert!(bar(10.0, 0.0, 10).is_empty());
    }

    #[test]
    fn test_cli_overrides_config() {
        let options = Options {
            base_year: Some(2015),
            delimiter: Some(';'),
            hourly: Some(PathBuf::from("hour_cleaned.csv")),
            ..Options::default()
        };
        let config = options.dashboard_config().unwrap();
        assert_eq!(config.base_year, 2015);
        assert_eq!(config.loader.delimiter, Some(';'));
        assert_eq!(config.hourly_source, Some(PathBuf::from("hour_cleaned.csv")));
    }
}
