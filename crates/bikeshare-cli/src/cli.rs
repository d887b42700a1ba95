//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use bikeshare::{CategoryField, Metric, Reducer};

/// Bikeshare: explore daily bike-rental usage
#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dashboard configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calendar year of year indicator 0 (overrides the config file)
    #[arg(long, global = true)]
    pub base_year: Option<i32>,

    /// Field delimiter of the data file (default: auto-detect)
    #[arg(long, global = true)]
    pub delimiter: Option<char>,

    /// Hourly table to preview alongside the daily data
    #[arg(long, global = true, value_name = "FILE")]
    pub hourly: Option<PathBuf>,
}

/// Weather and year selection shared by the analysis commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Weather condition: code (1-4), label, or "all"
    #[arg(short, long)]
    pub weather: Option<String>,

    /// Year: indicator (0/1), calendar year, or "all"
    #[arg(short, long)]
    pub year: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every dashboard panel for a selection
    Summary {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rental counts by weather condition
    Weather {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// How counts are reduced per condition (sum or mean)
        #[arg(short, long, default_value = "mean")]
        reducer: Reducer,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly rental trend in chronological order
    Trend {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Metrics to report (total, casual, registered)
        #[arg(short, long, value_delimiter = ',', default_value = "total,casual,registered")]
        metrics: Vec<Metric>,

        /// How counts are reduced per month (sum or mean)
        #[arg(short, long, default_value = "sum")]
        reducer: Reducer,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Group by any categorical field
    Breakdown {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field to group by (weather, season, working-day, weekday, year, month)
        #[arg(short, long)]
        by: CategoryField,

        #[command(flatten)]
        filter: FilterArgs,

        /// Metrics to report (total, casual, registered)
        #[arg(short, long, value_delimiter = ',', default_value = "total")]
        metrics: Vec<Metric>,

        /// How counts are reduced per group (sum or mean)
        #[arg(short, long, default_value = "mean")]
        reducer: Reducer,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the first records of the data file
    Preview {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of records to show (default from config, 5)
        #[arg(short = 'n', long)]
        rows: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the dashboard JSON API
    Serve {
        /// Path to the daily data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_breakdown() {
        let cli = Cli::try_parse_from([
            "bikeshare",
            "breakdown",
            "day.csv",
            "--by",
            "season",
            "--metrics",
            "casual,registered",
            "--reducer",
            "sum",
            "--year",
            "2012",
        ])
        .unwrap();

        match cli.command {
            Commands::Breakdown {
                by,
                filter,
                metrics,
                reducer,
                json,
                ..
            } => {
                assert_eq!(by, CategoryField::Season);
                assert_eq!(metrics, vec![Metric::Casual, Metric::Registered]);
                assert_eq!(reducer, Reducer::Sum);
                assert_eq!(filter.year.as_deref(), Some("2012"));
                assert!(filter.weather.is_none());
                assert!(!json);
            }
            _ => panic!("expected breakdown"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bikeshare",
            "summary",
            "day.csv",
            "--verbose",
            "--base-year",
            "2015",
            "--weather",
            "1",
            "--hourly",
            "hour_cleaned.csv",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.base_year, Some(2015));
        assert_eq!(cli.hourly, Some(PathBuf::from("hour_cleaned.csv")));
        match cli.command {
            Commands::Summary { filter, .. } => assert_eq!(filter.weather.as_deref(), Some("1")),
            _ => panic!("expected summary"),
        }
    }

    #[test]
    fn test_rejects_unknown_reducer() {
        let result = Cli::try_parse_from(["bikeshare", "weather", "day.csv", "--reducer", "median"]);
        assert!(result.is_err());
    }
}
