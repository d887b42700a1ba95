//! Bikeshare: filtering and aggregation engine for bike-rental usage data.
//!
//! The library loads a pre-cleaned daily rental table, narrows it with simple
//! equality filters and reduces it into the grouped tables a dashboard draws:
//! sums and means by category, and chronological monthly trends.
//!
//! # Core Principles
//!
//! - **Explicit state**: the dataset is a value passed to every operation
//! - **Non-destructive**: filtering borrows records, the source never changes
//! - **Empty is not an error**: a filter that matches nothing yields an empty result
//!
//! # Example
//!
//! ```no_run
//! use bikeshare::{CategoryField, Dashboard, DashboardConfig, Metric, Reducer};
//!
//! let dashboard = Dashboard::open("day_cleaned.csv", DashboardConfig::default()).unwrap();
//! let spec = dashboard.parse_filter(Some("1"), Some("2012")).unwrap();
//!
//! let by_weather = dashboard
//!     .breakdown(&spec, CategoryField::Weather, &[Metric::Total], Reducer::Mean)
//!     .unwrap();
//! println!("Groups: {}", by_weather.len());
//! ```

pub mod aggregate;
pub mod error;
pub mod input;
pub mod labels;
pub mod model;

mod dashboard;

pub use crate::dashboard::{AxisValue, BusiestDay, Dashboard, DashboardConfig, DashboardReport};
pub use aggregate::{
    AggregateRow, AggregationEngine, AggregationResult, CategoryField, FilterSpec, GroupKey,
    Grouping, Reducer, Subset, YearMonth,
};
pub use error::{BikeshareError, Result};
pub use input::{Loader, LoaderConfig, SourceMetadata, TablePreview};
pub use labels::{LabelField, LabelTable};
pub use model::{Dataset, Metric, Record, Season, WeatherCondition, Weekday, YearIndicator};
