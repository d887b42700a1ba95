//! Data model for rental records.

mod record;
mod types;

pub use record::{Dataset, Record};
pub use types::{Metric, Season, WeatherCondition, Weekday, YearIndicator};
