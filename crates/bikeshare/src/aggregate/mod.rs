//! Filtering and grouped aggregation.

mod engine;
mod filter;
mod types;

pub use engine::{AggregationEngine, DEFAULT_BASE_YEAR};
pub use filter::{filter, FilterSpec, Subset};
pub use types::{
    AggregateRow, AggregationResult, CategoryField, GroupKey, Grouping, Reducer, YearMonth,
};
