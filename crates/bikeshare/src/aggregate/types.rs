//! Grouping keys, reducers and aggregation results.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Metric, Record, Season, WeatherCondition, Weekday, YearIndicator};

/// Function applied to each metric within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Sum,
    Mean,
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Sum => write!(f, "sum"),
            Reducer::Mean => write!(f, "mean"),
        }
    }
}

impl std::str::FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" | "total" => Ok(Reducer::Sum),
            "mean" | "avg" | "average" => Ok(Reducer::Mean),
            _ => Err(format!("Unknown reducer: {}. Use sum or mean.", s)),
        }
    }
}

/// Categorical field a subset can be partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Weather,
    Season,
    WorkingDay,
    Weekday,
    Year,
    Month,
}

impl CategoryField {
    /// Group key of a record under this field.
    pub fn key_of(self, record: &Record) -> GroupKey {
        match self {
            CategoryField::Weather => GroupKey::Weather(record.weather),
            CategoryField::Season => GroupKey::Season(record.season),
            CategoryField::WorkingDay => GroupKey::WorkingDay(record.working_day),
            CategoryField::Weekday => GroupKey::Weekday(record.weekday),
            CategoryField::Year => GroupKey::Year(record.year),
            CategoryField::Month => GroupKey::Month(record.month),
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryField::Weather => write!(f, "weather"),
            CategoryField::Season => write!(f, "season"),
            CategoryField::WorkingDay => write!(f, "working-day"),
            CategoryField::Weekday => write!(f, "weekday"),
            CategoryField::Year => write!(f, "year"),
            CategoryField::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for CategoryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "weather" | "weathersit" => Ok(CategoryField::Weather),
            "season" => Ok(CategoryField::Season),
            "working-day" | "workingday" => Ok(CategoryField::WorkingDay),
            "weekday" | "day" => Ok(CategoryField::Weekday),
            "year" | "yr" => Ok(CategoryField::Year),
            "month" | "mnth" => Ok(CategoryField::Month),
            _ => Err(format!(
                "Unknown field: {}. Use weather, season, working-day, weekday, year, or month.",
                s
            )),
        }
    }
}

/// A calendar month within the dataset's two-year window.
///
/// Field order gives the chronological ordering: absolute year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Absolute calendar year.
    pub year: i32,
    pub month: u8,
    /// Year marker the period was derived from.
    pub indicator: YearIndicator,
}

impl YearMonth {
    pub fn new(indicator: YearIndicator, month: u8, base_year: i32) -> Self {
        Self {
            year: indicator.absolute(base_year),
            month,
            indicator,
        }
    }

    /// First calendar day of the period.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Key identifying one output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum GroupKey {
    Weather(WeatherCondition),
    Season(Season),
    WorkingDay(bool),
    Weekday(Weekday),
    Year(YearIndicator),
    Month(u8),
    Period(YearMonth),
}

impl GroupKey {
    /// Numeric code as found in the source data, for non-period keys.
    pub fn code(&self) -> Option<i64> {
        match self {
            GroupKey::Weather(w) => Some(w.code().into()),
            GroupKey::Season(s) => Some(s.code().into()),
            GroupKey::WorkingDay(flag) => Some(i64::from(*flag)),
            GroupKey::Weekday(d) => Some(d.code().into()),
            GroupKey::Year(y) => Some(y.code().into()),
            GroupKey::Month(m) => Some((*m).into()),
            GroupKey::Period(_) => None,
        }
    }
}

/// How the rows of a result were grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum Grouping {
    Category(CategoryField),
    /// (year, month) buckets in chronological order.
    Period,
}

/// Reduced metrics for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    /// Number of records in the partition.
    pub records: usize,
    /// One reduced value per requested metric, in request order.
    pub values: IndexMap<Metric, f64>,
}

impl AggregateRow {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }
}

/// Derived table handed to a renderer.
///
/// Keys are unique. An empty result means no records matched; it is not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub grouping: Grouping,
    pub reducer: Reducer,
    pub metrics: Vec<Metric>,
    pub rows: Vec<AggregateRow>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.rows.iter().map(|r| &r.key)
    }

    /// Row for a key, if the key was present in the input.
    pub fn get(&self, key: &GroupKey) -> Option<&AggregateRow> {
        self.rows.iter().find(|r| r.key == *key)
    }

    /// Reduced value for a key and metric.
    pub fn value(&self, key: &GroupKey, metric: Metric) -> Option<f64> {
        self.get(key).and_then(|r| r.value(metric))
    }

    /// Lay rows out along a fixed axis; keys absent from the result map to
    /// `None` and rows whose key is not on the axis are dropped.
    pub fn reindex<'a>(&'a self, axis: &[GroupKey]) -> Vec<(GroupKey, Option<&'a AggregateRow>)> {
        axis.iter().map(|key| (*key, self.get(key))).collect()
    }

    /// Row with the largest value of `metric`.
    ///
    /// Ties go to the key that comes first in `order`; keys missing from
    /// `order` are considered after it, in result order.
    pub fn highest(&self, metric: Metric, order: &[GroupKey]) -> Option<&AggregateRow> {
        let ordered = order.iter().filter_map(|k| self.get(k));
        let rest = self.rows.iter().filter(|r| !order.contains(&r.key));

        let mut best: Option<(&AggregateRow, f64)> = None;
        for row in ordered.chain(rest) {
            let Some(value) = row.value(metric) else {
                continue;
            };
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((row, value)),
            }
        }
        best.map(|(row, _)| row)
    }
}
