//! Grouped reductions over filtered subsets.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::model::{Dataset, Metric, Record, Weekday};

use super::filter::{self, FilterSpec, Subset};
use super::types::{
    AggregateRow, AggregationResult, CategoryField, GroupKey, Grouping, Reducer, YearMonth,
};

/// Calendar year of year indicator 0 in the public bike-sharing dataset.
pub const DEFAULT_BASE_YEAR: i32 = 2011;

/// Computes the derived tables a dashboard renders.
///
/// The engine holds no data; every call works on the subset it is given.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine {
    base_year: i32,
}

impl AggregationEngine {
    /// Create an engine with the default base year.
    pub fn new() -> Self {
        Self::with_base_year(DEFAULT_BASE_YEAR)
    }

    /// Create an engine that maps year indicator 0 to `base_year`.
    pub fn with_base_year(base_year: i32) -> Self {
        Self { base_year }
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Select the records matching `spec`.
    pub fn filter<'a>(&self, dataset: &'a Dataset, spec: &FilterSpec) -> Subset<'a> {
        let subset = filter::filter(dataset, spec);
        debug!(
            weather = ?spec.weather,
            year = ?spec.year,
            selected = subset.len(),
            total = dataset.len(),
            "applied filter"
        );
        subset
    }

    /// Partition `subset` by `field` and reduce each metric per partition.
    ///
    /// Rows come out in ascending key order. Categories with no records get
    /// no row.
    pub fn aggregate_by_category(
        &self,
        subset: &Subset<'_>,
        field: CategoryField,
        metrics: &[Metric],
        reducer: Reducer,
    ) -> Result<AggregationResult> {
        let metrics = normalize_metrics(metrics)?;
        let mut rows = reduce_groups(subset, &metrics, reducer, |r| field.key_of(r));
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        debug!(%field, %reducer, groups = rows.len(), "aggregated by category");

        Ok(AggregationResult {
            grouping: Grouping::Category(field),
            reducer,
            metrics,
            rows,
        })
    }

    /// Group `subset` by (year, month) and reduce each metric per period.
    ///
    /// Rows are sorted chronologically by absolute year, then month.
    pub fn aggregate_time_trend(
        &self,
        subset: &Subset<'_>,
        metrics: &[Metric],
        reducer: Reducer,
    ) -> Result<AggregationResult> {
        let metrics = normalize_metrics(metrics)?;
        let base_year = self.base_year;
        let mut rows = reduce_groups(subset, &metrics, reducer, |r| {
            GroupKey::Period(YearMonth::new(r.year, r.month, base_year))
        });
        rows.sort_by_key(|row| match row.key {
            GroupKey::Period(period) => (period.year, period.month),
            _ => (i32::MIN, 0),
        });

        debug!(%reducer, periods = rows.len(), "aggregated time trend");

        Ok(AggregationResult {
            grouping: Grouping::Period,
            reducer,
            metrics,
            rows,
        })
    }

    /// Weekday with the highest mean total, ties going to the earliest day
    /// from Monday through Sunday. `None` when the subset is empty.
    pub fn busiest_weekday(&self, subset: &Subset<'_>) -> Result<Option<(Weekday, f64)>> {
        let by_day =
            self.aggregate_by_category(subset, CategoryField::Weekday, &[Metric::Total], Reducer::Mean)?;
        let order: Vec<GroupKey> = Weekday::MONDAY_FIRST
            .into_iter()
            .map(GroupKey::Weekday)
            .collect();

        Ok(by_day
            .highest(Metric::Total, &order)
            .and_then(|row| match (row.key, row.value(Metric::Total)) {
                (GroupKey::Weekday(day), Some(mean)) => Some((day, mean)),
                _ => None,
            }))
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject empty metric lists and drop repeats, keeping first-seen order.
fn normalize_metrics(metrics: &[Metric]) -> Result<Vec<Metric>> {
    if metrics.is_empty() {
        return Err(BikeshareError::InvalidQuery(
            "at least one metric is required".to_string(),
        ));
    }
    let mut unique = Vec::with_capacity(metrics.len());
    for metric in metrics {
        if !unique.contains(metric) {
            unique.push(*metric);
        }
    }
    Ok(unique)
}

/// Sum every metric per key in one pass, then apply the reducer.
fn reduce_groups<F>(
    subset: &Subset<'_>,
    metrics: &[Metric],
    reducer: Reducer,
    key_of: F,
) -> Vec<AggregateRow>
where
    F: Fn(&Record) -> GroupKey,
{
    let mut groups: IndexMap<GroupKey, (usize, Vec<u64>)> = IndexMap::new();

    for record in subset.iter() {
        let (count, sums) = groups
            .entry(key_of(record))
            .or_insert_with(|| (0, vec![0; metrics.len()]));
        *count += 1;
        for (sum, metric) in sums.iter_mut().zip(metrics) {
            *sum += u64::from(record.metric(*metric));
        }
    }

    groups
        .into_iter()
        .map(|(key, (count, sums))| {
            let values = metrics
                .iter()
                .zip(sums)
                .map(|(metric, sum)| {
                    let value = match reducer {
                        Reducer::Sum => sum as f64,
                        Reducer::Mean => sum as f64 / count as f64,
                    };
                    (*metric, value)
                })
                .collect();
            AggregateRow {
                key,
                records: count,
                values,
            }
        })
        .collect()
}
