//! Rental records and the immutable dataset that holds them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};

use super::types::{Metric, Season, WeatherCondition, Weekday, YearIndicator};

/// One day of rental observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Which of the two dataset years this row belongs to.
    pub year: YearIndicator,
    /// Month of year (1-12).
    pub month: u8,
    pub weekday: Weekday,
    pub season: Season,
    pub weather: WeatherCondition,
    /// Neither weekend nor holiday.
    pub working_day: bool,
    pub casual: u32,
    pub registered: u32,
    /// Always `casual + registered`.
    pub total: u32,
}

impl Record {
    /// Value of a count field.
    pub fn metric(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Total => self.total,
            Metric::Casual => self.casual,
            Metric::Registered => self.registered,
        }
    }

    /// Check the record's invariants, returning a description of the first
    /// violation.
    pub fn check(&self) -> std::result::Result<(), String> {
        if !(1..=12).contains(&self.month) {
            return Err(format!("month {} is outside 1-12", self.month));
        }
        match self.casual.checked_add(self.registered) {
            Some(sum) if sum == self.total => {}
            _ => {
                return Err(format!(
                    "total {} does not equal casual {} + registered {}",
                    self.total, self.casual, self.registered
                ));
            }
        }
        if u32::from(self.month) != self.date.month() {
            return Err(format!(
                "month {} does not match date {}",
                self.month, self.date
            ));
        }
        let expected = Weekday::of_date(self.date);
        if self.weekday != expected {
            return Err(format!(
                "weekday {} does not match date {} ({:?})",
                self.weekday.code(),
                self.date,
                expected
            ));
        }
        Ok(())
    }
}

/// Ordered, read-only collection of records loaded for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, rejecting any record that breaks an invariant.
    ///
    /// Row numbers in errors are 1-based data rows (header excluded).
    pub fn new(records: Vec<Record>) -> Result<Self> {
        for (idx, record) in records.iter().enumerate() {
            record.check().map_err(|message| BikeshareError::InvalidRecord {
                row: idx + 1,
                message,
            })?;
        }
        Ok(Self { records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// First `n` records, for previews.
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Distinct year indicators present, ascending.
    pub fn years(&self) -> Vec<YearIndicator> {
        YearIndicator::ALL
            .into_iter()
            .filter(|y| self.records.iter().any(|r| r.year == *y))
            .collect()
    }
}
