//! Equality filters over a dataset.

use serde::{Deserialize, Serialize};

use crate::model::{Dataset, Record, WeatherCondition, YearIndicator};

/// Optional equality constraints; `None` means no restriction on that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<YearIndicator>,
}

impl FilterSpec {
    /// A spec that keeps every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, weather: WeatherCondition) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_year(mut self, year: YearIndicator) -> Self {
        self.year = Some(year);
        self
    }

    /// True when neither field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.weather.is_none() && self.year.is_none()
    }

    /// Both constraints hold for the record.
    pub fn matches(&self, record: &Record) -> bool {
        self.weather.is_none_or(|w| record.weather == w)
            && self.year.is_none_or(|y| record.year == y)
    }
}

/// Records selected from a dataset, in dataset order.
///
/// Only built from a [`Dataset`], so every record has passed its checks.
#[derive(Debug, Clone, Default)]
pub struct Subset<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Subset<'a> {
    /// Every record of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }
}

/// Select the records matching `spec`. Never fails; the subset may be empty.
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Subset<'a> {
    Subset {
        records: dataset.iter().filter(|r| spec.matches(r)).collect(),
    }
}
