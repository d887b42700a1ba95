//! Display labels for categorical codes.
//!
//! Labels belong to the presentation side: the engine only ever emits codes.
//! A [`LabelTable`] is built once at start-up and checked with
//! [`LabelTable::validate`] so that every code the engine can produce has a
//! label and no label points at a code the engine never produces.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::aggregate::{FilterSpec, GroupKey};
use crate::error::{BikeshareError, Result};
use crate::model::{Season, WeatherCondition, Weekday, YearIndicator};

/// Field a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelField {
    Weather,
    Season,
    Weekday,
    WorkingDay,
}

impl LabelField {
    pub const ALL: [LabelField; 4] = [
        LabelField::Weather,
        LabelField::Season,
        LabelField::Weekday,
        LabelField::WorkingDay,
    ];

    /// Codes the engine can emit for this field.
    pub fn codes(self) -> Vec<i64> {
        match self {
            LabelField::Weather => WeatherCondition::ALL.iter().map(|w| w.code().into()).collect(),
            LabelField::Season => Season::ALL.iter().map(|s| s.code().into()).collect(),
            LabelField::Weekday => Weekday::ALL.iter().map(|d| d.code().into()).collect(),
            LabelField::WorkingDay => vec![0, 1],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LabelField::Weather => "weather",
            LabelField::Season => "season",
            LabelField::Weekday => "weekday",
            LabelField::WorkingDay => "working-day",
        }
    }
}

const WEATHER_LABELS: &[(i64, &str)] = &[
    (1, "Cerah/Sedikit Berawan"),
    (2, "Berkabut/Berawan"),
    (3, "Salju Ringan/Hujan Ringan"),
    (4, "Hujan Lebat/Salju Lebat (Tidak ada data di weathersit 4 untuk day_df)"),
];

/// Extra names accepted when parsing weather selections.
const WEATHER_ALIASES: &[(i64, &str)] = &[(4, "Hujan Lebat/Salju Lebat")];

const SEASON_LABELS: &[(i64, &str)] = &[(1, "Winter"), (2, "Summer"), (3, "Fall"), (4, "Spring")];

const WEEKDAY_LABELS: &[(i64, &str)] = &[
    (0, "Sunday"),
    (1, "Monday"),
    (2, "Tuesday"),
    (3, "Wednesday"),
    (4, "Thursday"),
    (5, "Friday"),
    (6, "Saturday"),
];

const WORKING_DAY_LABELS: &[(i64, &str)] = &[(0, "Weekend"), (1, "Working Day")];

/// Built-in labels, shared by every default table.
static DEFAULT_ENTRIES: Lazy<IndexMap<LabelField, IndexMap<i64, String>>> = Lazy::new(|| {
    let table = |pairs: &[(i64, &str)]| -> IndexMap<i64, String> {
        pairs.iter().map(|(code, label)| (*code, label.to_string())).collect()
    };
    let mut entries = IndexMap::new();
    entries.insert(LabelField::Weather, table(WEATHER_LABELS));
    entries.insert(LabelField::Season, table(SEASON_LABELS));
    entries.insert(LabelField::Weekday, table(WEEKDAY_LABELS));
    entries.insert(LabelField::WorkingDay, table(WORKING_DAY_LABELS));
    entries
});

/// Code-to-label lookup for every categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    /// Calendar year shown for year indicator 0.
    pub base_year: i32,
    entries: IndexMap<LabelField, IndexMap<i64, String>>,
}

impl LabelTable {
    /// Built-in labels with the given base year.
    pub fn new(base_year: i32) -> Self {
        Self {
            base_year,
            entries: DEFAULT_ENTRIES.clone(),
        }
    }

    /// Replace or add a single label.
    pub fn with_label(mut self, field: LabelField, code: i64, label: impl Into<String>) -> Self {
        self.entries.entry(field).or_default().insert(code, label.into());
        self
    }

    /// Apply a set of overrides on top of the current labels.
    pub fn with_overrides(mut self, overrides: &IndexMap<LabelField, IndexMap<i64, String>>) -> Self {
        for (field, labels) in overrides {
            let target = self.entries.entry(*field).or_default();
            for (code, label) in labels {
                target.insert(*code, label.clone());
            }
        }
        self
    }

    /// Remove a label.
    pub fn without_label(mut self, field: LabelField, code: i64) -> Self {
        if let Some(labels) = self.entries.get_mut(&field) {
            labels.shift_remove(&code);
        }
        self
    }

    /// Check the table against the codes the engine can emit.
    pub fn validate(&self) -> Result<()> {
        for field in LabelField::ALL {
            let codes = field.codes();
            let labels = self.entries.get(&field);

            for code in &codes {
                let present = labels
                    .and_then(|l| l.get(code))
                    .is_some_and(|label| !label.trim().is_empty());
                if !present {
                    return Err(BikeshareError::MissingLabel {
                        field: field.name().to_string(),
                        code: *code,
                    });
                }
            }

            if let Some(labels) = labels {
                if let Some(stray) = labels.keys().find(|code| !codes.contains(*code)) {
                    return Err(BikeshareError::Config(format!(
                        "label table has a {} label for unknown code {}",
                        field.name(),
                        stray
                    )));
                }
            }
        }
        Ok(())
    }

    /// Label for a code, if any.
    pub fn label(&self, field: LabelField, code: i64) -> Option<&str> {
        self.entries
            .get(&field)
            .and_then(|labels| labels.get(&code))
            .map(|s| s.as_str())
    }

    /// All labels for a field in table order.
    pub fn labels(&self, field: LabelField) -> Vec<(i64, &str)> {
        self.entries
            .get(&field)
            .map(|labels| labels.iter().map(|(c, l)| (*c, l.as_str())).collect())
            .unwrap_or_default()
    }

    /// Code whose label matches `label`, ignoring case.
    pub fn code_for(&self, field: LabelField, label: &str) -> Option<i64> {
        let wanted = label.trim();
        self.entries.get(&field).and_then(|labels| {
            labels
                .iter()
                .find(|(_, l)| l.eq_ignore_ascii_case(wanted))
                .map(|(code, _)| *code)
        })
    }

    /// Display text for a group key; falls back to the raw code.
    pub fn key_label(&self, key: &GroupKey) -> String {
        let coded = |field: LabelField, code: i64| {
            self.label(field, code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string())
        };
        match key {
            GroupKey::Weather(w) => coded(LabelField::Weather, w.code().into()),
            GroupKey::Season(s) => coded(LabelField::Season, s.code().into()),
            GroupKey::Weekday(d) => coded(LabelField::Weekday, d.code().into()),
            GroupKey::WorkingDay(flag) => coded(LabelField::WorkingDay, i64::from(*flag)),
            GroupKey::Year(y) => self.year_label(*y),
            GroupKey::Month(m) => month_name(*m),
            GroupKey::Period(p) => p.to_string(),
        }
    }

    pub fn year_label(&self, year: YearIndicator) -> String {
        year.absolute(self.base_year).to_string()
    }

    /// Resolve user input (a code or a label) to a weather condition.
    pub fn parse_weather(&self, raw: &str) -> Result<WeatherCondition> {
        let trimmed = raw.trim();
        let code = trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| self.code_for(LabelField::Weather, trimmed))
            .or_else(|| {
                WEATHER_ALIASES
                    .iter()
                    .find(|(_, alias)| alias.eq_ignore_ascii_case(trimmed))
                    .map(|(code, _)| *code)
            });
        code.and_then(WeatherCondition::from_code)
            .ok_or_else(|| BikeshareError::invalid_filter("weather", raw))
    }

    /// Build a filter from raw selector values. `None`, blank, `all` and
    /// `semua` leave a field unconstrained.
    pub fn parse_filter(&self, weather: Option<&str>, year: Option<&str>) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        if let Some(raw) = weather.filter(|v| !is_wildcard(v)) {
            spec = spec.with_weather(self.parse_weather(raw)?);
        }
        if let Some(raw) = year.filter(|v| !is_wildcard(v)) {
            spec = spec.with_year(self.parse_year(raw)?);
        }
        Ok(spec)
    }

    /// Resolve user input to a year indicator. Accepts the indicator itself
    /// (`0`/`1`) or a calendar year inside the dataset window.
    pub fn parse_year(&self, raw: &str) -> Result<YearIndicator> {
        let value = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| BikeshareError::invalid_filter("year", raw))?;
        YearIndicator::from_code(i64::from(value))
            .or_else(|| YearIndicator::from_absolute(value, self.base_year))
            .ok_or_else(|| BikeshareError::invalid_filter("year", raw))
    }
}

fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("semua")
}

/// English month name for 1-12.
pub fn month_name(month: u8) -> String {
    chrono::Month::try_from(month)
        .map(|m| m.name().to_string())
        .unwrap_or_else(|_| month.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::YearMonth;

    #[test]
    fn test_default_table_is_valid() {
        LabelTable::new(2011).validate().unwrap();
    }

    #[test]
    fn test_labels_match_dashboards() {
        let labels = LabelTable::new(2011);
        assert_eq!(labels.label(LabelField::Weather, 1), Some("Cerah/Sedikit Berawan"));
        assert_eq!(labels.label(LabelField::Season, 1), Some("Winter"));
        assert_eq!(labels.label(LabelField::Season, 3), Some("Fall"));
        assert_eq!(labels.label(LabelField::Weekday, 0), Some("Sunday"));
        assert_eq!(labels.label(LabelField::WorkingDay, 1), Some("Working Day"));
        assert_eq!(labels.label(LabelField::Weather, 5), None);
    }

    #[test]
    fn test_missing_label_fails_validation() {
        let labels = LabelTable::new(2011).without_label(LabelField::Weather, 4);
        let err = labels.validate().unwrap_err();
        assert!(matches!(err, BikeshareError::MissingLabel { code: 4, .. }));
    }

    #[test]
    fn test_stray_label_fails_validation() {
        let labels = LabelTable::new(2011).with_label(LabelField::Weekday, 7, "Someday");
        assert!(matches!(labels.validate(), Err(BikeshareError::Config(_))));
    }

    #[test]
    fn test_blank_label_fails_validation() {
        let labels = LabelTable::new(2011).with_label(LabelField::Season, 2, "  ");
        assert!(labels.validate().is_err());
    }

    #[test]
    fn test_parse_weather_by_code_or_label() {
        let labels = LabelTable::new(2011);
        assert_eq!(labels.parse_weather("2").unwrap(), WeatherCondition::Mist);
        assert_eq!(
            labels.parse_weather("berkabut/berawan").unwrap(),
            WeatherCondition::Mist
        );
        assert!(matches!(
            labels.parse_weather("5"),
            Err(BikeshareError::InvalidFilterValue { .. })
        ));
        assert!(labels.parse_weather("Sunny").is_err());
    }

    #[test]
    fn test_heavy_weather_label_round_trips() {
        let labels = LabelTable::new(2011);
        let full = "Hujan Lebat/Salju Lebat (Tidak ada data di weathersit 4 untuk day_df)";
        assert_eq!(labels.label(LabelField::Weather, 4), Some(full));
        assert_eq!(
            labels.parse_weather(full).unwrap(),
            WeatherCondition::HeavyPrecipitation
        );
        assert_eq!(
            labels.parse_weather("Hujan Lebat/Salju Lebat").unwrap(),
            WeatherCondition::HeavyPrecipitation
        );
        assert_eq!(
            labels.key_label(&GroupKey::Weather(WeatherCondition::HeavyPrecipitation)),
            full
        );
    }

    #[test]
    fn test_parse_year() {
        let labels = LabelTable::new(2011);
        assert_eq!(labels.parse_year("0").unwrap(), YearIndicator::First);
        assert_eq!(labels.parse_year("2012").unwrap(), YearIndicator::Second);
        assert!(labels.parse_year("2013").is_err());
        assert!(labels.parse_year("next").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let labels = LabelTable::new(2011);
        assert!(labels.parse_filter(None, Some("Semua")).unwrap().is_unconstrained());

        let spec = labels.parse_filter(Some("3"), Some("2011")).unwrap();
        assert_eq!(spec.weather, Some(WeatherCondition::LightPrecipitation));
        assert_eq!(spec.year, Some(YearIndicator::First));

        let err = labels.parse_filter(Some("9"), None).unwrap_err();
        assert!(matches!(
            err,
            BikeshareError::InvalidFilterValue { ref field, ref value } if field == "weather" && value == "9"
        ));
    }

    #[test]
    fn test_key_labels() {
        let labels = LabelTable::new(2011);
        assert_eq!(labels.key_label(&GroupKey::WorkingDay(false)), "Weekend");
        assert_eq!(labels.key_label(&GroupKey::Year(YearIndicator::Second)), "2012");
        assert_eq!(labels.key_label(&GroupKey::Month(3)), "March");
        let period = YearMonth::new(YearIndicator::First, 11, 2011);
        assert_eq!(labels.key_label(&GroupKey::Period(period)), "2011-11");
    }

    #[test]
    fn test_overrides_replace_labels() {
        let mut season = IndexMap::new();
        season.insert(1, "Spring".to_string());
        let mut overrides = IndexMap::new();
        overrides.insert(LabelField::Season, season);

        let labels = LabelTable::new(2011).with_overrides(&overrides);
        assert_eq!(labels.label(LabelField::Season, 1), Some("Spring"));
        assert_eq!(labels.label(LabelField::Season, 2), Some("Summer"));
    }
}
