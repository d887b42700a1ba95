//! Categorical field types for rental records.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ordinal weather severity at observation time (code 1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear, few clouds.
    Clear = 1,
    /// Mist, cloudy.
    Mist = 2,
    /// Light snow or light rain.
    LightPrecipitation = 3,
    /// Heavy rain, ice pellets or snow. Rare in daily data.
    HeavyPrecipitation = 4,
}

impl WeatherCondition {
    /// All conditions in severity order.
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Mist,
        WeatherCondition::LightPrecipitation,
        WeatherCondition::HeavyPrecipitation,
    ];

    /// Numeric code as stored in the dataset.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a condition by its dataset code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|w| i64::from(w.code()) == code)
    }
}

/// Season code (1-4) as labelled by the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter = 1,
    Summer = 2,
    Fall = 3,
    Spring = 4,
}

impl Season {
    /// All seasons in code order.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Summer, Season::Fall, Season::Spring];

    /// Default display order, busiest season first.
    pub const DISPLAY_ORDER: [Season; 4] =
        [Season::Fall, Season::Summer, Season::Spring, Season::Winter];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| i64::from(s.code()) == code)
    }
}

/// Day of the week, coded 0 (Sunday) to 6 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// All weekdays in code order (Sunday first).
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Canonical display order, Monday through Sunday.
    pub const MONDAY_FIRST: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| i64::from(d.code()) == code)
    }

    /// Day of the week a calendar date falls on.
    pub fn of_date(date: NaiveDate) -> Self {
        Self::ALL[date.weekday().num_days_from_sunday() as usize]
    }
}

/// Binary year marker: the first or second year covered by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearIndicator {
    First = 0,
    Second = 1,
}

impl YearIndicator {
    pub const ALL: [YearIndicator; 2] = [YearIndicator::First, YearIndicator::Second];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(YearIndicator::First),
            1 => Some(YearIndicator::Second),
            _ => None,
        }
    }

    /// Calendar year for this indicator given the dataset's base year.
    pub fn absolute(self, base_year: i32) -> i32 {
        base_year + i32::from(self.code())
    }

    /// Indicator for a calendar year, if it falls inside the two-year window.
    pub fn from_absolute(year: i32, base_year: i32) -> Option<Self> {
        Self::from_code(i64::from(year) - i64::from(base_year))
    }
}

/// Count fields that can be reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total rentals (`cnt`).
    Total,
    /// Casual rentals.
    Casual,
    /// Registered rentals.
    Registered,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Total, Metric::Casual, Metric::Registered];

    /// Column name in the source data.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Total => "cnt",
            Metric::Casual => "casual",
            Metric::Registered => "registered",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Total => write!(f, "total"),
            Metric::Casual => write!(f, "casual"),
            Metric::Registered => write!(f, "registered"),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" | "cnt" | "count" => Ok(Metric::Total),
            "casual" => Ok(Metric::Casual),
            "registered" => Ok(Metric::Registered),
            _ => Err(format!(
                "Unknown metric: {}. Use total, casual, or registered.",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_of_date() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(Weekday::of_date(day(2011, 1, 1)), Weekday::Saturday);
        assert_eq!(Weekday::of_date(day(2011, 1, 2)), Weekday::Sunday);
        assert_eq!(Weekday::of_date(day(2012, 4, 12)), Weekday::Thursday);
    }

    #[test]
    fn test_codes_round_trip() {
        for w in WeatherCondition::ALL {
            assert_eq!(WeatherCondition::from_code(w.code().into()), Some(w));
        }
        for d in Weekday::ALL {
            assert_eq!(Weekday::from_code(d.code().into()), Some(d));
        }
        assert_eq!(WeatherCondition::from_code(0), None);
        assert_eq!(WeatherCondition::from_code(5), None);
        assert_eq!(Season::from_code(3), Some(Season::Fall));
        assert_eq!(Weekday::from_code(7), None);
    }

    #[test]
    fn test_year_indicator_absolute() {
        assert_eq!(YearIndicator::First.absolute(2011), 2011);
        assert_eq!(YearIndicator::Second.absolute(2011), 2012);
        assert_eq!(
            YearIndicator::from_absolute(2012, 2011),
            Some(YearIndicator::Second)
        );
        assert_eq!(YearIndicator::from_absolute(2013, 2011), None);
        assert_eq!(YearIndicator::from_absolute(2010, 2011), None);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("cnt".parse::<Metric>().unwrap(), Metric::Total);
        assert_eq!("Casual".parse::<Metric>().unwrap(), Metric::Casual);
        assert!("humidity".parse::<Metric>().is_err());
    }
}
