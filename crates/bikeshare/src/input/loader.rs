//! Delimited-text loader for the daily rental table.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{BikeshareError, Result};
use crate::model::{Dataset, Record, Season, WeatherCondition, Weekday, YearIndicator};

use super::preview::TablePreview;
use super::source::SourceMetadata;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Columns the loader needs; anything else in the file is ignored.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "dteday",
    "yr",
    "mnth",
    "weekday",
    "season",
    "weathersit",
    "workingday",
    "casual",
    "registered",
    "cnt",
];

/// Loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    /// Maximum records to read (None = all).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
}

/// One row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    dteday: String,
    yr: i64,
    mnth: i64,
    weekday: i64,
    season: i64,
    weathersit: i64,
    workingday: i64,
    casual: i64,
    registered: i64,
    cnt: i64,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<Record> {
        let parse_err = |column: &str, message: String| BikeshareError::Parse {
            row,
            column: column.to_string(),
            message,
        };

        let date = parse_date(&self.dteday)
            .ok_or_else(|| parse_err("dteday", format!("'{}' is not a date", self.dteday)))?;
        let year = YearIndicator::from_code(self.yr)
            .ok_or_else(|| parse_err("yr", format!("unknown year indicator {}", self.yr)))?;
        let month = u8::try_from(self.mnth)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| parse_err("mnth", format!("month {} is outside 1-12", self.mnth)))?;
        let weekday = Weekday::from_code(self.weekday)
            .ok_or_else(|| parse_err("weekday", format!("unknown weekday {}", self.weekday)))?;
        let season = Season::from_code(self.season)
            .ok_or_else(|| parse_err("season", format!("unknown season {}", self.season)))?;
        let weather = WeatherCondition::from_code(self.weathersit).ok_or_else(|| {
            parse_err(
                "weathersit",
                format!("unknown weather condition {}", self.weathersit),
            )
        })?;
        let working_day = match self.workingday {
            0 => false,
            1 => true,
            other => return Err(parse_err("workingday", format!("flag {} is not 0 or 1", other))),
        };

        let count = |column: &str, value: i64| {
            u32::try_from(value)
                .map_err(|_| parse_err(column, format!("{} is not a non-negative count", value)))
        };

        Ok(Record {
            date,
            year,
            month,
            weekday,
            season,
            weather,
            working_day,
            casual: count("casual", self.casual)?,
            registered: count("registered", self.registered)?,
            total: count("cnt", self.cnt)?,
        })
    }
}

/// Loads rental records from delimited text.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the dataset and its metadata.
    ///
    /// A missing file is reported as [`BikeshareError::MissingSource`].
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = read_source(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = self.delimiter_for(&contents)?;
        let (dataset, columns) = self.parse_bytes(&contents, delimiter)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            SourceMetadata::format_for(delimiter).to_string(),
            columns,
            dataset.len(),
        );

        debug!(
            file = %metadata.file,
            rows = metadata.row_count,
            format = %metadata.format,
            "loaded dataset"
        );

        Ok((dataset, metadata))
    }

    /// Load records from in-memory bytes.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let delimiter = self.delimiter_for(bytes)?;
        self.parse_bytes(bytes, delimiter).map(|(dataset, _)| dataset)
    }

    /// Read the first `rows` data rows of any delimited file as text.
    ///
    /// Columns are not checked, so this works for tables other than the
    /// daily dataset.
    pub fn preview_file(&self, path: impl AsRef<Path>, rows: usize) -> Result<TablePreview> {
        let path = path.as_ref();
        let contents = read_source(path)?;
        let mut preview = self.preview_bytes(&contents, rows)?;
        preview.file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(file = %preview.file, rows = preview.total_rows, "previewed table");
        Ok(preview)
    }

    /// Text preview of in-memory delimited data.
    pub fn preview_bytes(&self, bytes: &[u8], rows: usize) -> Result<TablePreview> {
        let delimiter = self.delimiter_for(bytes)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut kept = Vec::with_capacity(rows);
        let mut total_rows = 0;
        for result in reader.records() {
            let record = result?;
            if kept.len() < rows {
                kept.push(record.iter().map(str::to_string).collect());
            }
            total_rows += 1;
        }

        Ok(TablePreview {
            file: String::new(),
            headers,
            rows: kept,
            total_rows,
        })
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(c) if c.is_ascii() => Ok(c as u8),
            Some(c) => Err(BikeshareError::Config(format!(
                "delimiter '{}' is not a single-byte character",
                c
            ))),
            None => detect_delimiter(bytes),
        }
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<(Dataset, Vec<String>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(BikeshareError::Parse {
                    row: 0,
                    column: required.to_string(),
                    message: "missing required column".to_string(),
                });
            }
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.deserialize::<RawRow>().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    warn!(max_rows = max, "row limit reached, remaining rows ignored");
                    break;
                }
            }

            let row = row_idx + 1;
            let raw = result.map_err(|e| deserialize_error(e, &headers, row))?;
            records.push(raw.into_record(row)?);
        }

        if records.is_empty() {
            return Err(BikeshareError::EmptyData("No data rows found".to_string()));
        }

        let dataset = Dataset::new(records)?;
        debug!(years = ?dataset.years(), records = dataset.len(), "parsed records");

        Ok((dataset, columns))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole file, reporting a missing file as `MissingSource`.
fn read_source(path: &Path) -> Result<Vec<u8>> {
    let io_err = |e: std::io::Error| BikeshareError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BikeshareError::MissingSource {
            path: path.to_path_buf(),
        },
        _ => io_err(e),
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(io_err)?;
    Ok(contents)
}

/// Turn a serde failure into a row/column parse error where possible.
fn deserialize_error(err: csv::Error, headers: &csv::StringRecord, row: usize) -> BikeshareError {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        let column = de
            .field()
            .and_then(|i| headers.get(i as usize))
            .unwrap_or("?")
            .to_string();
        return BikeshareError::Parse {
            row,
            column,
            message: de.kind().to_string(),
        };
    }
    err.into()
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(BikeshareError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Same count on every line beats a higher but ragged count
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + usize::from(delim == b'\t') * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
