//! Integration tests for bikeshare.

use std::io::Write;
use tempfile::NamedTempFile;

use bikeshare::{
    BikeshareError, CategoryField, Dashboard, DashboardConfig, FilterSpec, GroupKey, LabelTable,
    Loader, Metric, Reducer, Subset, WeatherCondition, Weekday, YearIndicator,
};

const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// A slice of the real daily table, spanning both years.
fn sample_days() -> String {
    let rows = [
        "1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985",
        "2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801",
        "3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349",
        "4,2011-01-04,1,0,1,0,2,1,1,0.2,0.212122,0.590435,0.160296,108,1454,1562",
        "5,2011-01-05,1,0,1,0,3,1,1,0.226957,0.22927,0.436957,0.1869,82,1518,1600",
        "305,2011-11-01,4,0,11,0,2,1,1,0.400833,0.410333,0.582083,0.0839,457,4120,4577",
        "336,2011-12-02,4,0,12,0,5,1,1,0.3125,0.305554,0.524583,0.220158,275,4428,4703",
        "367,2012-01-01,1,1,1,0,0,0,1,0.37,0.375621,0.6925,0.192167,686,1608,2294",
        "400,2012-02-03,1,1,2,0,5,1,1,0.313333,0.309346,0.526667,0.17849,271,4084,4355",
        "469,2012-04-12,2,1,4,0,4,1,2,0.5025,0.487,0.60375,0.253,700,4788,5488",
        "505,2012-05-18,2,1,5,0,5,1,3,0.531667,0.497,0.8025,0.21,228,2346,2574",
    ];
    let mut data = String::from(HEADER);
    for row in rows {
        data.push('\n');
        data.push_str(row);
    }
    data.push('\n');
    data
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_open_csv_file() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).expect("Load failed");

    let source = dashboard.source().expect("source metadata");
    assert_eq!(source.row_count, 11);
    assert_eq!(source.format, "csv");
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(source.columns.len(), 16);
    assert_eq!(dashboard.dataset().len(), 11);
}

#[test]
fn test_open_tsv_file() {
    let content = sample_days().replace(',', "\t");
    let file = create_test_file(&content);
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).expect("Load failed");

    assert_eq!(dashboard.source().unwrap().format, "tsv");
    assert_eq!(dashboard.dataset().len(), 11);
}

#[test]
fn test_explicit_delimiter() {
    let content = sample_days().replace(',', ";");
    let file = create_test_file(&content);
    let config = DashboardConfig::default().with_delimiter(';');
    let dashboard = Dashboard::open(file.path(), config).expect("Load failed");
    assert_eq!(dashboard.dataset().len(), 11);
}

#[test]
fn test_missing_source_fails_fast() {
    let err = Dashboard::open("/no/such/dir/main_data.csv", DashboardConfig::default())
        .err()
        .expect("expected an error");
    assert!(matches!(err, BikeshareError::MissingSource { .. }));
    assert!(err.to_string().contains("main_data.csv"));
}

#[test]
fn test_config_file_round_trip() {
    let config_file = create_test_file(r#"{"base_year": 2011, "preview_rows": 3}"#);
    let config = DashboardConfig::load(config_file.path()).expect("config");
    assert_eq!(config.preview_rows, 3);

    let data = create_test_file(&sample_days());
    let dashboard = Dashboard::open(data.path(), config).unwrap();
    assert_eq!(dashboard.preview().len(), 3);
    assert_eq!(dashboard.preview()[0].total, 985);
}

#[test]
fn test_hourly_table_preview() {
    let mut hourly = String::from(
        "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,casual,registered,cnt",
    );
    for hr in 0..8 {
        hourly.push_str(&format!("\n{},2011-01-01,1,0,1,{},0,6,0,1,3,13,16", hr + 1, hr));
    }
    let hourly_file = create_test_file(&hourly);
    let data = create_test_file(&sample_days());

    let config = DashboardConfig::default().with_hourly_source(hourly_file.path());
    let dashboard = Dashboard::open(data.path(), config).unwrap();

    let preview = dashboard.hourly_preview().expect("hourly preview");
    assert_eq!(preview.rows.len(), 5);
    assert_eq!(preview.total_rows, 8);
    assert!(preview.headers.iter().any(|h| h == "hr"));
    assert_eq!(preview.rows[4][5], "4");

    let without = Dashboard::open(data.path(), DashboardConfig::default()).unwrap();
    assert!(without.hourly_preview().is_none());
}

#[test]
fn test_missing_hourly_table_fails_fast() {
    let data = create_test_file(&sample_days());
    let config = DashboardConfig::default().with_hourly_source("/no/such/dir/hour_cleaned.csv");
    let err = Dashboard::open(data.path(), config).err().expect("expected an error");
    assert!(matches!(err, BikeshareError::MissingSource { .. }));
}

#[test]
fn test_bad_config_file() {
    let config_file = create_test_file(r#"{"season_order": ["fall"]}"#);
    assert!(matches!(
        DashboardConfig::load(config_file.path()),
        Err(BikeshareError::Config(_))
    ));

    let config_file = create_test_file("not json");
    assert!(matches!(
        DashboardConfig::load(config_file.path()),
        Err(BikeshareError::Json(_))
    ));
}

// =============================================================================
// Aggregation Scenarios
// =============================================================================

#[test]
fn test_three_record_scenario() {
    let content = format!(
        "{HEADER}\n\
         1,2011-01-03,1,0,1,0,1,1,1,0.2,0.2,0.5,0.1,10,90,100\n\
         2,2011-01-04,1,0,1,0,2,1,1,0.2,0.2,0.5,0.1,5,45,50\n\
         3,2011-01-05,1,0,1,0,3,1,2,0.2,0.2,0.5,0.1,0,20,20\n"
    );
    let dataset = Loader::new().load_bytes(content.as_bytes()).unwrap();
    let dashboard = Dashboard::new(dataset).unwrap();
    let spec = FilterSpec::new();

    let sums = dashboard
        .breakdown(&spec, CategoryField::Weather, &[Metric::Total], Reducer::Sum)
        .unwrap();
    assert_eq!(sums.len(), 2);
    assert_eq!(sums.value(&GroupKey::Weather(WeatherCondition::Clear), Metric::Total), Some(150.0));
    assert_eq!(sums.value(&GroupKey::Weather(WeatherCondition::Mist), Metric::Total), Some(20.0));

    let means = dashboard
        .breakdown(&spec, CategoryField::Weather, &[Metric::Total], Reducer::Mean)
        .unwrap();
    assert_eq!(means.value(&GroupKey::Weather(WeatherCondition::Clear), Metric::Total), Some(75.0));
    assert_eq!(means.value(&GroupKey::Weather(WeatherCondition::Mist), Metric::Total), Some(20.0));
}

#[test]
fn test_filter_by_weather_yields_single_key() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let spec = FilterSpec::new().with_weather(WeatherCondition::Mist);

    let result = dashboard
        .breakdown(&spec, CategoryField::Weather, &Metric::ALL, Reducer::Sum)
        .unwrap();
    let keys: Vec<GroupKey> = result.keys().copied().collect();
    assert_eq!(keys, vec![GroupKey::Weather(WeatherCondition::Mist)]);
    assert_eq!(result.rows[0].records, 3);
    assert_eq!(result.rows[0].value(Metric::Total), Some(985.0 + 801.0 + 5488.0));
}

#[test]
fn test_absent_weather_gives_empty_result() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let spec = dashboard.parse_filter(Some("4"), None).unwrap();

    let result = dashboard
        .breakdown(&spec, CategoryField::Weather, &[Metric::Total], Reducer::Mean)
        .unwrap();
    assert!(result.is_empty());

    let report = dashboard.report(&spec).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_trend_spans_year_boundary_in_order() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();

    let trend = dashboard
        .trend(&FilterSpec::new(), &[Metric::Total], Reducer::Sum)
        .unwrap();
    let periods: Vec<String> = trend
        .keys()
        .map(|k| match k {
            GroupKey::Period(p) => p.to_string(),
            other => panic!("unexpected key {other:?}"),
        })
        .collect();

    assert_eq!(
        periods,
        vec!["2011-01", "2011-11", "2011-12", "2012-01", "2012-02", "2012-04", "2012-05"]
    );
    assert_eq!(trend.rows[0].records, 5);
    assert_eq!(
        trend.rows[0].value(Metric::Total),
        Some(985.0 + 801.0 + 1349.0 + 1562.0 + 1600.0)
    );
}

#[test]
fn test_year_filter_by_calendar_year() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let spec = dashboard.parse_filter(None, Some("2012")).unwrap();
    assert_eq!(spec.year, Some(YearIndicator::Second));

    let subset = dashboard.select(&spec);
    assert_eq!(subset.len(), 4);
    assert!(subset.iter().all(|r| r.year == YearIndicator::Second));
}

#[test]
fn test_unknown_filter_values_are_rejected() {
    let labels = LabelTable::new(2011);
    assert!(matches!(
        labels.parse_filter(Some("Badai"), None),
        Err(BikeshareError::InvalidFilterValue { .. })
    ));
    assert!(matches!(
        labels.parse_filter(None, Some("2010")),
        Err(BikeshareError::InvalidFilterValue { .. })
    ));
}

// =============================================================================
// Dashboard Report Tests
// =============================================================================

#[test]
fn test_full_report() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let report = dashboard.report(&FilterSpec::new()).unwrap();

    assert_eq!(report.records, 11);
    assert_eq!(report.weather_totals.len(), 3);
    assert_eq!(report.weather_means.len(), 3);

    let clear = report
        .weather_means
        .get(&GroupKey::Weather(WeatherCondition::Clear))
        .unwrap();
    assert_eq!(clear.records, 7);
    let clear_sum = 1349.0 + 1562.0 + 1600.0 + 4577.0 + 4703.0 + 2294.0 + 4355.0;
    assert!((clear.value(Metric::Total).unwrap() - clear_sum / 7.0).abs() < 1e-9);

    let working: Vec<&str> = report
        .working_day_means
        .iter()
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(working, vec!["Working Day", "Weekend"]);
    assert_eq!(report.working_day_means[1].records, 3);

    let days: Vec<Weekday> = report
        .weekday_means
        .iter()
        .map(|a| match a.key {
            GroupKey::Weekday(d) => d,
            other => panic!("unexpected key {other:?}"),
        })
        .collect();
    assert_eq!(days, Weekday::MONDAY_FIRST.to_vec());

    // A single Thursday at 5488 beats Friday's (4703 + 4355 + 2574) / 3.
    let busiest = report.busiest_weekday.expect("busiest weekday");
    assert_eq!(busiest.weekday, Weekday::Thursday);
    assert_eq!(busiest.label, "Thursday");
    assert_eq!(busiest.mean_total, 5488.0);
}

#[test]
fn test_report_serializes_to_json() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let spec = dashboard.parse_filter(Some("2"), None).unwrap();
    let report = dashboard.report(&spec).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["records"], 3);
    assert_eq!(json["filter"]["weather"], "mist");
    assert_eq!(json["weather_totals"]["rows"][0]["key"]["field"], "weather");
    assert_eq!(json["monthly_trend"]["grouping"]["kind"], "period");
}

#[test]
fn test_subset_does_not_mutate_dataset() {
    let file = create_test_file(&sample_days());
    let dashboard = Dashboard::open(file.path(), DashboardConfig::default()).unwrap();
    let before = dashboard.dataset().clone();

    let _ = dashboard.report(&FilterSpec::new().with_weather(WeatherCondition::Clear));
    let all = Subset::all(dashboard.dataset());

    assert_eq!(dashboard.dataset(), &before);
    assert_eq!(all.len(), before.len());
}
