//! Preview command - first records of the data file.

use std::path::PathBuf;

use bikeshare::GroupKey;
use colored::Colorize;

use super::{open_dashboard, CommandResult, Options};

pub fn run(file: PathBuf, rows: Option<usize>, json_output: bool, options: &Options) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let records = match rows {
        Some(n) => dashboard.dataset().head(n),
        None => dashboard.preview(),
    };

    if json_output {
        let output = match dashboard.hourly_preview() {
            Some(hourly) => serde_json::json!({ "records": records, "hourly": hourly }),
            None => serde_json::to_value(records)?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} of {} records)",
        "Preview of".cyan().bold(),
        file.display().to_string().white(),
        records.len(),
        dashboard.dataset().len()
    );
    println!();
    println!(
        "  {:<10}  {:>4}  {:>2}  {:<9}  {:<7}  {:>2}  {:>7}  {:>6}  {:>10}  {:>6}",
        "date", "year", "mo", "weekday", "season", "wx", "working", "casual", "registered", "total"
    );

    let labels = dashboard.labels();
    for record in records {
        println!(
            "  {:<10}  {:>4}  {:>2}  {:<9}  {:<7}  {:>2}  {:>7}  {:>6}  {:>10}  {:>6}",
            record.date.to_string(),
            labels.year_label(record.year),
            record.month,
            labels.key_label(&GroupKey::Weekday(record.weekday)),
            labels.key_label(&GroupKey::Season(record.season)),
            record.weather.code(),
            if record.working_day { "yes" } else { "no" },
            record.casual,
            record.registered,
            record.total
        );
    }

    if let Some(hourly) = dashboard.hourly_preview() {
        println!();
        println!(
            "{} {} ({} of {} rows)",
            "Hourly table".cyan().bold(),
            hourly.file.white(),
            hourly.rows.len(),
            hourly.total_rows
        );
        println!();
        println!("  {}", hourly.headers.join("  ").dimmed());
        for row in &hourly.rows {
            println!("  {}", row.join("  "));
        }
    }

    Ok(())
}
