//! Summary command - every dashboard panel for one selection.

use std::path::PathBuf;

use bikeshare::{GroupKey, Metric};
use colored::Colorize;

use super::{
    describe_filter, open_dashboard, print_axis, print_empty_state, resolve_filter, CommandResult,
    Options,
};
use crate::cli::FilterArgs;

pub fn run(file: PathBuf, filter: FilterArgs, json_output: bool, options: &Options) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let spec = resolve_filter(&dashboard, &filter)?;
    let report = dashboard.report(&spec)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Bike rental summary for".cyan().bold(),
        file.display().to_string().white()
    );
    println!("  {}", describe_filter(&dashboard, &spec).dimmed());
    println!(
        "  Records: {} of {}",
        report.records.to_string().white().bold(),
        dashboard.dataset().len()
    );
    println!();

    if report.is_empty() {
        print_empty_state();
        return Ok(());
    }

    println!("{}", "Weather impact (mean per day):".yellow().bold());
    for row in &report.weather_means.rows {
        println!(
            "  {:<28} total {:>8.1}  casual {:>8.1}  registered {:>8.1}",
            dashboard.labels().key_label(&row.key),
            row.value(Metric::Total).unwrap_or_default(),
            row.value(Metric::Casual).unwrap_or_default(),
            row.value(Metric::Registered).unwrap_or_default()
        );
    }
    println!();

    println!("{}", "Monthly trend (total rentals):".yellow().bold());
    for row in &report.monthly_trend.rows {
        if let GroupKey::Period(period) = row.key {
            println!(
                "  {}  {:>10}",
                period,
                row.value(Metric::Total).unwrap_or_default()
            );
        }
    }
    println!();

    print_axis("Season (mean total):", &report.season_means);
    print_axis("Working day vs weekend (mean total):", &report.working_day_means);
    print_axis("Weekday (mean total):", &report.weekday_means);

    if let Some(busiest) = &report.busiest_weekday {
        println!(
            "Busiest day: {} ({:.1} rentals on average)",
            busiest.label.green().bold(),
            busiest.mean_total
        );
    }

    Ok(())
}
