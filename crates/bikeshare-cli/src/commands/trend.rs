//! Trend command - monthly rentals in chronological order.

use std::path::PathBuf;

use bikeshare::{GroupKey, Metric, Reducer};
use colored::Colorize;

use super::{bar, describe_filter, open_dashboard, print_empty_state, resolve_filter, CommandResult, Options};
use crate::cli::FilterArgs;

pub fn run(
    file: PathBuf,
    filter: FilterArgs,
    metrics: Vec<Metric>,
    reducer: Reducer,
    json_output: bool,
    options: &Options,
) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let spec = resolve_filter(&dashboard, &filter)?;
    let result = dashboard.trend(&spec, &metrics, reducer)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} ({})",
        "Monthly trend".cyan().bold(),
        reducer.to_string().white()
    );
    println!("  {}", describe_filter(&dashboard, &spec).dimmed());
    println!();

    if result.is_empty() {
        print_empty_state();
        return Ok(());
    }

    // Bars follow the first requested metric.
    let lead = result.metrics.first().copied().unwrap_or(Metric::Total);
    let max = result
        .rows
        .iter()
        .filter_map(|r| r.value(lead))
        .fold(0.0_f64, f64::max);

    let header: Vec<String> = result.metrics.iter().map(|m| format!("{:>12}", m)).collect();
    println!("  {:<7}  {}", "month".dimmed(), header.join(" ").dimmed());

    for row in &result.rows {
        let GroupKey::Period(period) = row.key else {
            continue;
        };
        let cells: Vec<String> = result
            .metrics
            .iter()
            .map(|m| format!("{:>12.1}", row.value(*m).unwrap_or_default()))
            .collect();
        println!(
            "  {}  {}  {}",
            period,
            cells.join(" "),
            bar(row.value(lead).unwrap_or_default(), max, 24).cyan()
        );
    }

    Ok(())
}
