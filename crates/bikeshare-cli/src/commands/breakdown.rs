//! Breakdown command - group by any categorical field.

use std::path::PathBuf;

use bikeshare::{CategoryField, Metric, Reducer};
use colored::Colorize;

use super::{
    describe_filter, open_dashboard, print_axis, print_empty_state, resolve_filter, CommandResult,
    Options,
};
use crate::cli::FilterArgs;

pub fn run(
    file: PathBuf,
    by: CategoryField,
    filter: FilterArgs,
    metrics: Vec<Metric>,
    reducer: Reducer,
    json_output: bool,
    options: &Options,
) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let spec = resolve_filter(&dashboard, &filter)?;
    let result = dashboard.breakdown(&spec, by, &metrics, reducer)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Rentals by".cyan().bold(),
        by.to_string().cyan().bold(),
        reducer.to_string().white()
    );
    println!("  {}", describe_filter(&dashboard, &spec).dimmed());
    println!();

    if result.is_empty() {
        print_empty_state();
        return Ok(());
    }

    for metric in &result.metrics {
        let values = dashboard.on_axis(&result, by, *metric);
        print_axis(&format!("{}:", metric), &values);
    }

    Ok(())
}
