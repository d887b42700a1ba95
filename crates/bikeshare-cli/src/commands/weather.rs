//! Weather command - rentals by weather condition.

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
    filter: FilterArgs,
    reducer: Reducer,
    json_output: bool,
    options: &Options,
) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let spec = resolve_filter(&dashboard, &filter)?;
    let result = dashboard.breakdown(&spec, CategoryField::Weather, &Metric::ALL, reducer)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} ({})",
        "Rentals by weather".cyan().bold(),
        reducer.to_string().white()
    );
    println!("  {}", describe_filter(&dashboard, &spec).dimmed());
    println!();

    if result.is_empty() {
        print_empty_state();
        return Ok(());
    }

    for metric in Metric::ALL {
        let values = dashboard.on_axis(&result, CategoryField::Weather, metric);
        print_axis(&format!("{}:", metric), &values);
    }

    Ok(())
}
