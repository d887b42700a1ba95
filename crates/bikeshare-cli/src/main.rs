//! Bikeshare CLI - explore daily bike-rental usage from the terminal or over HTTP.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = commands::Options {
        config: cli.config,
        base_year: cli.base_year,
        delimiter: cli.delimiter,
        hourly: cli.hourly,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Summary { file, filter, json } => {
            commands::summary::run(file, filter, json, &options)
        }

        Commands::Weather {
            file,
            filter,
            reducer,
            json,
        } => commands::weather::run(file, filter, reducer, json, &options),

        Commands::Trend {
            file,
            filter,
            metrics,
            reducer,
            json,
        } => commands::trend::run(file, filter, metrics, reducer, json, &options),

        Commands::Breakdown {
            file,
            by,
            filter,
            metrics,
            reducer,
            json,
        } => commands::breakdown::run(file, by, filter, metrics, reducer, json, &options),

        Commands::Preview { file, rows, json } => {
            commands::preview::run(file, rows, json, &options)
        }

        Commands::Serve { file, port } => commands::serve::run(file, port, &options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
