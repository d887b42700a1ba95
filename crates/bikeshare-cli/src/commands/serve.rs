//! Serve command - expose the dashboard as a JSON API.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use super::{open_dashboard, CommandResult, Options};
use crate::server::{app, state::AppState};

pub fn run(file: PathBuf, port: u16, options: &Options) -> CommandResult {
    let dashboard = open_dashboard(&file, options)?;
    let records = dashboard.dataset().len();
    let state = AppState::new(Arc::new(dashboard));

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting dashboard API at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  File:    {}", file.display());
    println!("  Records: {}", records);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            result = app::run_server(state, port) => result,
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", "Shutting down...".yellow());
                Ok(())
            }
        }
    })?;

    Ok(())
}
