use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use video_grid_overview::cli::{Cli, report_error, run_grid_overview};
use video_grid_overview::init;
use video_grid_overview::signal::setup_shutdown_signal;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(report_error(&e)),
    }
}

fn run(cli: Cli) -> Result<()> {
    let shutdown_signal = setup_shutdown_signal()?;
    run_grid_overview(cli, &shutdown_signal)
}
