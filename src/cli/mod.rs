mod args;
mod handlers;

pub use args::Cli;
pub use handlers::{EXIT_CANCELLED, report_error, run_grid_overview};
