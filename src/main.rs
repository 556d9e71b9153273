//! fxpm CLI entry point.
//!
//! Parses arguments, wires up logging, runs the selected command, and
//! renders any failure as a single readable report. No error crosses this
//! boundary unrendered.

use clap::Parser;
use fxpm_cli::cli::Cli;
use fxpm_cli::core::display_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(error) = cli.execute().await {
        display_error(&error);
        std::process::exit(1);
    }
}
