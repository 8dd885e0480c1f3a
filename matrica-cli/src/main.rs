//! Matrica - console matrix calculator
//!
//! Reads a menu choice, prompts for the operands, prints the operands and
//! the result as bordered grids, and repeats until `0` or end of input.
//!
//! Environment:
//! - `MATRICA_LOG`: log filter, written to stderr (default `warn`)
//! - `MATRICA_MAX_LINE`: longest accepted input line in bytes (default 500)

mod config;
mod console;
mod session;

use std::io;
use std::process;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;
use config::{Config, DEFAULT_LOG_FILTER};
use console::Console;
use session::Session;

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout belongs to the calculator
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let config = Config::from_env();
    init_logging(&config.log_filter);
    info!(max_line = config.max_line, "matrica starting");

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout(), config.max_line);
    let mut session = Session::new(console);

    if let Err(aborted) = session.run() {
        error!(
            operation = ?aborted.operation,
            code = %aborted.error.code,
            "{}", aborted
        );
        process::exit(aborted.exit_code());
    }
}
