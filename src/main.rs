//! peerconf: per-address agent connection parameters.
//!
//! Entry point for the peerconf binary.

use std::process::ExitCode;

use peerconf::cli::Cli;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    match run::execute(&cli) {
        Ok(output) => {
            print!("{output}");
            exit_code::SUCCESS
        }
        Err(run::RunError::Store(e)) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}
