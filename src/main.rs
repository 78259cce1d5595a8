//! presenced — passive LAN presence detector CLI.
//!
//! Exit codes: 0 success, 2 usage error, 3 missing/invalid configuration,
//! 4 capture capability unavailable, 1 anything else.

use std::process::ExitCode;

use presenced::commands;
use presenced::errors::{CaptureError, ConfigError, QueryError, SweepError};
use presenced::{parse_cli_args, usage_text, version_text, CliCommand};

const EXIT_USAGE: u8 = 2;
const EXIT_CONFIG: u8 = 3;
const EXIT_CAPTURE: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    let command = match parse_cli_args(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match command {
        CliCommand::Help => {
            println!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
        CliCommand::Version => {
            println!("{}", version_text());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    if let Err(e) = presenced::logging::init_logging(command.verbose()) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = match command {
        CliCommand::Watch {
            config,
            state_dir,
            interface,
            ..
        } => commands::handle_watch(config, state_dir, interface).await,
        CliCommand::Sweep {
            config,
            state_dir,
            interface,
            ..
        } => commands::handle_sweep(config, state_dir, interface).await,
        CliCommand::Query {
            name,
            config,
            state_dir,
            timeout_secs,
            on_off,
            ..
        } => commands::handle_query(name, config, state_dir, timeout_secs, on_off).await,
        CliCommand::Help | CliCommand::Version => unreachable!(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Map typed failures out of the anyhow chain onto the documented exit
/// codes.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(sweep) = cause.downcast_ref::<SweepError>() {
            return match sweep {
                SweepError::Config(_) => EXIT_CONFIG,
                SweepError::Capture(_) => EXIT_CAPTURE,
                SweepError::Store(_) => 1,
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_CONFIG;
        }
        if cause.downcast_ref::<CaptureError>().is_some() {
            return EXIT_CAPTURE;
        }
        if let Some(query) = cause.downcast_ref::<QueryError>() {
            return match query {
                // An unconfigured name is a configuration problem.
                QueryError::UnknownDevice(_) => EXIT_CONFIG,
                QueryError::Store(_) => 1,
            };
        }
    }
    1
}
