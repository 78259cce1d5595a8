use std::path::PathBuf;

use anyhow::Result;

use crate::config::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Watch {
        config: Option<PathBuf>,
        state_dir: Option<PathBuf>,
        interface: Option<String>,
        verbose: bool,
    },
    Sweep {
        config: Option<PathBuf>,
        state_dir: Option<PathBuf>,
        interface: Option<String>,
        verbose: bool,
    },
    Query {
        name: String,
        config: Option<PathBuf>,
        state_dir: Option<PathBuf>,
        timeout_secs: i64,
        on_off: bool,
        verbose: bool,
    },
    Help,
    Version,
}

impl CliCommand {
    /// Whether `-v/--verbose` was given, for logging setup.
    pub fn verbose(&self) -> bool {
        match self {
            CliCommand::Watch { verbose, .. }
            | CliCommand::Sweep { verbose, .. }
            | CliCommand::Query { verbose, .. } => *verbose,
            CliCommand::Help | CliCommand::Version => false,
        }
    }
}

pub fn version_text() -> String {
    format!("presenced {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
Passive LAN presence detector

Usage:
  presenced [watch] [--config <PATH>] [--state-dir <PATH>] [--interface <NAME>]
  presenced sweep [--config <PATH>] [--state-dir <PATH>] [--interface <NAME>]
  presenced query <NAME> [--config <PATH>] [--state-dir <PATH>] [--timeout <SECS>] [--on-off]
  presenced --help
  presenced --version

Commands:
  watch                   Detect continuously until interrupted (default)
  sweep                   Run one detection pass over all devices
  query <NAME>            Report presence of one device from stored state

Options:
  -c, --config <PATH>     Device table (JSON: name -> hardware address)
      --state-dir <PATH>  Presence state directory
  -i, --interface <NAME>  Capture interface (watch/sweep; auto-detected if omitted)
      --timeout <SECS>    Query freshness window in seconds (default: {default_timeout})
      --on-off            Query: render On/Off instead of age in seconds
  -v, --verbose           Verbose diagnostics (equivalent to RUST_LOG=debug)
  -h, --help              Show this help text
  -V, --version           Show version",
        version = version_text(),
        default_timeout = DEFAULT_TIMEOUT_SECS
    )
}

fn parse_timeout_arg(raw: &str) -> Result<i64> {
    raw.parse::<i64>().ok().filter(|v| *v >= 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for --timeout: '{}'. Expected a non-negative integer.\n\n{}",
            raw,
            usage_text()
        )
    })
}

pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut query_name: Option<String> = None;
    let mut config: Option<PathBuf> = None;
    let mut state_dir: Option<PathBuf> = None;
    let mut interface: Option<String> = None;
    let mut timeout_secs: Option<i64> = None;
    let mut on_off = false;
    let mut verbose = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "watch" | "sweep" | "query" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "-c" | "--config" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --config.\n\n{}", usage_text())
                })?;
                config = Some(PathBuf::from(value.as_ref()));
            }
            "--state-dir" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --state-dir.\n\n{}", usage_text())
                })?;
                state_dir = Some(PathBuf::from(value.as_ref()));
            }
            "-i" | "--interface" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --interface.\n\n{}", usage_text())
                })?;
                interface = Some(value.as_ref().to_string());
            }
            "--timeout" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --timeout.\n\n{}", usage_text())
                })?;
                timeout_secs = Some(parse_timeout_arg(value.as_ref())?);
            }
            "--on-off" => {
                on_off = true;
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            _ if arg.starts_with("--config=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --config.\n\n{}",
                        usage_text()
                    ));
                }
                config = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--state-dir=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --state-dir.\n\n{}",
                        usage_text()
                    ));
                }
                state_dir = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--interface=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --interface.\n\n{}",
                        usage_text()
                    ));
                }
                interface = Some(value.to_string());
            }
            _ if arg.starts_with("--timeout=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --timeout.\n\n{}",
                        usage_text()
                    ));
                }
                timeout_secs = Some(parse_timeout_arg(value)?);
            }
            _ if !arg.starts_with('-') && command.as_deref() == Some("query") => {
                if query_name.is_some() {
                    return Err(anyhow::anyhow!(
                        "query takes exactly one device name.\n\n{}",
                        usage_text()
                    ));
                }
                query_name = Some(arg.to_string());
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("watch") {
        "watch" | "sweep" => {
            if timeout_secs.is_some() || on_off {
                return Err(anyhow::anyhow!(
                    "--timeout/--on-off are only valid with query.\n\n{}",
                    usage_text()
                ));
            }
            if command.as_deref().unwrap_or("watch") == "watch" {
                Ok(CliCommand::Watch {
                    config,
                    state_dir,
                    interface,
                    verbose,
                })
            } else {
                Ok(CliCommand::Sweep {
                    config,
                    state_dir,
                    interface,
                    verbose,
                })
            }
        }
        "query" => {
            if interface.is_some() {
                return Err(anyhow::anyhow!(
                    "--interface is only valid with watch or sweep.\n\n{}",
                    usage_text()
                ));
            }
            let name = query_name.ok_or_else(|| {
                anyhow::anyhow!("query requires a device name.\n\n{}", usage_text())
            })?;
            Ok(CliCommand::Query {
                name,
                config,
                state_dir,
                timeout_secs: timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                on_off,
                verbose,
            })
        }
        _ => unreachable!(),
    }
}
