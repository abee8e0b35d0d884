// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wharf - a pluggable component host with graceful shutdown.
//!
//! This is the binary entry point for the Wharf host.

mod active;
mod api;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use wharf_config::model::WharfConfig;
use wharf_core::{Category, WharfError};
use wharf_registry::Registries;
use wharf_runtime::DrainReport;

/// Wharf - a pluggable component host with graceful shutdown.
#[derive(Parser, Debug)]
#[command(name = "wharf", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the host and serve until SIGTERM or Ctrl+C (default).
    Run,
    /// List the built-in components by category.
    Components,
}

fn load_config(path: Option<&PathBuf>) -> Option<WharfConfig> {
    let loaded = match path {
        Some(path) => wharf_config::load_and_validate_path(path),
        None => wharf_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            wharf_config::render_errors(&errors);
            None
        }
    }
}

fn print_components() -> ExitCode {
    let mut registries = Registries::new();
    if let Err(e) = wharf_components::register_builtins(&mut registries) {
        eprintln!("wharf: {e}");
        return ExitCode::FAILURE;
    }

    for category in Category::ALL {
        println!("{category}:");
        for descriptor in registries.view(category).descriptors() {
            println!(
                "  {:<16} {:<8} {}",
                descriptor.name, descriptor.version, descriptor.description
            );
        }
    }
    ExitCode::SUCCESS
}

/// Success only when the host stopped and every tracked unit of work finished
/// or unwound within the drain bounds.
fn exit_code(result: &Result<DrainReport, WharfError>) -> ExitCode {
    match result {
        Ok(report) if report.is_complete() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!(
                "wharf: drain incomplete, {:?} after {} in-flight",
                report.outcome, report.in_flight
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("wharf: {e}");
            if let WharfError::FatalStartup(_) = e {
                eprintln!("  caused by: {}", e.root());
            }
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run) | None => {
            let Some(config) = load_config(cli.config.as_ref()) else {
                return ExitCode::FAILURE;
            };
            exit_code(&serve::run_serve(config).await)
        }
        Some(Commands::Components) => print_components(),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use wharf_runtime::DrainOutcome;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["wharf", "run", "--config", "wharf.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.config, Some(PathBuf::from("wharf.toml")));
    }

    #[test]
    fn clean_drain_exits_successfully() {
        let drained = DrainReport {
            in_flight: 3,
            outcome: DrainOutcome::Drained,
        };
        assert_eq!(exit_code(&Ok(drained)), ExitCode::SUCCESS);

        let cancelled = DrainReport {
            in_flight: 1,
            outcome: DrainOutcome::ForceCancelled { cancelled: 1 },
        };
        assert_eq!(exit_code(&Ok(cancelled)), ExitCode::SUCCESS);
    }

    #[test]
    fn abandoned_work_exits_with_failure() {
        let abandoned = DrainReport {
            in_flight: 2,
            outcome: DrainOutcome::Abandoned { remaining: 1 },
        };
        assert_eq!(exit_code(&Ok(abandoned)), ExitCode::FAILURE);
    }

    #[test]
    fn host_errors_exit_with_failure() {
        let fatal = WharfError::FatalStartup(Box::new(WharfError::Internal("bind".into())));
        assert_eq!(exit_code(&Err(fatal)), ExitCode::FAILURE);
        assert_eq!(
            exit_code(&Err(WharfError::Internal("data plane panicked".into()))),
            ExitCode::FAILURE
        );
    }

    #[test]
    fn components_listing_succeeds() {
        assert_eq!(print_components(), ExitCode::SUCCESS);
    }
}
