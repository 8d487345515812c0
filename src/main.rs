//! `carousel` binary: argument dispatch only.
//!
//! Everything else lives in the library so it can be tested; see
//! `carousel_engine::commands` for the command implementations.

use carousel_engine::args::{CliAction, ParsedArgs};
use carousel_engine::commands;
use carousel_engine::config;
use carousel_engine::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use carousel_engine::{log_end, log_error_exit, log_indented};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args());

    let result = match parsed.action {
        CliAction::ShowVersion => {
            println!("carousel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::ShowHelp => {
            commands::display_usage();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            commands::display_usage();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => commands::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => config::set_config_dir(config_dir)
            .and_then(|_| commands::handle_run_command(debug_enabled)),
        CliAction::Simulate {
            debug_enabled,
            duration_ms,
            speed,
            json,
            log_to_file,
            config_dir,
        } => config::set_config_dir(config_dir).and_then(|_| {
            commands::handle_simulate_command(duration_ms, speed, json, log_to_file, debug_enabled)
        }),
        CliAction::Validate {
            debug_enabled,
            config_dir,
        } => config::set_config_dir(config_dir)
            .and_then(|_| commands::handle_validate_command(debug_enabled)),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            carousel_engine::logger::Log::set_enabled(true);
            log_error_exit!("{}", e);
            for cause in e.chain().skip(1) {
                log_indented!("Caused by: {}", cause);
            }
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
    }
}
