//! Command-line argument parsing.
//!
//! ```text
//! carousel [run] [-d] [-c <dir>]
//! carousel simulate <duration_ms> [--speed <x>] [--json] [--log] [-d] [-c <dir>]
//! carousel validate [-d] [-c <dir>]
//! carousel help [command] | -h | -V
//! ```
//!
//! Global flags may appear anywhere. `--help` and `--version` win over
//! everything else.

use crate::constants::DEFAULT_SIMULATION_SPEED;

/// What the binary should do.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Live terminal preview of every configured carousel.
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Replay `duration_ms` of rotation on simulated time.
    Simulate {
        debug_enabled: bool,
        duration_ms: u64,
        speed: f64,
        json: bool,
        log_to_file: bool,
        config_dir: Option<String>,
    },
    /// Load the configuration and report problems.
    Validate {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Detailed help for one command.
    HelpCommand { command: Option<String> },
    ShowHelp,
    ShowVersion,
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse `args`, including the program name in position 0.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        ParsedArgs {
            action: parse_action(&args),
        }
    }
}

fn parse_action(args: &[String]) -> CliAction {
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return CliAction::ShowVersion;
    }
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return CliAction::ShowHelp;
    }

    let mut debug_enabled = false;
    let mut config_dir: Option<String> = None;
    let mut speed: Option<f64> = None;
    let mut json = false;
    let mut log_to_file = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--debug" | "-d" => debug_enabled = true,
            "--json" => json = true,
            "--log" => log_to_file = true,
            "--config" | "-c" => match args.get(i + 1) {
                Some(dir) if !dir.starts_with('-') => {
                    config_dir = Some(dir.clone());
                    i += 1;
                }
                _ => {
                    log_warning!("Missing directory for --config. Usage: --config <directory>");
                    return CliAction::ShowHelpDueToError;
                }
            },
            "--speed" | "-s" => match args.get(i + 1).map(|value| value.parse::<f64>()) {
                Some(Ok(value)) if value.is_finite() && value >= 0.0 => {
                    speed = Some(value);
                    i += 1;
                }
                _ => {
                    log_warning!("--speed needs a non-negative number (0 = fast-forward)");
                    return CliAction::ShowHelpDueToError;
                }
            },
            flag if flag.starts_with('-') => {
                log_warning!("Unknown option: {}", flag);
                return CliAction::ShowHelpDueToError;
            }
            word => positional.push(word),
        }
        i += 1;
    }

    let command = positional.first().copied().unwrap_or("run");
    let operands = positional.get(1..).unwrap_or_default();

    // Simulation-only flags make no sense elsewhere.
    if command != "simulate" && (json || log_to_file || speed.is_some()) {
        log_warning!("--speed, --json and --log only apply to 'simulate'");
        return CliAction::ShowHelpDueToError;
    }

    match (command, operands) {
        ("run", []) => CliAction::Run {
            debug_enabled,
            config_dir,
        },
        ("validate", []) => CliAction::Validate {
            debug_enabled,
            config_dir,
        },
        ("simulate", [duration]) => match duration.parse::<u64>() {
            Ok(duration_ms) if duration_ms > 0 => CliAction::Simulate {
                debug_enabled,
                duration_ms,
                speed: speed.unwrap_or(DEFAULT_SIMULATION_SPEED),
                json,
                log_to_file,
                config_dir,
            },
            _ => {
                log_warning!("Invalid duration: {} (expected milliseconds > 0)", duration);
                CliAction::ShowHelpDueToError
            }
        },
        ("simulate", []) => {
            log_warning!("Missing duration. Usage: carousel simulate <duration_ms>");
            CliAction::ShowHelpDueToError
        }
        ("help", []) => CliAction::HelpCommand { command: None },
        ("help", [topic]) => CliAction::HelpCommand {
            command: Some(topic.to_string()),
        },
        ("run" | "validate" | "simulate" | "help", extra) => {
            log_warning!("Unexpected argument(s) for '{}': {}", command, extra.join(" "));
            CliAction::ShowHelpDueToError
        }
        (unknown, _) => {
            log_warning!("Unknown command: {}", unknown);
            CliAction::ShowHelpDueToError
        }
    }
}
