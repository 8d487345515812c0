//! `carousel help [command]` and `carousel --help`.

use anyhow::Result;

/// Brief usage for one command, shown after argument errors.
pub fn show_command_usage(command: &str) {
    match command {
        "run" => log_block_start!("Usage: carousel run [OPTIONS]"),
        "simulate" => log_block_start!(
            "Usage: carousel simulate <duration_ms> [--speed <x>] [--json] [--log]"
        ),
        "validate" => log_block_start!("Usage: carousel validate [OPTIONS]"),
        _ => log_block_start!("Usage: carousel [OPTIONS] [COMMAND]"),
    }
}

/// Dispatch `carousel help [command]`.
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("run") => super::run::display_help(),
        Some("simulate") => super::simulate::display_help(),
        Some("validate") => super::validate::display_help(),
        Some("help") => display_help_help(),
        Some(unknown) => {
            log_version!();
            log_pipe!();
            log_warning!("Unknown command: {}", unknown);
            show_command_usage(unknown);
            log_end!();
        }
    }
    Ok(())
}

/// `carousel --help`.
pub fn display_usage() {
    log_version!();
    log_block_start!("Usage: carousel [OPTIONS] [COMMAND]");
    log_block_start!("Commands:");
    log_indented!("run                    Live preview of every configured carousel (default)");
    log_indented!("simulate <duration_ms> Replay rotation on simulated time");
    log_indented!("validate               Check the configuration and report problems");
    log_indented!("help [COMMAND]         Show detailed help for a command");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use <dir>/carousel.toml instead of the default");
    log_indented!("-d, --debug            Log engine lifecycle details");
    log_indented!("-h, --help             Print this help");
    log_indented!("-V, --version          Print the version");
    log_end!();
}

fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("run                    Live terminal preview (default)");
    log_indented!("simulate <duration_ms> Replay rotation on simulated time");
    log_indented!("validate               Check the configuration");
    log_indented!("help [COMMAND]         Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'carousel help <command>' for details on one command.");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: carousel help [COMMAND]");
    log_block_start!("Examples:");
    log_indented!("carousel help");
    log_indented!("carousel help simulate");
    log_end!();
}
