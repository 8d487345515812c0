//! Command handlers for the `carousel` binary.
//!
//! Each command lives in its own submodule and exposes a `handle_*_command`
//! entry point plus a `display_help` used by `carousel help <command>`.

pub mod help;
pub mod run;
pub mod simulate;
pub mod validate;

pub use help::{display_usage, run_help_command};
pub use run::handle_run_command;
pub use simulate::handle_simulate_command;
pub use validate::handle_validate_command;
