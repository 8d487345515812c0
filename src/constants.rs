//! Application-wide constants: defaults, validation limits and exit codes.
//!
//! Keeping these in one place makes the relationship between the config
//! defaults, the validation ranges and the generated default file obvious.

// # Rotation Defaults

/// Time between the start of successive transitions, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 4000;

/// Length of one blend between slides, in milliseconds.
pub const DEFAULT_TRANSITION_MS: u64 = 1000;

/// Blend style used when neither the carousel nor the defaults name one.
pub const DEFAULT_BLEND: &str = "crossfade";

/// Pause rotation while a carousel is not visible.
pub const DEFAULT_PAUSE_WHEN_HIDDEN: bool = true;

/// Watch the configuration file and apply edits without restarting.
pub const DEFAULT_WATCH: bool = true;

/// Render loop cadence for the terminal preview, in milliseconds (~30 fps).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

// # Validation Limits

pub const MINIMUM_INTERVAL_MS: u64 = 100;
pub const MAXIMUM_INTERVAL_MS: u64 = 600_000; // 10 minutes

pub const MINIMUM_TRANSITION_MS: u64 = 1;
pub const MAXIMUM_TRANSITION_MS: u64 = 600_000;

pub const MINIMUM_FRAME_INTERVAL_MS: u64 = 5;
pub const MAXIMUM_FRAME_INTERVAL_MS: u64 = 1000;

// # File Names

pub const CONFIG_DIR_NAME: &str = "carousel";
pub const CONFIG_FILE_NAME: &str = "carousel.toml";

// # Simulation

/// Simulated seconds per real second when `--speed` is not given (0 = fast-forward).
pub const DEFAULT_SIMULATION_SPEED: f64 = 0.0;

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

// # Terminal Rendering

/// Width of the blend bar drawn by the terminal renderer.
pub const PROGRESS_BAR_WIDTH: usize = 20;
