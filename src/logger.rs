//! Structured logging with box-drawing output.
//!
//! Every line is written through [`write_output`], which prints to stdout or,
//! once [`Log::start_file_logging`] has been called, forwards the line (minus
//! ANSI colors) to a background writer thread.
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a conceptual block (`┃` spacer, then `┣ message`).
//!   Use it for loading configuration, mounting carousels, reloads and shutdown.
//! - `log_decorated!` continues a block (`┣ message`).
//! - `log_indented!` lists details inside a block (`┃   message`).
//! - `log_pipe!` inserts an empty `┃` line before a standalone level message.
//! - `log_version!` prints the `┏ carousel vX.Y.Z ━━╸` header once at startup.
//! - `log_end!` prints the closing `╹` once at shutdown.
//! - `log_info!`, `log_warning!`, `log_error!`, `log_debug!` and `log_critical!`
//!   carry a colored `[LEVEL]` tag and are used where a block does not fit.
//!
//! While the simulated time source is active, every line is prefixed with the
//! simulated clock as `[mm:ss.mmm]` so simulation logs read as a timeline.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Set once when --log is active.
static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Runtime switches for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all macro output. Tests and `--json` output turn it off.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Route all further output to `file_path` until the guard is dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => file.write_all(text.as_bytes())?,
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Simulated clock prefix, or an empty string outside simulation.
    pub fn get_timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", format_clock(crate::time_source::now()))
        } else {
            String::new()
        }
    }
}

/// Flushes and joins the file writer on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // LOG_CHANNEL stays set; the process exits right after.
    }
}

/// `mm:ss.mmm` for a monotonic offset.
pub fn format_clock(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Route one formatted line. Used by the macros.
pub fn write_output(text: &str) {
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

/// Shared body of the line macros: `$lead` goes between the timestamp and the message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($lead:expr, $message:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let lead: &str = $lead;
            let message = $message;
            // Multi-line leads get the timestamp on every line.
            let lead = lead.replace('\n', &format!("\n{prefix}"));
            let formatted = format!("{prefix}{lead}{message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Continue a block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣ ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣ ", $expr) };
}

/// Detail line inside a block: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┃   ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┃   ", $expr) };
}

/// Open a new block: spacer pipe, then `┣ message`.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┃\n┣ ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┃\n┣ ", $expr) };
}

/// Empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!("┃", "")
    };
}

/// Startup header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            "┏ ",
            format!("carousel v{} ━━╸", env!("CARGO_PKG_VERSION"))
        )
    };
}

/// Closing marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!("╹", "")
    };
}

#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", $expr) };
}

#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] ", $expr) };
}

#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", $expr) };
}

#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", $expr) };
}

/// Error that ends the log: spacer pipe, then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] ", $expr) };
}

#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => { $crate::__log_line!("┣[\x1b[31mCRITICAL\x1b[0m] ", format!($fmt $($arg)*)) };
    ($expr:expr) => { $crate::__log_line!("┣[\x1b[31mCRITICAL\x1b[0m] ", $expr) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(
            strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] slow"),
            "┣[WARNING] slow"
        );
        assert_eq!(strip_ansi_codes("plain\x1b"), "plain\x1b");
    }

    #[test]
    fn test_level_macros_are_silent_when_disabled() {
        Log::set_enabled(false);
        log_critical!("render failed: {}", "broken pipe");
        log_critical!(String::from("render failed"));
        log_warning!("still {}", "quiet");
        assert!(!Log::is_enabled());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::from_millis(0)), "00:00.000");
        assert_eq!(format_clock(Duration::from_millis(61_250)), "01:01.250");
        assert_eq!(format_clock(Duration::from_secs(3600)), "60:00.000");
    }
}
