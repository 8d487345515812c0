//! Signal handling for the long-running `carousel run` loop.
//!
//! A background thread turns POSIX signals into [`SignalMessage`]s on a channel
//! that the main loop drains between frames:
//!
//! - `SIGINT`, `SIGTERM`, `SIGHUP`: shutdown
//! - `SIGUSR1`: toggle screen visibility (pauses rotation when hidden)
//! - `SIGUSR2`: reload the configuration
//!
//! The config watcher sends `Reload` on the same channel.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::host::CarouselHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Reload configuration (SIGUSR2 or file change).
    Reload,
    /// Flip screen visibility (SIGUSR1).
    ToggleVisibility,
    /// Stop the main loop (SIGTERM, SIGINT, SIGHUP).
    Shutdown,
}

/// Channel and run flag shared with the signal thread.
pub struct SignalState {
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// A state with no OS handlers attached; messages are sent by hand.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Map a raw signal number to the message it triggers.
pub fn message_for_signal(signal: i32) -> SignalMessage {
    match signal {
        SIGUSR1 => SignalMessage::ToggleVisibility,
        SIGUSR2 => SignalMessage::Reload,
        _ => SignalMessage::Shutdown,
    }
}

/// Register OS handlers and spawn the signal thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running = Arc::clone(&state.running);
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for signal in signals.forever() {
            let message = message_for_signal(signal);
            log_pipe!();
            match message {
                SignalMessage::Reload => log_info!("Received configuration reload signal"),
                SignalMessage::ToggleVisibility => log_info!("Received visibility toggle signal"),
                SignalMessage::Shutdown => {
                    let reason = match signal {
                        SIGINT if debug_enabled => "SIGINT (Ctrl+C)",
                        SIGINT => "interrupt signal",
                        SIGTERM => "termination request",
                        SIGHUP => "hangup signal",
                        _ => "shutdown signal",
                    };
                    log_info!("Received {reason}, initiating graceful shutdown...");
                    running.store(false, Ordering::SeqCst);
                }
            }

            if sender.send(message).is_err() {
                // Main loop is gone.
                break;
            }
        }
    });

    Ok(state)
}

/// Apply one message to the running host.
pub fn handle_signal_message(
    message: SignalMessage,
    host: &mut CarouselHost,
    config: &mut Config,
    state: &SignalState,
    now: Duration,
) -> Result<()> {
    match message {
        SignalMessage::Shutdown => {
            state.running.store(false, Ordering::SeqCst);
        }
        SignalMessage::ToggleVisibility => {
            let visible = !host.is_visible();
            host.set_visible(visible, now);
            log_block_start!(
                "Screen {}",
                if visible { "visible, resuming rotation" } else { "hidden" }
            );
        }
        SignalMessage::Reload => match Config::load() {
            Ok(new_config) => {
                if new_config == *config {
                    log_indented!("Configuration unchanged");
                    return Ok(());
                }
                log_block_start!("Configuration changed, applying changes...");
                let issues = host.apply_config(&new_config, now);
                *config = new_config;
                log_indented!(
                    "{} carousel(s) running, {} issue(s)",
                    host.len(),
                    issues.len()
                );
            }
            Err(e) => {
                // Keep running on the previous configuration.
                log_pipe!();
                log_warning!("Failed to reload configuration: {e:#}");
                log_indented!("Continuing with previous configuration");
            }
        },
    }
    Ok(())
}
