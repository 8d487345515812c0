//! `carousel run`: live terminal preview of every configured carousel.
//!
//! The loop wakes at the earlier of the next carousel deadline and the next
//! render frame, drains signal messages, updates the host and repaints. Every
//! exit path goes through [`CarouselHost::shutdown`] so no engine keeps a timer.

use anyhow::Result;
use std::io::Stdout;
use std::time::Duration;

use crate::config::{Config, start_config_watcher};
use crate::host::CarouselHost;
use crate::render::{TerminalGuard, TerminalRenderer};
use crate::signals::{SignalState, handle_signal_message, setup_signal_handler};
use crate::time_source::{self, TimeSource};

pub fn handle_run_command(debug_enabled: bool) -> Result<()> {
    log_version!();
    if debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - logging engine lifecycle");
    }

    let mut config = Config::load()?;
    config.log_config();

    let signal_state = setup_signal_handler(debug_enabled)?;
    if config.watch()
        && let Err(e) = start_config_watcher(signal_state.signal_sender.clone(), debug_enabled)
    {
        log_pipe!();
        log_warning!("Hot reload disabled: {e:#}");
    }

    let source = time_source::source();
    let mut host = CarouselHost::new(debug_enabled);
    host.apply_config(&config, source.now());

    log_block_start!("Previewing {} carousel(s); SIGUSR1 toggles visibility", host.len());
    log_pipe!();

    let result = {
        let _guard = TerminalGuard::new()?;
        let mut renderer = TerminalRenderer::new(std::io::stdout());
        run_loop(
            &mut host,
            &mut config,
            &signal_state,
            source.as_ref(),
            &mut renderer,
            debug_enabled,
        )
    };

    host.shutdown();
    log_block_start!("Stopped all carousels");
    log_end!();
    result
}

fn run_loop(
    host: &mut CarouselHost,
    config: &mut Config,
    signal_state: &SignalState,
    source: &dyn TimeSource,
    renderer: &mut TerminalRenderer<Stdout>,
    debug_enabled: bool,
) -> Result<()> {
    while signal_state.is_running() {
        let now = source.now();

        while let Ok(message) = signal_state.signal_receiver.try_recv() {
            handle_signal_message(message, host, config, signal_state, now)?;
            // Log lines were printed below the preview; start a fresh block.
            renderer.detach();
        }
        if !signal_state.is_running() {
            break;
        }

        let events = host.update(now);
        if debug_enabled && !events.is_empty() {
            for event in &events {
                log_debug!("{}", super::simulate::describe_event(event));
            }
            renderer.detach();
        }

        if let Err(e) = host.render(renderer) {
            log_critical!("Terminal preview failed: {e:#}");
            return Err(e);
        }

        let frame_interval = Duration::from_millis(config.frame_interval_ms());
        time_source::sleep_until_next(source, host.next_wake(now), frame_interval);
    }
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("run - Live terminal preview (default command)");
    log_block_start!("Usage: carousel [run] [-d] [-c <dir>]");
    log_block_start!("Description:");
    log_indented!("Mounts every [[carousel]] from carousel.toml and redraws one status");
    log_indented!("line per carousel as slides hold and blend.");
    log_block_start!("Signals:");
    log_indented!("SIGUSR1          Toggle screen visibility (pauses rotation when hidden)");
    log_indented!("SIGUSR2          Reload the configuration");
    log_indented!("SIGINT/SIGTERM   Stop all carousels and exit");
    log_end!();
}
