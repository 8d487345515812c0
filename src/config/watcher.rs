//! Hot reload: watch `carousel.toml` and ask the main loop to reload.
//!
//! The parent directory is watched rather than the file itself so that editors
//! which save by writing a temporary file and renaming it are still noticed.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use super::Config;
use crate::signals::SignalMessage;
use crate::utils::private_path;

/// Editors often write a file in several steps; coalesce them into one reload.
const DEBOUNCE_MS: u64 = 500;

pub struct ConfigWatcher {
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    config_path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(signal_sender: Sender<SignalMessage>, debug_enabled: bool) -> Result<Self> {
        Ok(Self {
            signal_sender,
            debug_enabled,
            config_path: Config::get_config_path()?,
        })
    }

    /// Watch an explicit file instead of the discovered one.
    pub fn for_path(
        signal_sender: Sender<SignalMessage>,
        debug_enabled: bool,
        config_path: PathBuf,
    ) -> Self {
        Self {
            signal_sender,
            debug_enabled,
            config_path,
        }
    }

    /// Spawn the watcher thread. It lives until the reload channel closes.
    pub fn start(self) -> Result<()> {
        let Some(config_dir) = self.config_path.parent().map(Path::to_path_buf) else {
            anyhow::bail!(
                "Cannot watch {}: no parent directory",
                private_path(&self.config_path)
            );
        };

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Starting config file watcher for hot reload:");
            log_indented!("Watching: {}", private_path(&self.config_path));
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&config_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", private_path(&config_dir)))?;

        let Self {
            signal_sender,
            debug_enabled,
            config_path,
        } = self;

        thread::spawn(move || {
            // The watcher stops when dropped, so it lives in this thread.
            let _watcher = watcher;
            let mut debouncer = Debouncer::new(Duration::from_millis(DEBOUNCE_MS));

            for event in rx {
                if !event
                    .paths
                    .iter()
                    .any(|path| affects_config(path, &config_path))
                {
                    continue;
                }
                if !debouncer.accept(Instant::now()) {
                    continue;
                }

                if debug_enabled {
                    log_pipe!();
                    log_info!("Configuration file change detected");
                }
                if signal_sender.send(SignalMessage::Reload).is_err() {
                    break;
                }
            }
        });

        Ok(())
    }
}

/// Start watching the discovered configuration file.
pub fn start_config_watcher(
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    ConfigWatcher::new(signal_sender, debug_enabled)?.start()
}

/// Whether a changed path is the config file or an editor's temporary copy of it.
fn affects_config(event_path: &Path, config_path: &Path) -> bool {
    if event_path == config_path {
        return true;
    }
    if event_path.parent() != config_path.parent() {
        return false;
    }
    match (
        event_path.file_name().and_then(|name| name.to_str()),
        config_path.file_name().and_then(|name| name.to_str()),
    ) {
        (Some(event_name), Some(config_name)) => {
            event_name.starts_with(config_name)
                || event_name.trim_start_matches('.').starts_with(config_name)
        }
        _ => false,
    }
}

/// Accepts at most one event per window.
struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    fn accept(&mut self, at: Instant) -> bool {
        match self.last {
            Some(last) if at.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last = Some(at);
                true
            }
        }
    }
}
