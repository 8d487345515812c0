//! `carousel validate`: load the configuration and mount every carousel once.
//!
//! File-level problems (syntax, ranges, duplicates) fail the load. Problems the
//! engine would survive at runtime are reported per carousel: an overlapping
//! transition fails validation, an empty slide list only warns.

use anyhow::Result;
use std::time::Duration;

use crate::config::Config;
use crate::host::{CarouselHost, HostIssue};

/// Mount every configured carousel against a scratch clock and collect issues.
pub fn validate_carousels(config: &Config) -> Vec<HostIssue> {
    let mut host = CarouselHost::new(false);
    let issues = host.apply_config(config, Duration::ZERO);
    host.shutdown();
    issues
}

pub fn handle_validate_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let config_path = Config::get_config_path()?;
    let config = Config::load_from_path(&config_path)?;
    if debug_enabled {
        config.log_config();
    }

    // Mounting logs its own warnings; keep the report below tidy.
    crate::logger::Log::set_enabled(false);
    let issues = validate_carousels(&config);
    crate::logger::Log::set_enabled(true);

    log_block_start!(
        "Checked {} carousel(s) in {}",
        config.carousels.len(),
        crate::utils::private_path(&config_path)
    );

    let mut failures = 0;
    for issue in &issues {
        if issue.error.is_configuration() {
            failures += 1;
            log_error!("{}: {}", issue.carousel, issue.error);
        } else {
            log_warning!("{}: {}", issue.carousel, issue.error);
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} carousel(s) would not rotate");
    }

    log_decorated!("Configuration is valid");
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("validate - Check the configuration");
    log_block_start!("Usage: carousel validate [-c <dir>]");
    log_block_start!("Description:");
    log_indented!("Parses carousel.toml, checks value ranges and uniqueness, then");
    log_indented!("mounts every carousel once. Exits with status 1 when a carousel");
    log_indented!("would fall back to a static slide because of its timing.");
    log_end!();
}
