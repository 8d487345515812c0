//! Configuration validation.
//!
//! Rejects values that can never work: out-of-range durations, duplicate or
//! empty names, duplicate slide ids. Combinations the engine can survive (a
//! transition longer than its interval, a carousel with no slides) pass here
//! and are reported by the engine when the carousel is mounted.

use anyhow::Result;
use std::collections::HashSet;

use super::Config;
use crate::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.interval_ms {
        validate_interval(interval, "interval_ms")?;
    }
    if let Some(transition) = config.transition_ms {
        validate_transition(transition, "transition_ms")?;
    }

    if let Some(frame) = config.frame_interval_ms
        && !(MINIMUM_FRAME_INTERVAL_MS..=MAXIMUM_FRAME_INTERVAL_MS).contains(&frame)
    {
        anyhow::bail!(
            "frame_interval_ms ({} ms) must be between {} and {} milliseconds",
            frame,
            MINIMUM_FRAME_INTERVAL_MS,
            MAXIMUM_FRAME_INTERVAL_MS
        );
    }

    let mut names = HashSet::new();
    for entry in &config.carousels {
        let name = entry.name.trim();
        if name.is_empty() {
            anyhow::bail!("Every [[carousel]] needs a non-empty name");
        }
        if !names.insert(name) {
            anyhow::bail!("Carousel name '{}' is used more than once", name);
        }

        if let Some(interval) = entry.interval_ms {
            validate_interval(interval, &format!("carousel '{name}' interval_ms"))?;
        }
        if let Some(transition) = entry.transition_ms {
            validate_transition(transition, &format!("carousel '{name}' transition_ms"))?;
        }

        let mut ids = HashSet::new();
        for slide in &entry.slides {
            if slide.id.trim().is_empty() {
                anyhow::bail!("Carousel '{}' has a slide with an empty id", name);
            }
            if !ids.insert(slide.id.as_str()) {
                anyhow::bail!(
                    "Carousel '{}' has more than one slide with id '{}'",
                    name,
                    slide.id
                );
            }
        }
    }

    Ok(())
}

fn validate_interval(interval_ms: u64, field: &str) -> Result<()> {
    if !(MINIMUM_INTERVAL_MS..=MAXIMUM_INTERVAL_MS).contains(&interval_ms) {
        anyhow::bail!(
            "{} ({} ms) must be between {} and {} milliseconds",
            field,
            interval_ms,
            MINIMUM_INTERVAL_MS,
            MAXIMUM_INTERVAL_MS
        );
    }
    Ok(())
}

fn validate_transition(transition_ms: u64, field: &str) -> Result<()> {
    if !(MINIMUM_TRANSITION_MS..=MAXIMUM_TRANSITION_MS).contains(&transition_ms) {
        anyhow::bail!(
            "{} ({} ms) must be between {} and {} milliseconds",
            field,
            transition_ms,
            MINIMUM_TRANSITION_MS,
            MAXIMUM_TRANSITION_MS
        );
    }
    Ok(())
}
