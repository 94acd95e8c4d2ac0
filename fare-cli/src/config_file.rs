//! Loading [`FareConfig`] from TOML.
//!
//! ```toml
//! max_tax_rows = 25
//! debounce_delay_ms = 300
//! ```
//!
//! Missing keys take their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fare_core::FareConfig;
use tracing::debug;

/// Parses and validates a TOML configuration document.
pub fn parse_config(text: &str) -> Result<FareConfig> {
    let config: FareConfig = toml::from_str(text).context("invalid configuration")?;
    config.validate()?;
    Ok(config)
}

/// Reads the configuration file at `path`, or returns the defaults when no
/// path is given.
pub fn load_config(path: Option<&Path>) -> Result<FareConfig> {
    let Some(path) = path else {
        return Ok(FareConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file '{}'", path.display()))?;
    let config = parse_config(&text)
        .with_context(|| format!("cannot load config file '{}'", path.display()))?;
    debug!(path = %path.display(), ?config, "configuration loaded");

    Ok(config)
}

/// Applies command-line overrides on top of a loaded configuration.
pub fn apply_overrides(
    mut config: FareConfig,
    max_tax_rows: Option<usize>,
    debounce_delay_ms: Option<u64>,
) -> Result<FareConfig> {
    if let Some(max_tax_rows) = max_tax_rows {
        config.max_tax_rows = max_tax_rows;
    }
    if let Some(debounce_delay_ms) = debounce_delay_ms {
        config.debounce_delay_ms = debounce_delay_ms;
    }
    config.validate()?;
    Ok(config)
}
