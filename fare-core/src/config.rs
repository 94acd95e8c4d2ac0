//! Tunable limits for the calculator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on the number of tax rows.
pub const DEFAULT_MAX_TAX_ROWS: usize = 20;

/// Default trailing-edge debounce delay before a recompute fires.
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 300;

/// Errors returned by [`FareConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FareConfigError {
    /// At least one tax row must be allowed.
    #[error("max tax rows must be at least 1, got {0}")]
    InvalidMaxTaxRows(usize),
}

/// Configuration for a [`FareForm`](crate::FareForm).
///
/// Missing fields take their defaults when deserialized.
///
/// # Example
///
/// ```
/// use fare_core::FareConfig;
///
/// let config = FareConfig {
///     max_tax_rows: 25,
///     ..FareConfig::default()
/// };
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.debounce_delay().as_millis(), 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    /// Maximum number of tax rows, including the first.
    pub max_tax_rows: usize,

    /// Delay between the last input change and the recompute, in
    /// milliseconds.
    pub debounce_delay_ms: u64,
}

impl FareConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    /// # Errors
    ///
    /// Returns [`FareConfigError::InvalidMaxTaxRows`] if `max_tax_rows` is
    /// zero.
    pub fn validate(&self) -> Result<(), FareConfigError> {
        if self.max_tax_rows == 0 {
            return Err(FareConfigError::InvalidMaxTaxRows(self.max_tax_rows));
        }
        Ok(())
    }
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            max_tax_rows: DEFAULT_MAX_TAX_ROWS,
            debounce_delay_ms: DEFAULT_DEBOUNCE_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_matches_form_limits() {
        let config = FareConfig::default();

        assert_eq!(config.max_tax_rows, 20);
        assert_eq!(config.debounce_delay(), Duration::from_millis(300));
    }

    #[test]
    fn validate_rejects_zero_rows() {
        let config = FareConfig {
            max_tax_rows: 0,
            ..FareConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(FareConfigError::InvalidMaxTaxRows(0))
        );
    }

    #[test]
    fn zero_debounce_is_allowed() {
        let config = FareConfig {
            debounce_delay_ms: 0,
            ..FareConfig::default()
        };

        assert_eq!(config.validate(), Ok(()));
    }
}
