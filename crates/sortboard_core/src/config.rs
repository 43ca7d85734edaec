//! Board runtime configuration.
//!
//! # Responsibility
//! - Provide the reversal delay used by every board instance.
//! - Resolve overrides from the process environment for FFI/CLI hosts.
//!
//! # Invariants
//! - The reversal delay is always strictly positive.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable overriding `revert_delay_ms`.
pub const REVERT_DELAY_ENV: &str = "SORTBOARD_REVERT_DELAY_MS";
/// Default delay before an activated item returns on its own.
pub const DEFAULT_REVERT_DELAY_MS: u64 = 5_000;

/// Configuration parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDelay(String),
    ZeroDelay,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDelay(value) => write!(
                f,
                "revert delay must be a whole number of milliseconds, got `{value}`"
            ),
            Self::ZeroDelay => write!(f, "revert delay must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub revert_delay_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
        }
    }
}

impl BoardConfig {
    /// Builds a config from an explicit delay.
    ///
    /// Sub-millisecond remainders round up, so any non-zero delay stays
    /// non-zero.
    pub fn with_delay(delay: Duration) -> Result<Self, ConfigError> {
        let whole_ms = delay.as_millis() + u128::from(delay.subsec_nanos() % 1_000_000 != 0);
        let config = Self {
            revert_delay_ms: u64::try_from(whole_ms).unwrap_or(u64::MAX),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads overrides from the process environment.
    ///
    /// Unset or blank values fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_raw_delay(std::env::var(REVERT_DELAY_ENV).ok().as_deref())
    }

    /// Parses a raw delay value as found in the environment.
    pub fn from_raw_delay(raw: Option<&str>) -> Result<Self, ConfigError> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let revert_delay_ms = trimmed
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDelay(trimmed.to_string()))?;
        let config = Self { revert_delay_ms };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.revert_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        Ok(())
    }

    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError, DEFAULT_REVERT_DELAY_MS, REVERT_DELAY_ENV};
    use std::time::Duration;

    #[test]
    fn blank_or_missing_values_use_default() {
        assert_eq!(BoardConfig::from_raw_delay(None), Ok(BoardConfig::default()));
        assert_eq!(
            BoardConfig::from_raw_delay(Some("   ")),
            Ok(BoardConfig::default())
        );
        assert_eq!(
            BoardConfig::default().revert_delay(),
            Duration::from_millis(DEFAULT_REVERT_DELAY_MS)
        );
    }

    #[test]
    fn parses_trimmed_override() {
        let config = BoardConfig::from_raw_delay(Some(" 1200 ")).expect("valid override");
        assert_eq!(config.revert_delay(), Duration::from_millis(1_200));
    }

    #[test]
    fn rejects_garbage_and_zero() {
        assert_eq!(
            BoardConfig::from_raw_delay(Some("5s")),
            Err(ConfigError::InvalidDelay("5s".to_string()))
        );
        assert_eq!(
            BoardConfig::from_raw_delay(Some("0")),
            Err(ConfigError::ZeroDelay)
        );
        assert_eq!(
            BoardConfig::with_delay(Duration::ZERO),
            Err(ConfigError::ZeroDelay)
        );
    }

    #[test]
    fn explicit_delay_rounds_sub_millisecond_up() {
        let config = BoardConfig::with_delay(Duration::from_micros(500)).expect("non-zero delay");
        assert_eq!(config.revert_delay_ms, 1);
        let config = BoardConfig::with_delay(Duration::from_micros(2_001)).expect("non-zero delay");
        assert_eq!(config.revert_delay_ms, 3);
        let config = BoardConfig::with_delay(Duration::from_millis(250)).expect("whole delay");
        assert_eq!(config.revert_delay_ms, 250);
    }

    #[test]
    fn error_messages_describe_the_delay_value() {
        let zero = ConfigError::ZeroDelay.to_string();
        assert_eq!(zero, "revert delay must be greater than zero");
        assert!(!zero.contains(REVERT_DELAY_ENV));

        let garbage = ConfigError::InvalidDelay("5s".to_string()).to_string();
        assert!(garbage.contains("`5s`"));
        assert!(!garbage.contains(REVERT_DELAY_ENV));
    }
}
