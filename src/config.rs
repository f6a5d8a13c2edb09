//! Cell configuration
//!
//! Tunable constants of a [`QuantussyCell`](crate::cell::QuantussyCell),
//! loadable from JSON. Every field has a default, so `{}` is a valid config.

use crate::light::DEFAULT_LIGHT_DECAY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    /// Volts per unit of raw waveform
    pub output_gain: f64,

    /// Clock detector falls back to low at or below this voltage
    pub clock_low: f64,

    /// Clock detector fires at or above this voltage
    pub clock_high: f64,

    /// Fade-out rate of the blink light, 1/seconds
    pub light_decay: f64,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            output_gain: 5.0,
            clock_low: 0.0,
            clock_high: 0.01,
            light_decay: DEFAULT_LIGHT_DECAY,
        }
    }
}

impl CellConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(?config, "loaded cell config");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.output_gain.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "output_gain",
                reason: "must be finite",
            });
        }
        if !self.clock_low.is_finite() || !self.clock_high.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "clock_low/clock_high",
                reason: "must be finite",
            });
        }
        if self.clock_low >= self.clock_high {
            return Err(ConfigError::InvalidValue {
                field: "clock_low/clock_high",
                reason: "clock_low must be below clock_high",
            });
        }
        if !self.light_decay.is_finite() || self.light_decay < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "light_decay",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Error types for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "Invalid config JSON: {}", err),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid config value for {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CellConfig::from_json("{}").unwrap();
        assert_eq!(config, CellConfig::default());
        assert_eq!(config.output_gain, 5.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = CellConfig::from_json(r#"{ "output_gain": 1.0, "light_decay": 5.0 }"#)
            .unwrap();
        assert_eq!(config.output_gain, 1.0);
        assert_eq!(config.light_decay, 5.0);
        assert_eq!(config.clock_high, 0.01);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CellConfig {
            output_gain: 2.5,
            ..CellConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(CellConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = CellConfig::from_json("{ output_gain: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_inverted_clock_band_rejected() {
        let err = CellConfig::from_json(r#"{ "clock_low": 1.0, "clock_high": 0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "clock_low/clock_high",
                ..
            }
        ));
        assert!(err.to_string().contains("clock_low must be below clock_high"));
    }

    #[test]
    fn test_negative_decay_rejected() {
        let config = CellConfig {
            light_decay: -1.0,
            ..CellConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
