//! Device configuration
//!
//! Provisioned as postcard bytes. String fields borrow from the input
//! buffer, so a decoded config lives as long as the bytes it came from.

use alloc::vec::Vec;

use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::app_state::DisplayMode;
use crate::format::{MAX_DIGITS, MIN_DIGITS};

/// Default sensor polling cadence
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 500;

/// Default frame cadence
pub const DEFAULT_RENDER_INTERVAL_MS: u32 = 1000;

/// Default digit budget for current and energy values
pub const DEFAULT_VALUE_DIGITS: u8 = 5;

/// Default digit budget for the bus voltage
pub const DEFAULT_VOLTAGE_DIGITS: u8 = MIN_DIGITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config bytes could not be decoded")]
    Decode,

    #[error("config could not be encoded")]
    Encode,

    #[error("{field} must be non-zero")]
    InvalidInterval { field: &'static str },

    #[error("{field} = {digits} is outside the supported digit range")]
    InvalidDigits { field: &'static str, digits: u8 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct MonitorConfig<'a> {
    pub sampling: SamplingConfig,
    pub display: DisplayConfig,
    pub internet: InternetConfig<'a>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// How often the sensor is polled
    pub sample_interval_ms: u32,
    /// How often a frame is drawn
    pub render_interval_ms: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Screen shown after boot
    pub start_mode: DisplayMode,
    pub current_digits: u8,
    pub energy_digits: u8,
    pub voltage_digits: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            start_mode: DisplayMode::Summary,
            current_digits: DEFAULT_VALUE_DIGITS,
            energy_digits: DEFAULT_VALUE_DIGITS,
            voltage_digits: DEFAULT_VOLTAGE_DIGITS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

impl InternetConfig<'_> {
    /// Whether station credentials were provisioned
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

impl<'a> MonitorConfig<'a> {
    /// Decode and validate a postcard-encoded config
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|e| {
            warn!("Config decode failed: {:?}", e);
            ConfigError::Decode
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as postcard bytes
    pub fn to_vec(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|e| {
            error!("Config encode failed: {:?}", e);
            ConfigError::Encode
        })
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling.sample_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "sample_interval_ms",
            });
        }
        if self.sampling.render_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "render_interval_ms",
            });
        }

        check_digits("current_digits", self.display.current_digits)?;
        check_digits("energy_digits", self.display.energy_digits)?;
        check_digits("voltage_digits", self.display.voltage_digits)?;

        Ok(())
    }
}

fn check_digits(field: &'static str, digits: u8) -> Result<(), ConfigError> {
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(ConfigError::InvalidDigits { field, digits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sampling.sample_interval_ms, 500);
        assert_eq!(config.sampling.render_interval_ms, 1000);
        assert_eq!(config.display.start_mode, DisplayMode::Summary);
        assert!(!config.internet.is_configured());
    }

    #[test]
    fn test_postcard_keeps_credentials() {
        let config = MonitorConfig {
            display: DisplayConfig {
                start_mode: DisplayMode::Graph,
                ..DisplayConfig::default()
            },
            internet: InternetConfig {
                ssid: "bench-lab",
                password: "hunter22",
            },
            ..MonitorConfig::default()
        };

        let bytes = config.to_vec().unwrap();
        let decoded = MonitorConfig::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, config);
        assert_eq!(decoded.internet.ssid, "bench-lab");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = MonitorConfig::default();
        config.sampling.render_interval_ms = 0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidInterval {
                field: "render_interval_ms"
            })
        );
    }

    #[test]
    fn test_digit_budget_rejected() {
        let mut config = MonitorConfig::default();
        config.display.energy_digits = 11;

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDigits {
                field: "energy_digits",
                digits: 11
            })
        );
    }

    #[test]
    fn test_invalid_bytes_are_rejected() {
        assert_eq!(MonitorConfig::from_bytes(&[]), Err(ConfigError::Decode));
    }

    #[test]
    fn test_decoded_config_is_validated() {
        let mut config = MonitorConfig::default();
        config.sampling.sample_interval_ms = 0;
        let bytes = config.to_vec().unwrap();

        assert!(matches!(
            MonitorConfig::from_bytes(&bytes),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }
}
