// Engine Configuration

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::sl_interface::{
    Mode, FAULT_PROBABILITY, LOG_CAPACITY, MAX_LOG_CAPACITY, TICK_INTERVAL_MS,
};

/// Errors raised at the configuration boundary of the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Mode tag is none of geo / byzantine / ml_batching
    #[error("unknown simulation mode `{0}` (expected geo, byzantine or ml_batching)")]
    UnknownMode(String),

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("log capacity must be greater than zero")]
    ZeroLogCapacity,

    #[error("log capacity {capacity} exceeds the maximum of {max}")]
    LogCapacityTooLarge { capacity: usize, max: usize },

    #[error("fault probability {0} is outside [0, 1]")]
    InvalidFaultProbability(f64),

    #[error("invalid hex seed `{0}`")]
    InvalidSeed(String),
}

/// Main engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub log_capacity: usize,
    pub initial_mode: Mode,
    pub fault_probability: f64,
    /// Re-arm a full interval when the mode changes while running
    pub restart_cadence_on_mode_change: bool,
    pub seed: Option<[u8; 32]>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            log_capacity: LOG_CAPACITY,
            initial_mode: Mode::Geo,
            fault_probability: FAULT_PROBABILITY,
            restart_cadence_on_mode_change: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        if self.log_capacity > MAX_LOG_CAPACITY {
            return Err(ConfigError::LogCapacityTooLarge {
                capacity: self.log_capacity,
                max: MAX_LOG_CAPACITY,
            });
        }
        if !(0.0..=1.0).contains(&self.fault_probability) {
            return Err(ConfigError::InvalidFaultProbability(self.fault_probability));
        }
        Ok(())
    }

    /// Apply the fields present in `overrides` on top of this config
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(v) = overrides.tick_interval_ms {
            self.tick_interval = Duration::from_millis(v);
        }
        if let Some(v) = overrides.log_capacity {
            self.log_capacity = v;
        }
        if let Some(ref v) = overrides.initial_mode {
            self.initial_mode = v.parse()?;
        }
        if let Some(v) = overrides.fault_probability {
            self.fault_probability = v;
        }
        if let Some(v) = overrides.restart_cadence_on_mode_change {
            self.restart_cadence_on_mode_change = v;
        }
        if let Some(ref v) = overrides.seed {
            self.seed = Some(parse_seed_hex(v)?);
        }
        self.validate()
    }

    /// Build a config from a YAML document of overrides
    ///
    /// ```
    /// use sublyne::EngineConfig;
    ///
    /// let config = EngineConfig::from_yaml("initial_mode: byzantine\nlog_capacity: 8\n").unwrap();
    /// assert_eq!(config.log_capacity, 8);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let overrides: ConfigOverrides = serde_yaml::from_str(yaml)?;
        let mut config = Self::default();
        config
            .apply(&overrides)
            .map_err(<serde_yaml::Error as serde::de::Error>::custom)?;
        Ok(config)
    }
}

/// Optional overrides as they appear in YAML files
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub tick_interval_ms: Option<u64>,
    pub log_capacity: Option<usize>,
    pub initial_mode: Option<String>,
    pub fault_probability: Option<f64>,
    pub restart_cadence_on_mode_change: Option<bool>,
    pub seed: Option<String>,
}

/// Parse a 32-byte seed from hex, with or without a `0x` prefix
///
/// Shorter input fills the leading bytes; the rest stay zero.
pub fn parse_seed_hex(hex: &str) -> Result<[u8; 32], ConfigError> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 64 || digits.len() % 2 != 0 {
        return Err(ConfigError::InvalidSeed(hex.to_string()));
    }

    let mut seed = [0u8; 32];
    for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
        let byte_str =
            std::str::from_utf8(chunk).map_err(|_| ConfigError::InvalidSeed(hex.to_string()))?;
        seed[i] = u8::from_str_radix(byte_str, 16)
            .map_err(|_| ConfigError::InvalidSeed(hex.to_string()))?;
    }

    Ok(seed)
}

/// Hex rendering of a seed, accepted back by `parse_seed_hex`
pub fn seed_to_hex(seed: &[u8; 32]) -> String {
    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for b in seed {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
