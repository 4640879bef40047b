use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::sl_config::ConfigError;
use crate::sl_geo_matrix::Region;

// one tick of the simulation timer
pub type TickNumber = u64;

/// Default cadence of the simulation timer
pub const TICK_INTERVAL_MS: u64 = 1500;

/// Default number of log lines retained for display
pub const LOG_CAPACITY: usize = 16;
/// Largest log ring a config may ask for
pub const MAX_LOG_CAPACITY: usize = 10_000;

pub const BATCH_SIZE_MIN: u32 = 10;
pub const BATCH_SIZE_MAX: u32 = 1000;
pub const BATCH_SIZE_INITIAL: u32 = 100;

pub const HEALTH_MIN: u8 = 70;
pub const HEALTH_MAX: u8 = 100;

/// Probability that a Byzantine tick takes the fault branch
pub const FAULT_PROBABILITY: f64 = 0.3;

// ============================================================================
// Mode
// ============================================================================

/// The simulation narrative currently selected on the dashboard
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Mode {
    Geo,
    Byzantine,
    MlBatching,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Geo, Mode::Byzantine, Mode::MlBatching];

    /// Canonical tag, as accepted by `FromStr`
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Geo => "geo",
            Mode::Byzantine => "byzantine",
            Mode::MlBatching => "ml_batching",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Mode::Geo => 0,
            Mode::Byzantine => 1,
            Mode::MlBatching => 2,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    /// Accepts the canonical tags plus the dashboard tab ids, case-insensitive.
    ///
    /// ```
    /// use sublyne::Mode;
    ///
    /// assert_eq!("ML".parse::<Mode>().unwrap(), Mode::MlBatching);
    /// assert!("raft".parse::<Mode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geo" => Ok(Mode::Geo),
            "byzantine" => Ok(Mode::Byzantine),
            "ml" | "ml_batching" | "ml-batching" | "mlbatching" => Ok(Mode::MlBatching),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

// ============================================================================
// Log levels
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Randomness and time seams
// ============================================================================

/// Source of uniform draws in [0, 1) consumed by the mode models
///
/// Every random decision a model makes is exactly one call to `unit`, so a
/// scripted source can force any branch.
pub trait Entropy {
    fn unit(&mut self) -> f64;
}

/// Source of the time-of-day stamp placed on each log line
pub trait LogClock {
    fn time_of_day(&self) -> String;
}

// ============================================================================
// Event Logging System
// ============================================================================

/// Events emitted by the engine for debugging and analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    EngineStarted,
    EngineStopped,
    EngineReset,
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    /// Geo model picked a link
    LinkEstablished {
        from: Region,
        to: Region,
        latency_ms: u64,
        /// latency of the same link in the reference matrix
        reference_ms: u64,
    },
    FaultInjected {
        health: u8,
    },
    FaultRecovered {
        health: u8,
    },
    BatchAdjusted {
        from: u32,
        to: u32,
        latency_trend: f64,
    },
    /// Log ring dropped its oldest lines to stay within capacity
    LogEvicted {
        count: usize,
    },
    TickCompleted {
        mode: Mode,
        log_lines: usize,
    },
}

/// Trait for consuming events from the engine
pub trait EventSink {
    fn log(&mut self, tick: TickNumber, event: Event);
}

/// No-op event sink
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _tick: TickNumber, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tags_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.tag().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_accepts_dashboard_ids() {
        assert_eq!("geo".parse::<Mode>().unwrap(), Mode::Geo);
        assert_eq!(" Byzantine ".parse::<Mode>().unwrap(), Mode::Byzantine);
        assert_eq!("ml".parse::<Mode>().unwrap(), Mode::MlBatching);
        assert_eq!("ML-Batching".parse::<Mode>().unwrap(), Mode::MlBatching);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert_eq!(
            "paxos".parse::<Mode>(),
            Err(ConfigError::UnknownMode("paxos".to_string()))
        );
        assert!("".parse::<Mode>().is_err());
    }
}
