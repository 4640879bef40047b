use serde::Serialize;

use crate::sl_interface::{
    BATCH_SIZE_INITIAL, BATCH_SIZE_MAX, BATCH_SIZE_MIN, HEALTH_MAX, HEALTH_MIN,
};

/// Current simulated values shown on the dashboard
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct MetricsState {
    /// Virtual transactions per second. Written raw by the Geo model.
    pub throughput_vps: i64,
    pub latency_ms: f64,
    /// Always within [10, 1000]
    pub batch_size: u32,
    /// Always within [70, 100]
    pub health_percent: u8,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            throughput_vps: 0,
            latency_ms: 0.0,
            batch_size: BATCH_SIZE_INITIAL,
            health_percent: HEALTH_MAX,
        }
    }
}

impl MetricsState {
    /// Batch size moved by `delta` and clamped to its range
    pub fn shifted_batch_size(&self, delta: i64) -> u32 {
        (self.batch_size as i64 + delta).clamp(BATCH_SIZE_MIN as i64, BATCH_SIZE_MAX as i64) as u32
    }

    /// Health moved by `delta` and clamped to its range
    pub fn shifted_health(&self, delta: i16) -> u8 {
        (self.health_percent as i16 + delta).clamp(HEALTH_MIN as i16, HEALTH_MAX as i16) as u8
    }

    pub fn within_bounds(&self) -> bool {
        (BATCH_SIZE_MIN..=BATCH_SIZE_MAX).contains(&self.batch_size)
            && (HEALTH_MIN..=HEALTH_MAX).contains(&self.health_percent)
            && self.latency_ms >= 0.0
    }
}

/// Holder of the metrics observed between ticks
///
/// Only the engine replaces the value, once per tick, so observers never see
/// a half-applied update.
#[derive(Debug, Default, Clone)]
pub struct MetricsStore {
    current: MetricsState,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> MetricsState {
        self.current
    }

    pub(crate) fn replace(&mut self, next: MetricsState) {
        self.current = next;
    }
}
