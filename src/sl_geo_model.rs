// Geo model: communication latency between validator regions

use crate::sl_geo_matrix::{GeoLatencyMatrix, Region};
use crate::sl_interface::{Entropy, Event, LogLevel, Mode};
use crate::sl_metrics::MetricsState;
use crate::sl_models::{ModeModel, ModelOutcome};

/// The four continents the dashboard validators sit on
pub const GEO_MODEL_REGIONS: [Region; 4] = [
    Region::UsEast,
    Region::EuWest,
    Region::ApNortheast,
    Region::SaEast,
];

pub const LOOPBACK_LATENCY_MS: u64 = 1;
pub const WAN_LATENCY_MIN_MS: u64 = 80;
pub const WAN_LATENCY_SPAN_MS: u64 = 200;

/// Throughput with zero latency; halved latency is subtracted from it
pub const PEAK_THROUGHPUT_VPS: f64 = 580.0;

pub struct GeoModel {
    matrix: GeoLatencyMatrix,
}

impl GeoModel {
    pub fn new() -> Self {
        Self {
            matrix: GeoLatencyMatrix::new(),
        }
    }

    fn pick_region(entropy: &mut dyn Entropy) -> Region {
        let idx = (entropy.unit() * GEO_MODEL_REGIONS.len() as f64).floor() as usize;
        GEO_MODEL_REGIONS[idx.min(GEO_MODEL_REGIONS.len() - 1)]
    }

    /// Throughput for a given link latency. Not clamped.
    pub fn throughput_for(latency_ms: u64) -> i64 {
        (PEAK_THROUGHPUT_VPS - latency_ms as f64 / 2.0).floor() as i64
    }
}

impl Default for GeoModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeModel for GeoModel {
    fn mode(&self) -> Mode {
        Mode::Geo
    }

    fn step(&self, current: &MetricsState, entropy: &mut dyn Entropy) -> ModelOutcome {
        let from = Self::pick_region(entropy);
        let to = Self::pick_region(entropy);

        // the WAN draw only happens for distinct regions
        let latency_ms = if from == to {
            LOOPBACK_LATENCY_MS
        } else {
            (entropy.unit() * WAN_LATENCY_SPAN_MS as f64).floor() as u64 + WAN_LATENCY_MIN_MS
        };

        let next = MetricsState {
            latency_ms: latency_ms as f64,
            throughput_vps: Self::throughput_for(latency_ms),
            ..*current
        };

        ModelOutcome::unchanged(next)
            .with_line(
                format!(
                    "Consensus link established: {} <-> {} ({}ms)",
                    from, to, latency_ms
                ),
                LogLevel::Info,
            )
            .with_event(Event::LinkEstablished {
                from,
                to,
                latency_ms,
                reference_ms: self.matrix.latency_ms(from, to),
            })
    }
}
