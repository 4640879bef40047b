// Latency forecaster
//
// EWMA over observed latency/throughput plus a normalised slope over the most
// recent latencies. Advisory only: the ML-batching model never reads it, the
// statistics report does.

use std::collections::VecDeque;

use crate::sl_interface::{BATCH_SIZE_MAX, BATCH_SIZE_MIN};

pub const HISTORY_WINDOW: usize = 100;
pub const TREND_WINDOW: usize = 10;
pub const EWMA_ALPHA: f64 = 0.3;

const INITIAL_LATENCY_GUESS: f64 = 50.0;
const INITIAL_THROUGHPUT_GUESS: f64 = 300.0;

// slope thresholds (fraction of the mean per sample)
const RISING_TREND: f64 = 0.1;
const FALLING_TREND: f64 = -0.05;

#[derive(Debug, Clone)]
pub struct LatencyForecaster {
    history: VecDeque<(f64, f64)>,
    predicted_latency: f64,
    predicted_throughput: f64,
}

impl Default for LatencyForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyForecaster {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_WINDOW),
            predicted_latency: INITIAL_LATENCY_GUESS,
            predicted_throughput: INITIAL_THROUGHPUT_GUESS,
        }
    }

    pub fn observe(&mut self, latency_ms: f64, throughput_vps: f64) {
        self.history.push_back((latency_ms, throughput_vps));
        if self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }

        self.predicted_latency =
            EWMA_ALPHA * latency_ms + (1.0 - EWMA_ALPHA) * self.predicted_latency;
        self.predicted_throughput =
            EWMA_ALPHA * throughput_vps + (1.0 - EWMA_ALPHA) * self.predicted_throughput;
    }

    /// (latency ms, throughput vps)
    pub fn predictions(&self) -> (f64, f64) {
        (self.predicted_latency, self.predicted_throughput)
    }

    pub fn samples(&self) -> usize {
        self.history.len()
    }

    /// Normalised slope of the latest latencies, oldest to newest
    pub fn latency_trend(&self) -> f64 {
        let skip = self.history.len().saturating_sub(TREND_WINDOW);
        let recent: Vec<f64> = self.history.iter().skip(skip).map(|(l, _)| *l).collect();
        compute_trend(&recent)
    }

    /// Batch size suggested for `current` given the latency trend
    ///
    /// Needs a full trend window; before that `current` is returned as is.
    pub fn suggest_batch_size(&self, current: u32) -> u32 {
        if self.history.len() < TREND_WINDOW {
            return current;
        }

        let trend = self.latency_trend();
        let next = if trend > RISING_TREND {
            (current as f64 * 0.8) as u32
        } else if trend < FALLING_TREND {
            (current as f64 * 1.1) as u32
        } else {
            current
        };
        next.clamp(BATCH_SIZE_MIN, BATCH_SIZE_MAX)
    }
}

/// Least-squares slope divided by the mean (positive = rising)
pub fn compute_trend(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean).powi(2);
    }

    if denominator == 0.0 || y_mean == 0.0 {
        return 0.0;
    }
    numerator / denominator / y_mean
}
