// ML-batching model: batch size steered by the latency trend
//
// The trend is the stored latency itself, jittered each tick. There is no
// separate trend variable.

use crate::sl_interface::{Entropy, Event, LogLevel, Mode};
use crate::sl_metrics::MetricsState;
use crate::sl_models::{ModeModel, ModelOutcome};

pub const LATENCY_JITTER_MS: f64 = 10.0;
pub const LATENCY_THRESHOLD_MS: f64 = 150.0;
pub const LATENCY_FLOOR_MS: f64 = 50.0;

pub const BATCH_SHRINK: i64 = -5;
pub const BATCH_GROW: i64 = 2;

pub struct MlBatchingModel;

impl MlBatchingModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MlBatchingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeModel for MlBatchingModel {
    fn mode(&self) -> Mode {
        Mode::MlBatching
    }

    fn step(&self, current: &MetricsState, entropy: &mut dyn Entropy) -> ModelOutcome {
        let jitter = entropy.unit() * 2.0 * LATENCY_JITTER_MS - LATENCY_JITTER_MS;
        let trial = current.latency_ms + jitter;

        let batch_size = if trial > LATENCY_THRESHOLD_MS {
            current.shifted_batch_size(BATCH_SHRINK)
        } else {
            current.shifted_batch_size(BATCH_GROW)
        };

        let outcome = ModelOutcome::unchanged(MetricsState {
            latency_ms: trial.max(LATENCY_FLOOR_MS),
            batch_size,
            ..*current
        });

        if batch_size == current.batch_size {
            return outcome;
        }

        // the line reports the trial latency before the floor is applied
        outcome
            .with_line(
                format!(
                    "ML Predictor: Adjusting batch size to {} (Latency Trend: {:.1}ms)",
                    batch_size, trial
                ),
                LogLevel::Warning,
            )
            .with_event(Event::BatchAdjusted {
                from: current.batch_size,
                to: batch_size,
                latency_trend: trial,
            })
    }
}
