// Byzantine model: fault injection against validator 0

use crate::sl_interface::{Entropy, Event, LogLevel, Mode, FAULT_PROBABILITY};
use crate::sl_metrics::MetricsState;
use crate::sl_models::{ModeModel, ModelOutcome};

pub const FAULT_HEALTH_PENALTY: i16 = 5;
pub const RECOVERY_HEALTH_GAIN: i16 = 2;

pub const FAULT_MESSAGE: &str = "BYZANTINE ALERT: Validator 0 dropped proposal packet!";
pub const RECOVERY_MESSAGE: &str = "Fault recovery protocol active. Quorum maintained.";

pub struct ByzantineModel {
    fault_probability: f64,
}

impl ByzantineModel {
    pub fn new(fault_probability: f64) -> Self {
        Self { fault_probability }
    }
}

impl Default for ByzantineModel {
    fn default() -> Self {
        Self::new(FAULT_PROBABILITY)
    }
}

impl ModeModel for ByzantineModel {
    fn mode(&self) -> Mode {
        Mode::Byzantine
    }

    fn step(&self, current: &MetricsState, entropy: &mut dyn Entropy) -> ModelOutcome {
        if entropy.unit() < self.fault_probability {
            let health = current.shifted_health(-FAULT_HEALTH_PENALTY);
            ModelOutcome::unchanged(MetricsState {
                health_percent: health,
                ..*current
            })
            .with_line(FAULT_MESSAGE.to_string(), LogLevel::Error)
            .with_event(Event::FaultInjected { health })
        } else {
            let health = current.shifted_health(RECOVERY_HEALTH_GAIN);
            ModelOutcome::unchanged(MetricsState {
                health_percent: health,
                ..*current
            })
            .with_line(RECOVERY_MESSAGE.to_string(), LogLevel::Success)
            .with_event(Event::FaultRecovered { health })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sl_clock::ScriptedEntropy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fault_branch() {
        let model = ByzantineModel::default();
        let mut entropy = ScriptedEntropy::new([0.1]);
        let out = model.step(&MetricsState::default(), &mut entropy);

        assert_eq!(out.metrics.health_percent, 95);
        assert_eq!(out.lines, vec![(FAULT_MESSAGE.to_string(), LogLevel::Error)]);
        assert_eq!(out.events, vec![Event::FaultInjected { health: 95 }]);
    }

    #[test]
    fn test_recovery_branch_caps_at_hundred() {
        let model = ByzantineModel::default();
        let mut entropy = ScriptedEntropy::new([0.3]);
        let out = model.step(&MetricsState::default(), &mut entropy);

        assert_eq!(out.metrics.health_percent, 100);
        assert_eq!(out.lines[0].1, LogLevel::Success);
    }

    #[test]
    fn test_fault_floor() {
        let model = ByzantineModel::default();
        let current = MetricsState {
            health_percent: 73,
            ..Default::default()
        };
        let mut entropy = ScriptedEntropy::new([0.0, 0.0]);
        let once = model.step(&current, &mut entropy);
        assert_eq!(once.metrics.health_percent, 70);
        let twice = model.step(&once.metrics, &mut entropy);
        assert_eq!(twice.metrics.health_percent, 70);
    }

    #[test]
    fn test_only_health_changes() {
        let model = ByzantineModel::default();
        let current = MetricsState {
            throughput_vps: 510,
            latency_ms: 140.0,
            batch_size: 200,
            health_percent: 90,
        };
        let mut rng = StdRng::from_seed([5u8; 32]);
        let out = model.step(&current, &mut rng);
        assert_eq!(out.metrics.throughput_vps, 510);
        assert_eq!(out.metrics.latency_ms, 140.0);
        assert_eq!(out.metrics.batch_size, 200);
    }

    #[test]
    fn test_random_ticks_stay_in_bounds() {
        let model = ByzantineModel::default();
        let mut rng = StdRng::from_seed([9u8; 32]);
        let mut metrics = MetricsState::default();
        let mut faults = 0;
        for _ in 0..1000 {
            let out = model.step(&metrics, &mut rng);
            let delta = out.metrics.health_percent as i16 - metrics.health_percent as i16;
            assert!(delta.abs() <= 5);
            assert!((70..=100).contains(&out.metrics.health_percent));
            if out.lines[0].1 == LogLevel::Error {
                faults += 1;
            }
            metrics = out.metrics;
        }
        assert!(faults > 200 && faults < 400, "faults {}", faults);
    }

    #[test]
    fn test_zero_probability_never_faults() {
        let model = ByzantineModel::new(0.0);
        let mut entropy = ScriptedEntropy::new([0.0]);
        let out = model.step(&MetricsState::default(), &mut entropy);
        assert_eq!(out.lines[0].1, LogLevel::Success);
    }
}
