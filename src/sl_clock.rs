// Timestamp and randomness sources

use std::collections::VecDeque;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sl_interface::{Entropy, LogClock};

/// Local wall clock, formatted as `HH:MM:SS`
pub struct WallClock;

impl LogClock for WallClock {
    fn time_of_day(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

/// Clock that always reports the same time of day
pub struct FixedClock {
    time: String,
}

impl FixedClock {
    pub fn new(time: impl Into<String>) -> Self {
        Self { time: time.into() }
    }
}

impl LogClock for FixedClock {
    fn time_of_day(&self) -> String {
        self.time.clone()
    }
}

impl Entropy for StdRng {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays queued draws, then falls back to a seeded generator
///
/// Used to force specific model branches:
///
/// ```
/// use sublyne::sl_clock::ScriptedEntropy;
/// use sublyne::Entropy;
///
/// let mut entropy = ScriptedEntropy::new([0.1, 0.9]);
/// assert_eq!(entropy.unit(), 0.1);
/// assert_eq!(entropy.unit(), 0.9);
/// assert!((0.0..1.0).contains(&entropy.unit()));
/// ```
pub struct ScriptedEntropy {
    script: VecDeque<f64>,
    fallback: StdRng,
}

impl ScriptedEntropy {
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: StdRng::from_seed([7u8; 32]),
        }
    }

    pub fn push(&mut self, value: f64) {
        self.script.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Entropy for ScriptedEntropy {
    fn unit(&mut self) -> f64 {
        match self.script.pop_front() {
            // keep scripted draws inside [0, 1)
            Some(v) => v.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.fallback.gen::<f64>(),
        }
    }
}
