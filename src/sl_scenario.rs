// Scenario files
//
// A scenario is a YAML script of engine operations run against a seeded
// engine, with optional expectations checked along the way:
//
//   meta:
//     name: Byzantine storm
//   config:
//     initial_mode: byzantine
//     seed: "0x2a"
//   steps:
//     - action: start
//     - action: advance
//       ms: 30000
//     - action: expect
//       log_len: 16

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sl_config::{ConfigError, ConfigOverrides, EngineConfig};
use crate::sl_engine::SimulationEngine;
use crate::sl_interface::{EventSink, Mode, TickNumber};
use crate::sl_log_ring::LogEntry;
use crate::sl_metrics::MetricsState;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("step {step}: {detail}")]
    ExpectationFailed { step: usize, detail: String },
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ScenarioMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One operation on the engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    Start,
    Stop,
    Reset,
    /// Run one tick immediately (ignored while stopped)
    Tick,
    SetMode {
        mode: String,
    },
    /// Feed virtual time to the timer
    Advance {
        ms: u64,
    },
    Expect {
        #[serde(default)]
        log_len: Option<usize>,
        #[serde(default)]
        running: Option<bool>,
        #[serde(default)]
        mode: Option<String>,
        #[serde(default)]
        ticks: Option<u64>,
        #[serde(default)]
        min_health: Option<u8>,
        #[serde(default)]
        max_health: Option<u8>,
        #[serde(default)]
        last_log_contains: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub meta: ScenarioMeta,

    #[serde(default)]
    pub config: ConfigOverrides,

    pub steps: Vec<ScenarioStep>,
}

/// Final engine state after a scenario ran
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub seed: Option<String>,
    pub ticks: TickNumber,
    pub mode: Mode,
    pub running: bool,
    pub metrics: MetricsState,
    pub logs: Vec<LogEntry>,
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let yaml = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn display_name(&self) -> String {
        self.meta
            .name
            .clone()
            .unwrap_or_else(|| "unnamed scenario".to_string())
    }

    /// Engine configured by this scenario; `seed` overrides the file's seed
    pub fn build_engine(&self, seed: Option<[u8; 32]>) -> Result<SimulationEngine, ScenarioError> {
        let mut config = EngineConfig::default();
        config.apply(&self.config)?;
        if seed.is_some() {
            config.seed = seed;
        }
        Ok(SimulationEngine::new(config)?)
    }

    pub fn run(
        &self,
        seed: Option<[u8; 32]>,
        event_sink: Box<dyn EventSink>,
    ) -> Result<ScenarioOutcome, ScenarioError> {
        let mut engine = self.build_engine(seed)?;
        engine.set_event_sink(event_sink);
        self.execute(&mut engine)?;

        Ok(ScenarioOutcome {
            name: self.display_name(),
            seed: engine.seed_used().map(|s| crate::sl_config::seed_to_hex(&s)),
            ticks: engine.tick_count(),
            mode: engine.mode(),
            running: engine.is_running(),
            metrics: engine.observe_metrics(),
            logs: engine.observe_logs(),
        })
    }

    /// Apply every step to `engine`, stopping at the first failed expectation
    pub fn execute(&self, engine: &mut SimulationEngine) -> Result<(), ScenarioError> {
        for (i, step) in self.steps.iter().enumerate() {
            let step_no = i + 1;
            match step {
                ScenarioStep::Start => engine.start(),
                ScenarioStep::Stop => engine.stop(),
                ScenarioStep::Reset => engine.reset(),
                ScenarioStep::Tick => {
                    engine.tick();
                }
                ScenarioStep::SetMode { mode } => engine.set_mode_tag(mode)?,
                ScenarioStep::Advance { ms } => {
                    engine.advance(Duration::from_millis(*ms));
                }
                ScenarioStep::Expect {
                    log_len,
                    running,
                    mode,
                    ticks,
                    min_health,
                    max_health,
                    last_log_contains,
                } => {
                    let fail = |detail: String| ScenarioError::ExpectationFailed {
                        step: step_no,
                        detail,
                    };
                    let metrics = engine.observe_metrics();
                    let logs = engine.observe_logs();

                    if let Some(expected) = log_len {
                        if logs.len() != *expected {
                            return Err(fail(format!(
                                "expected {} log line(s), found {}",
                                expected,
                                logs.len()
                            )));
                        }
                    }
                    if let Some(expected) = running {
                        if engine.is_running() != *expected {
                            return Err(fail(format!(
                                "expected running={}, found {}",
                                expected,
                                engine.is_running()
                            )));
                        }
                    }
                    if let Some(tag) = mode {
                        let expected: Mode = tag.parse()?;
                        if engine.mode() != expected {
                            return Err(fail(format!(
                                "expected mode {}, found {}",
                                expected,
                                engine.mode()
                            )));
                        }
                    }
                    if let Some(expected) = ticks {
                        if engine.tick_count() != *expected {
                            return Err(fail(format!(
                                "expected {} tick(s), found {}",
                                expected,
                                engine.tick_count()
                            )));
                        }
                    }
                    if let Some(min) = min_health {
                        if metrics.health_percent < *min {
                            return Err(fail(format!(
                                "health {}% below {}%",
                                metrics.health_percent, min
                            )));
                        }
                    }
                    if let Some(max) = max_health {
                        if metrics.health_percent > *max {
                            return Err(fail(format!(
                                "health {}% above {}%",
                                metrics.health_percent, max
                            )));
                        }
                    }
                    if let Some(needle) = last_log_contains {
                        let last = logs.last().map(|e| e.message.as_str()).unwrap_or("");
                        if !last.contains(needle.as_str()) {
                            return Err(fail(format!(
                                "last log line {:?} does not contain {:?}",
                                last, needle
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
