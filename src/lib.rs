//! # Sublyne - SciFest dashboard simulation engine
//!
//! Synthetic data behind the Sublyne consensus demo dashboard. Nothing here
//! talks to a network or signs anything: three mode models (geographic
//! latency, Byzantine fault injection, ML-driven batch sizing) advance a small
//! set of metrics on a fixed timer and narrate each change as a log line.
//!
//! ## Core Components
//!
//! - **SimulationEngine**: owns the state, runs the active model on every tick
//! - **TickScheduler**: repeating timer on a virtual clock
//! - **Mode models**: `GeoModel`, `ByzantineModel`, `MlBatchingModel`
//! - **LogRing**: bounded, oldest-first log history shown by the dashboard
//!
//! ## Usage
//!
//! The engine never reads the wall clock to decide when to tick. The caller
//! feeds it elapsed time and reads back the state:
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//! use sublyne::{EngineConfig, Mode, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default()).unwrap();
//! engine.set_mode(Mode::MlBatching);
//! engine.start();
//!
//! let mut last = Instant::now();
//! loop {
//!     std::thread::sleep(engine.time_until_next_tick().unwrap_or(Duration::from_millis(100)));
//!     let now = Instant::now();
//!     engine.advance(now - last);
//!     last = now;
//!
//!     for entry in engine.observe_logs() {
//!         println!("[{}] {} {}", entry.timestamp, entry.level, entry.message);
//!     }
//! }
//! ```
//!
//! ## Testing and Simulation
//!
//! Randomness comes through the `Entropy` trait and timestamps through
//! `LogClock`, so `ScriptedEntropy` and `FixedClock` make any tick
//! reproducible. YAML scenario files (see `sl_scenario`) script whole runs.

// Engine core
pub mod sl_engine;
pub mod sl_interface;
pub mod sl_log_ring;
pub mod sl_metrics;
pub mod sl_scheduler;

// Mode models
pub mod sl_byzantine_model;
pub mod sl_geo_model;
pub mod sl_ml_model;
pub mod sl_models;

// Configuration, sources and reporting
pub mod sl_clock;
pub mod sl_config;
pub mod sl_event_sink;
pub mod sl_forecast;
pub mod sl_geo_matrix;
pub mod sl_scenario;
pub mod sl_stats;

// Re-export commonly used types
pub use sl_config::{parse_seed_hex, ConfigError, EngineConfig};
pub use sl_engine::{SimulationEngine, TickReport};
pub use sl_interface::{Entropy, Event, EventSink, LogClock, LogLevel, Mode, NoOpSink, TickNumber};
pub use sl_log_ring::LogEntry;
pub use sl_metrics::MetricsState;
pub use sl_stats::EngineStats;
