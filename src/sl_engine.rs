use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sl_clock::WallClock;
use crate::sl_config::{ConfigError, EngineConfig};
use crate::sl_interface::{Entropy, Event, EventSink, LogClock, Mode, NoOpSink, TickNumber};
use crate::sl_log_ring::{LogEntry, LogRing};
use crate::sl_metrics::{MetricsState, MetricsStore};
use crate::sl_models::{ModelOutcome, ModelSet};
use crate::sl_scheduler::TickScheduler;
use crate::sl_stats::EngineStats;

/// Result of one completed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: TickNumber,
    pub mode: Mode,
    pub metrics: MetricsState,
    pub lines_appended: usize,
    pub lines_evicted: usize,
}

/// Tick-driven multi-mode simulation engine
///
/// Owns the metrics, the log ring and the timer. Driven by a single caller:
/// `start`/`stop` toggle the timer, `advance` feeds it elapsed time, and the
/// `observe_*` methods read the state left by the last completed tick.
///
/// ```
/// use std::time::Duration;
/// use sublyne::{EngineConfig, Mode, SimulationEngine};
///
/// let config = EngineConfig {
///     seed: Some([1u8; 32]),
///     ..Default::default()
/// };
/// let mut engine = SimulationEngine::new(config).unwrap();
/// engine.set_mode(Mode::Byzantine);
/// engine.start();
///
/// assert_eq!(engine.advance(Duration::from_millis(4500)), 3);
/// assert_eq!(engine.observe_logs().len(), 3);
///
/// engine.stop();
/// assert_eq!(engine.advance(Duration::from_secs(60)), 0);
/// ```
pub struct SimulationEngine {
    config: EngineConfig,
    seed_used: Option<[u8; 32]>,
    mode: Mode,
    running: bool,
    tick: TickNumber,
    metrics: MetricsStore,
    logs: LogRing,
    models: ModelSet,
    scheduler: TickScheduler,
    entropy: Box<dyn Entropy>,
    clock: Box<dyn LogClock>,
    event_sink: Box<dyn EventSink>,
    stats: EngineStats,
}

impl SimulationEngine {
    /// Engine seeded from `config.seed`, or from a fresh random seed
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            rand::thread_rng().fill(&mut seed);
            seed
        });

        let mut engine = Self::with_sources(
            config,
            Box::new(StdRng::from_seed(seed)),
            Box::new(WallClock),
        )?;
        engine.seed_used = Some(seed);
        Ok(engine)
    }

    /// Engine with caller-provided randomness and timestamps
    pub fn with_sources(
        config: EngineConfig,
        entropy: Box<dyn Entropy>,
        clock: Box<dyn LogClock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            seed_used: None,
            mode: config.initial_mode,
            running: false,
            tick: 0,
            metrics: MetricsStore::new(),
            logs: LogRing::new(config.log_capacity),
            models: ModelSet::new(config.fault_probability),
            scheduler: TickScheduler::new(config.tick_interval),
            entropy,
            clock,
            event_sink: Box::new(NoOpSink),
            stats: EngineStats::new(),
            config,
        })
    }

    pub fn with_sink(mut self, event_sink: Box<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn set_event_sink(&mut self, event_sink: Box<dyn EventSink>) {
        self.event_sink = event_sink;
    }

    // ------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.scheduler.arm();
        info!(
            "simulation started in {} mode, tick every {:?}",
            self.mode,
            self.scheduler.interval()
        );
        self.emit(Event::EngineStarted);
    }

    /// Halt ticking; metrics and logs are kept
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.disarm();
        info!("simulation stopped after {} tick(s)", self.tick);
        self.emit(Event::EngineStopped);
    }

    /// Select the model used from the next tick on
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        let from = self.mode;
        self.mode = mode;
        if self.running && self.config.restart_cadence_on_mode_change {
            self.scheduler.rearm();
        }
        info!("mode changed {} -> {}", from, mode);
        self.emit(Event::ModeChanged { from, to: mode });
    }

    /// Select the model by tag; unknown tags leave the mode untouched
    pub fn set_mode_tag(&mut self, tag: &str) -> Result<(), ConfigError> {
        let mode = tag.parse::<Mode>().map_err(|e| {
            warn!("rejected mode tag {:?}", tag);
            e
        })?;
        self.set_mode(mode);
        Ok(())
    }

    /// Stop and return to the initial metrics with an empty log
    pub fn reset(&mut self) {
        self.running = false;
        self.scheduler.disarm();
        self.metrics.replace(MetricsState::default());
        self.logs.clear();
        self.stats = EngineStats::new();
        self.tick = 0;
        info!("simulation reset");
        self.emit(Event::EngineReset);
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Feed elapsed time to the timer and run every tick that falls due
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.running {
            return 0;
        }

        let due = self.scheduler.advance(elapsed);
        for _ in 0..due {
            self.run_tick();
        }
        due
    }

    /// Run one tick right away; does nothing while stopped
    ///
    /// Does not move the timer.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        Some(self.run_tick())
    }

    fn run_tick(&mut self) -> TickReport {
        self.tick += 1;
        let mode = self.mode;
        let current = self.metrics.read();

        let ModelOutcome {
            metrics: next,
            lines,
            events,
        } = self
            .models
            .get(mode)
            .step(&current, self.entropy.as_mut());

        let lines_appended = lines.len();
        let mut lines_evicted = 0;
        for (message, level) in lines {
            lines_evicted += self.logs.append(self.clock.as_ref(), message, level);
        }
        self.metrics.replace(next);
        self.stats.record_metrics(&next);

        debug!(
            "tick {} [{}] tps:{} lat:{:.1} batch:{} health:{} lines:{}",
            self.tick,
            mode,
            next.throughput_vps,
            next.latency_ms,
            next.batch_size,
            next.health_percent,
            lines_appended
        );

        for event in events {
            self.emit(event);
        }
        if lines_evicted > 0 {
            self.emit(Event::LogEvicted {
                count: lines_evicted,
            });
        }
        self.emit(Event::TickCompleted {
            mode,
            log_lines: lines_appended,
        });

        TickReport {
            tick: self.tick,
            mode,
            metrics: next,
            lines_appended,
            lines_evicted,
        }
    }

    fn emit(&mut self, event: Event) {
        self.stats.record_event(self.tick, &event);
        self.event_sink.log(self.tick, event);
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn observe_metrics(&self) -> MetricsState {
        self.metrics.read()
    }

    /// Retained log lines, oldest first
    pub fn observe_logs(&self) -> Vec<LogEntry> {
        self.logs.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tick_count(&self) -> TickNumber {
        self.tick
    }

    /// Time left before the timer fires, `None` while stopped
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed of the internal generator, `None` for caller-provided entropy
    pub fn seed_used(&self) -> Option<[u8; 32]> {
        self.seed_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sl_clock::{FixedClock, ScriptedEntropy};
    use crate::sl_event_sink::CollectingSink;
    use crate::sl_interface::LogLevel;

    const INTERVAL: Duration = Duration::from_millis(1500);

    fn scripted_engine(script: Vec<f64>) -> SimulationEngine {
        SimulationEngine::with_sources(
            EngineConfig::default(),
            Box::new(ScriptedEntropy::new(script)),
            Box::new(FixedClock::new("10:00:00")),
        )
        .unwrap()
    }

    fn seeded_engine(seed: u8) -> SimulationEngine {
        SimulationEngine::new(EngineConfig {
            seed: Some([seed; 32]),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let engine = seeded_engine(1);
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Geo);
        assert_eq!(engine.observe_metrics(), MetricsState::default());
        assert!(engine.observe_logs().is_empty());
        assert_eq!(engine.time_until_next_tick(), None);
        assert_eq!(engine.seed_used(), Some([1u8; 32]));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            log_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            SimulationEngine::new(config),
            Err(ConfigError::ZeroLogCapacity)
        ));
    }

    #[test]
    fn test_byzantine_fault_scenario() {
        let mut engine = scripted_engine(vec![0.1]);
        engine.set_mode(Mode::Byzantine);
        engine.start();
        assert_eq!(engine.advance(INTERVAL), 1);

        assert_eq!(engine.observe_metrics().health_percent, 95);
        let logs = engine.observe_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Error);
        assert!(logs[0].message.contains("BYZANTINE ALERT"));
        assert_eq!(logs[0].timestamp, "10:00:00");
    }

    #[test]
    fn test_geo_loopback_scenario() {
        let mut engine = scripted_engine(vec![0.5, 0.6]);
        engine.set_mode(Mode::Geo);
        engine.start();
        assert_eq!(engine.advance(INTERVAL), 1);

        let metrics = engine.observe_metrics();
        assert_eq!(metrics.latency_ms, 1.0);
        assert_eq!(metrics.throughput_vps, 579);
        let logs = engine.observe_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Info);
        assert!(logs[0].message.contains("<->"));
        assert!(logs[0].message.contains("(1ms)"));
    }

    #[test]
    fn test_no_tick_before_interval() {
        let mut engine = seeded_engine(2);
        engine.start();
        assert_eq!(engine.advance(Duration::from_millis(1499)), 0);
        assert!(engine.observe_logs().is_empty());
        assert_eq!(engine.advance(Duration::from_millis(1)), 1);
        assert_eq!(engine.observe_logs().len(), 1);
    }

    #[test]
    fn test_stop_prevents_further_ticks() {
        let mut engine = seeded_engine(3);
        engine.start();
        engine.advance(INTERVAL * 3);
        engine.stop();

        let metrics = engine.observe_metrics();
        let logs = engine.observe_logs();
        assert_eq!(engine.advance(INTERVAL * 10), 0);
        assert!(engine.tick().is_none());
        assert_eq!(engine.observe_metrics(), metrics);
        assert_eq!(engine.observe_logs(), logs);
        assert_eq!(engine.tick_count(), 3);
    }

    #[test]
    fn test_stop_mid_interval_discards_progress() {
        let mut engine = seeded_engine(4);
        engine.start();
        engine.advance(Duration::from_millis(1400));
        engine.stop();
        engine.start();
        assert_eq!(engine.advance(Duration::from_millis(200)), 0);
        assert_eq!(engine.advance(Duration::from_millis(1300)), 1);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let sink = CollectingSink::new();
        let records = sink.records();
        let mut engine = seeded_engine(5).with_sink(Box::new(sink));

        engine.start();
        engine.advance(Duration::from_millis(1000));
        engine.start();
        assert_eq!(engine.time_until_next_tick(), Some(Duration::from_millis(500)));
        engine.stop();
        engine.stop();

        let events: Vec<Event> = records.borrow().iter().map(|(_, e)| e.clone()).collect();
        assert_eq!(events, vec![Event::EngineStarted, Event::EngineStopped]);
    }

    #[test]
    fn test_twenty_ticks_fill_ring_to_capacity() {
        for mode in [Mode::Geo, Mode::Byzantine] {
            let mut engine = seeded_engine(6);
            engine.set_mode(mode);
            engine.start();
            assert_eq!(engine.advance(INTERVAL * 20), 20);
            assert_eq!(engine.observe_logs().len(), 16);
            assert_eq!(engine.stats().lines_appended, 20);
            assert_eq!(engine.stats().lines_evicted, 4);
        }
    }

    #[test]
    fn test_ml_ring_length_matches_emitting_ticks() {
        let mut engine = seeded_engine(7);
        engine.set_mode(Mode::MlBatching);
        engine.start();

        let mut emitting = 0;
        for _ in 0..20 {
            let report = engine.tick().unwrap();
            if report.lines_appended > 0 {
                emitting += 1;
            }
            let m = report.metrics;
            assert!((10..=1000).contains(&m.batch_size));
            assert!(m.latency_ms >= 50.0);
        }
        assert_eq!(engine.observe_logs().len(), emitting.min(16));
    }

    #[test]
    fn test_mode_switch_keeps_cadence() {
        let mut engine = scripted_engine(vec![]);
        engine.start();
        engine.advance(Duration::from_millis(1000));
        engine.set_mode(Mode::Byzantine);
        assert_eq!(engine.time_until_next_tick(), Some(Duration::from_millis(500)));

        assert_eq!(engine.advance(Duration::from_millis(500)), 1);
        let logs = engine.observe_logs();
        assert_eq!(logs.len(), 1);
        assert!(matches!(logs[0].level, LogLevel::Error | LogLevel::Success));
        assert_eq!(engine.stats().ticks_in(Mode::Byzantine), 1);
        assert_eq!(engine.stats().ticks_in(Mode::Geo), 0);
    }

    #[test]
    fn test_mode_switch_can_restart_cadence() {
        let config = EngineConfig {
            restart_cadence_on_mode_change: true,
            seed: Some([8u8; 32]),
            ..Default::default()
        };
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.start();
        engine.advance(Duration::from_millis(1000));
        engine.set_mode(Mode::MlBatching);
        assert_eq!(engine.time_until_next_tick(), Some(INTERVAL));
        assert_eq!(engine.advance(Duration::from_millis(500)), 0);
    }

    #[test]
    fn test_mode_switch_does_not_touch_past_logs() {
        let mut engine = scripted_engine(vec![0.0, 0.0]);
        engine.start();
        engine.tick();
        let before = engine.observe_logs();
        engine.set_mode(Mode::MlBatching);
        assert_eq!(engine.observe_logs(), before);
    }

    #[test]
    fn test_unknown_mode_tag_fails_fast() {
        let mut engine = seeded_engine(9);
        engine.set_mode(Mode::Byzantine);
        assert_eq!(
            engine.set_mode_tag("tendermint"),
            Err(ConfigError::UnknownMode("tendermint".to_string()))
        );
        assert_eq!(engine.mode(), Mode::Byzantine);

        assert!(engine.set_mode_tag("ml").is_ok());
        assert_eq!(engine.mode(), Mode::MlBatching);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u8| {
            let mut engine = seeded_engine(seed);
            engine.start();
            for mode in Mode::ALL {
                engine.set_mode(mode);
                engine.advance(INTERVAL * 7);
            }
            let messages: Vec<String> = engine
                .observe_logs()
                .into_iter()
                .map(|e| e.message)
                .collect();
            (engine.observe_metrics(), messages)
        };

        assert_eq!(run(10), run(10));
    }

    #[test]
    fn test_metrics_stay_in_bounds_across_modes() {
        let mut engine = seeded_engine(11);
        engine.start();
        for round in 0..300 {
            engine.set_mode(Mode::ALL[round % 3]);
            let report = engine.tick().unwrap();
            assert!(report.metrics.within_bounds());
            assert!(engine.observe_logs().len() <= 16);
        }
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = seeded_engine(12);
        engine.set_mode(Mode::Byzantine);
        engine.start();
        engine.advance(INTERVAL * 5);
        engine.reset();

        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Byzantine);
        assert_eq!(engine.observe_metrics(), MetricsState::default());
        assert!(engine.observe_logs().is_empty());
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.stats().ticks_total, 0);
        assert_eq!(engine.advance(INTERVAL * 5), 0);
    }

    #[test]
    fn test_events_reach_sink_in_order() {
        let sink = CollectingSink::new();
        let records = sink.records();
        let mut engine = scripted_engine(vec![0.1]).with_sink(Box::new(sink));
        engine.set_mode(Mode::Byzantine);
        engine.start();
        engine.advance(INTERVAL);

        let events = records.borrow();
        assert_eq!(
            events.as_slice(),
            &[
                (
                    0,
                    Event::ModeChanged {
                        from: Mode::Geo,
                        to: Mode::Byzantine
                    }
                ),
                (0, Event::EngineStarted),
                (1, Event::FaultInjected { health: 95 }),
                (
                    1,
                    Event::TickCompleted {
                        mode: Mode::Byzantine,
                        log_lines: 1
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_custom_capacity() {
        let config = EngineConfig {
            log_capacity: 3,
            seed: Some([13u8; 32]),
            ..Default::default()
        };
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.start();
        engine.advance(INTERVAL * 10);
        assert_eq!(engine.observe_logs().len(), 3);
    }
}
