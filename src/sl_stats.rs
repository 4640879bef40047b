// Engine statistics

use crate::sl_forecast::LatencyForecaster;
use crate::sl_interface::{Event, Mode, TickNumber, HEALTH_MAX};
use crate::sl_metrics::MetricsState;

/// Counters gathered while the engine runs
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub ticks_total: u64,
    /// Indexed by `Mode::index`
    pub ticks_by_mode: [u64; 3],
    pub lines_appended: u64,
    pub lines_evicted: u64,

    pub links_established: u64,
    pub loopback_links: u64,
    /// Sum of |synthetic - reference| over WAN links
    pub link_deviation_ms: u64,

    pub faults_injected: u64,
    pub recoveries: u64,
    /// Ticks from each health drop below 100 back to 100
    pub recovery_spans: Vec<u64>,
    degraded_since: Option<TickNumber>,

    pub batch_adjustments: u64,

    pub forecaster: LatencyForecaster,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks_in(&self, mode: Mode) -> u64 {
        self.ticks_by_mode[mode.index()]
    }

    pub(crate) fn record_event(&mut self, tick: TickNumber, event: &Event) {
        match *event {
            Event::LinkEstablished {
                from,
                to,
                latency_ms,
                reference_ms,
            } => {
                self.links_established += 1;
                if from == to {
                    self.loopback_links += 1;
                } else {
                    self.link_deviation_ms += latency_ms.abs_diff(reference_ms);
                }
            }
            Event::FaultInjected { .. } => {
                self.faults_injected += 1;
                if self.degraded_since.is_none() {
                    self.degraded_since = Some(tick);
                }
            }
            Event::FaultRecovered { health } => {
                self.recoveries += 1;
                if health == HEALTH_MAX {
                    if let Some(start) = self.degraded_since.take() {
                        self.recovery_spans.push(tick - start);
                    }
                }
            }
            Event::BatchAdjusted { .. } => self.batch_adjustments += 1,
            Event::LogEvicted { count } => self.lines_evicted += count as u64,
            Event::TickCompleted { mode, log_lines } => {
                self.ticks_total += 1;
                self.ticks_by_mode[mode.index()] += 1;
                self.lines_appended += log_lines as u64;
            }
            Event::EngineStarted
            | Event::EngineStopped
            | Event::EngineReset
            | Event::ModeChanged { .. } => {}
        }
    }

    pub(crate) fn record_metrics(&mut self, metrics: &MetricsState) {
        self.forecaster
            .observe(metrics.latency_ms, metrics.throughput_vps as f64);
    }

    /// Mean ticks to get back to full health after a fault
    pub fn mean_recovery_ticks(&self) -> Option<f64> {
        if self.recovery_spans.is_empty() {
            return None;
        }
        Some(self.recovery_spans.iter().sum::<u64>() as f64 / self.recovery_spans.len() as f64)
    }

    pub fn mean_link_deviation_ms(&self) -> Option<f64> {
        let wan = self.links_established - self.loopback_links;
        if wan == 0 {
            return None;
        }
        Some(self.link_deviation_ms as f64 / wan as f64)
    }

    pub fn summary(&self, metrics: &MetricsState) -> String {
        let (predicted_latency, predicted_throughput) = self.forecaster.predictions();
        let mttr = self
            .mean_recovery_ticks()
            .map(|v| format!("{:.1} ticks", v))
            .unwrap_or_else(|| "n/a".to_string());
        let deviation = self
            .mean_link_deviation_ms()
            .map(|v| format!("{:.1}ms", v))
            .unwrap_or_else(|| "n/a".to_string());

        format!(
            "Ticks: {} (geo {}, byzantine {}, ml {})\n\
             Log lines: {} appended, {} evicted\n\
             Links: {} ({} loopback), mean deviation from reference: {}\n\
             Faults: {} injected, {} recoveries, MTTR {}\n\
             Batch adjustments: {}\n\
             Final metrics: {} VPS, {:.0}ms, batch {}, health {}%\n\
             Forecast: {:.1}ms / {:.0} VPS, advisory batch {}",
            self.ticks_total,
            self.ticks_in(Mode::Geo),
            self.ticks_in(Mode::Byzantine),
            self.ticks_in(Mode::MlBatching),
            self.lines_appended,
            self.lines_evicted,
            self.links_established,
            self.loopback_links,
            deviation,
            self.faults_injected,
            self.recoveries,
            mttr,
            self.batch_adjustments,
            metrics.throughput_vps,
            metrics.latency_ms,
            metrics.batch_size,
            metrics.health_percent,
            predicted_latency,
            predicted_throughput,
            self.forecaster.suggest_batch_size(metrics.batch_size),
        )
    }

    pub fn print_summary(&self, metrics: &MetricsState) {
        println!("\n=== Simulation Summary ===");
        println!("{}", self.summary(metrics));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sl_geo_matrix::Region;

    #[test]
    fn test_tick_counters() {
        let mut stats = EngineStats::new();
        stats.record_event(1, &Event::TickCompleted { mode: Mode::Geo, log_lines: 1 });
        stats.record_event(2, &Event::TickCompleted { mode: Mode::MlBatching, log_lines: 0 });
        stats.record_event(3, &Event::LogEvicted { count: 2 });

        assert_eq!(stats.ticks_total, 2);
        assert_eq!(stats.ticks_in(Mode::Geo), 1);
        assert_eq!(stats.ticks_in(Mode::Byzantine), 0);
        assert_eq!(stats.ticks_in(Mode::MlBatching), 1);
        assert_eq!(stats.lines_appended, 1);
        assert_eq!(stats.lines_evicted, 2);
    }

    #[test]
    fn test_recovery_spans() {
        let mut stats = EngineStats::new();
        assert_eq!(stats.mean_recovery_ticks(), None);

        stats.record_event(1, &Event::FaultInjected { health: 95 });
        stats.record_event(2, &Event::FaultInjected { health: 90 });
        stats.record_event(3, &Event::FaultRecovered { health: 92 });
        stats.record_event(6, &Event::FaultRecovered { health: 100 });
        // recovery while already healthy opens no span
        stats.record_event(7, &Event::FaultRecovered { health: 100 });
        stats.record_event(8, &Event::FaultInjected { health: 95 });
        stats.record_event(11, &Event::FaultRecovered { health: 100 });

        assert_eq!(stats.faults_injected, 3);
        assert_eq!(stats.recoveries, 4);
        assert_eq!(stats.recovery_spans, vec![5, 3]);
        assert_eq!(stats.mean_recovery_ticks(), Some(4.0));
    }

    #[test]
    fn test_link_deviation() {
        let mut stats = EngineStats::new();
        stats.record_event(
            1,
            &Event::LinkEstablished {
                from: Region::UsEast,
                to: Region::UsEast,
                latency_ms: 1,
                reference_ms: 1,
            },
        );
        assert_eq!(stats.mean_link_deviation_ms(), None);
        stats.record_event(
            2,
            &Event::LinkEstablished {
                from: Region::UsEast,
                to: Region::EuWest,
                latency_ms: 95,
                reference_ms: 75,
            },
        );
        assert_eq!(stats.links_established, 2);
        assert_eq!(stats.loopback_links, 1);
        assert_eq!(stats.mean_link_deviation_ms(), Some(20.0));
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut stats = EngineStats::new();
        stats.record_event(1, &Event::BatchAdjusted { from: 100, to: 102, latency_trend: 10.0 });
        let text = stats.summary(&MetricsState::default());
        assert!(text.contains("Batch adjustments: 1"));
        assert!(text.contains("MTTR n/a"));
    }
}
