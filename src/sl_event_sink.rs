// Event logging for the engine

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::sl_interface::{Event, EventSink, TickNumber};

/// Event sink that writes every engine event through the `log` facade
pub struct LoggingEventSink {
    enabled: bool,
}

impl LoggingEventSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventSink for LoggingEventSink {
    fn log(&mut self, tick: TickNumber, event: Event) {
        if !self.enabled {
            return;
        }

        match event {
            Event::EngineStarted => info!("{:>5} engine started", tick),
            Event::EngineStopped => info!("{:>5} engine stopped", tick),
            Event::EngineReset => info!("{:>5} engine reset", tick),
            Event::ModeChanged { from, to } => {
                info!("{:>5} mode {} -> {}", tick, from, to)
            }
            Event::LinkEstablished {
                from,
                to,
                latency_ms,
                reference_ms,
            } => {
                debug!(
                    "{:>5} link {} <-> {} synthetic:{}ms reference:{}ms",
                    tick, from, to, latency_ms, reference_ms
                );
            }
            Event::FaultInjected { health } => {
                warn!("{:>5} fault injected health:{}%", tick, health)
            }
            Event::FaultRecovered { health } => {
                debug!("{:>5} recovered health:{}%", tick, health)
            }
            Event::BatchAdjusted {
                from,
                to,
                latency_trend,
            } => {
                debug!(
                    "{:>5} batch {} -> {} trend:{:.1}ms",
                    tick, from, to, latency_trend
                );
            }
            Event::LogEvicted { count } => debug!("{:>5} evicted {} line(s)", tick, count),
            Event::TickCompleted { mode, log_lines } => {
                debug!("{:>5} tick {} lines:{}", tick, mode, log_lines)
            }
        }
    }
}

pub type EventRecord = Rc<RefCell<Vec<(TickNumber, Event)>>>;

/// Event sink that keeps every event in a shared buffer
///
/// The engine owns the sink; keep the `records()` handle to read it back.
#[derive(Default)]
pub struct CollectingSink {
    events: EventRecord,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> EventRecord {
        Rc::clone(&self.events)
    }
}

impl EventSink for CollectingSink {
    fn log(&mut self, tick: TickNumber, event: Event) {
        self.events.borrow_mut().push((tick, event));
    }
}
