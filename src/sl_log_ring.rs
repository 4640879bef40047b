use std::collections::VecDeque;

use serde::Serialize;

use crate::sl_interface::{LogClock, LogLevel, LOG_CAPACITY};

/// One narrative line on the dashboard
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub level: LogLevel,
}

/// Capacity-bounded log history, oldest first
///
/// Appending past capacity silently drops entries from the head.
///
/// ```
/// use sublyne::sl_log_ring::LogRing;
/// use sublyne::sl_clock::FixedClock;
/// use sublyne::LogLevel;
///
/// let clock = FixedClock::new("12:00:00");
/// let mut ring = LogRing::new(2);
/// ring.append(&clock, "a", LogLevel::Info);
/// ring.append(&clock, "b", LogLevel::Info);
/// assert_eq!(ring.append(&clock, "c", LogLevel::Info), 1);
///
/// let messages: Vec<_> = ring.snapshot().into_iter().map(|e| e.message).collect();
/// assert_eq!(messages, vec!["b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
        }
    }

    /// Append a line stamped by `clock`; returns how many old lines were evicted
    pub fn append(
        &mut self,
        clock: &dyn LogClock,
        message: impl Into<String>,
        level: LogLevel,
    ) -> usize {
        self.entries.push_back(LogEntry {
            timestamp: clock.time_of_day(),
            message: message.into(),
            level,
        });

        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
