use std::time::Duration;

/// Repeating timer on a virtual clock
///
/// While armed, the scheduler holds the time left until the next fire.
/// Feeding it elapsed time reports how many interval boundaries were crossed.
/// Disarming drops the pending deadline, so nothing fires afterwards.
///
/// ```
/// use std::time::Duration;
/// use sublyne::sl_scheduler::TickScheduler;
///
/// let mut timer = TickScheduler::new(Duration::from_millis(1500));
/// assert_eq!(timer.advance(Duration::from_secs(10)), 0);
///
/// timer.arm();
/// assert_eq!(timer.advance(Duration::from_millis(1499)), 0);
/// assert_eq!(timer.advance(Duration::from_millis(1)), 1);
/// assert_eq!(timer.advance(Duration::from_millis(4500)), 3);
///
/// timer.disarm();
/// assert_eq!(timer.advance(Duration::from_secs(60)), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    until_next: Option<Duration>,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            until_next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.until_next.is_some()
    }

    /// Start counting a full interval; no-op when already armed
    pub fn arm(&mut self) {
        if self.until_next.is_none() {
            self.until_next = Some(self.interval);
        }
    }

    pub fn disarm(&mut self) {
        self.until_next = None;
    }

    /// Throw away progress toward the next fire and count a full interval again
    pub fn rearm(&mut self) {
        if self.until_next.is_some() {
            self.until_next = Some(self.interval);
        }
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.until_next
    }

    /// Consume `elapsed` and return the number of fires due
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let Some(mut remaining) = self.until_next else {
            return 0;
        };
        if self.interval.is_zero() {
            return 0;
        }

        let mut elapsed = elapsed;
        let mut fires = 0;
        while elapsed >= remaining {
            elapsed -= remaining;
            remaining = self.interval;
            fires += 1;
        }
        self.until_next = Some(remaining - elapsed);
        fires
    }
}
