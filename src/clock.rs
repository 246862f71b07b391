use std::time::{Duration, Instant};

use log::debug;

/// Fixed-period tick schedule, polled from the front-end loop.
///
/// Polling is the only way a tick fires, so a tick always runs to completion
/// on the caller's thread before `stop` can be observed.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker { period, next_due: None }
    }

    /// Starts ticking one period from `now`. A running schedule is dropped first.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            self.stop();
        }

        debug!("Ticker started ({} ms)", self.period.as_millis());
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            debug!("Ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True when a tick is due at `now`. At most one tick fires per call;
    /// periods missed by a slow caller are skipped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = match self.next_due {
            Some(due) if now >= due => due,
            _ => return false,
        };

        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }
}
