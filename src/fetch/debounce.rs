use std::time::{Duration, Instant};

use crate::fetch::ScheduleQuery;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Trailing-edge debouncer for filter changes.
///
/// The caller supplies the clock, so nothing here sleeps or spawns.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(ScheduleQuery, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Record a query change; replaces any query still waiting
    pub fn schedule(&mut self, query: ScheduleQuery, now: Instant) {
        self.pending = Some((query, now));
    }

    /// Take the pending query once the delay has elapsed since the last change
    pub fn poll(&mut self, now: Instant) -> Option<ScheduleQuery> {
        let due = match &self.pending {
            Some((_, at)) => now.saturating_duration_since(*at) >= self.delay,
            None => false,
        };
        if due {
            self.pending.take().map(|(query, _)| query)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
