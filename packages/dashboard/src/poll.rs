use std::time::{Duration, Instant};

/// Fixed-interval refresh timer. The host drives time; nothing here sleeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start polling; the first refresh is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(due) if now >= due)
    }

    pub fn mark_refreshed(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Make the next refresh due right away, e.g. after a confirmed transaction.
    pub fn force(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now);
        }
    }
}
