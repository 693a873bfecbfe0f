use std::time::{Duration, Instant};

pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Edge trigger for the "no results" notification.
///
/// Fires only when results go from non-empty to empty. Staying empty while
/// the criteria change does not fire again.
#[derive(Debug, Default)]
pub struct NoResultsSignal {
    was_empty: bool,
}

impl NoResultsSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest `is_empty` and returns true on a false -> true edge.
    pub fn observe(&mut self, is_empty: bool) -> bool {
        let fired = is_empty && !self.was_empty;
        self.was_empty = is_empty;
        fired
    }
}

/// Transient, auto-dismissing notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, shown_at: Instant, duration: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at,
            duration,
        }
    }

    /// Remaining display time as a fraction, from 1.0 down to 0.0.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.shown_at);
        let remaining = self.duration.saturating_sub(elapsed);
        remaining.as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.duration
    }
}
