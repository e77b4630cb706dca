//! Leading-edge throttle with a trailing call.

use std::time::Duration;

/// Decides whether a high-frequency event (scroll, pointer move) should be
/// handled now.
///
/// The first call in a window passes; calls inside the window are dropped
/// but remembered, so the owner can schedule one trailing run once the
/// window closes and never miss the final position.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Duration>,
    pending: bool,
}

impl Throttle {
    /// Throttle allowing one run per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            pending: false,
        }
    }

    /// Whether to run at time `now`. A `false` marks a trailing run as
    /// pending.
    pub fn should_run(&mut self, now: Duration) -> bool {
        let due = self
            .last_run
            .is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if due {
            self.last_run = Some(now);
            self.pending = false;
        } else {
            self.pending = true;
        }
        due
    }

    /// Time left until the window closes, measured from `now`.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.last_run.map_or(Duration::ZERO, |last| {
            self.interval.saturating_sub(now.saturating_sub(last))
        })
    }

    /// Take the pending trailing run, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Forget history; the next call runs.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn leading_call_runs_and_window_drops() {
        let mut throttle = Throttle::new(MS * 100);
        assert!(throttle.should_run(MS * 0));
        assert!(!throttle.should_run(MS * 40));
        assert_eq!(throttle.remaining(MS * 40), MS * 60);
        assert!(throttle.take_pending());
        assert!(!throttle.take_pending());
        assert!(throttle.should_run(MS * 100));
    }

    #[test]
    fn reset_allows_immediate_run() {
        let mut throttle = Throttle::new(MS * 100);
        assert!(throttle.should_run(MS * 10));
        throttle.reset();
        assert!(throttle.should_run(MS * 11));
    }
}
