//! Logical countdown for one session.
//!
//! The timer holds no clock. Callers charge elapsed time with
//! [`CountdownTimer::advance`]; expiry is reported through the returned
//! [`TimerStatus`] at the moment it happens, never later.

use std::time::Duration;

/// Time a wrong input costs.
pub const WRONG_INPUT_PENALTY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running { remaining: Duration },
    /// Reached zero during this call. Reported once; the timer is stopped
    /// afterwards.
    Expired,
    Stopped,
}

#[derive(Debug, Clone, Default)]
pub struct CountdownTimer {
    remaining: Duration,
    running: bool,
}

impl CountdownTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: Duration::ZERO,
            running: false,
        }
    }

    pub fn start(&mut self, duration: Duration) {
        self.remaining = duration;
        self.running = !duration.is_zero();
    }

    /// Restart from `duration`, whatever the current state.
    pub fn reset(&mut self, duration: Duration) {
        self.start(duration);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn remaining_ms(&self) -> u64 {
        u64::try_from(self.remaining.as_millis()).unwrap_or(u64::MAX)
    }

    /// Charge `elapsed` wall time.
    pub fn advance(&mut self, elapsed: Duration) -> TimerStatus {
        self.shrink_by(elapsed)
    }

    /// Take `amount` off the clock. Landing on or below zero expires the timer
    /// immediately; the remaining time never goes negative.
    pub fn shrink_by(&mut self, amount: Duration) -> TimerStatus {
        if !self.running {
            return TimerStatus::Stopped;
        }
        match self.remaining.checked_sub(amount) {
            Some(left) if !left.is_zero() => {
                self.remaining = left;
                TimerStatus::Running { remaining: left }
            }
            _ => self.expire(),
        }
    }

    /// Wrong-input penalty: lose [`WRONG_INPUT_PENALTY`] if that much is left,
    /// otherwise expire now.
    pub fn penalize(&mut self) -> TimerStatus {
        if !self.running {
            return TimerStatus::Stopped;
        }
        if self.remaining >= WRONG_INPUT_PENALTY {
            self.shrink_by(WRONG_INPUT_PENALTY)
        } else {
            self.expire()
        }
    }

    fn expire(&mut self) -> TimerStatus {
        self.remaining = Duration::ZERO;
        self.running = false;
        TimerStatus::Expired
    }
}
