//! Pausable countdown used by the focus view.
//!
//! Every method takes the current [`Instant`] so the clock stays with the caller.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    duration: Duration,
    started: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
    completed: bool,
}

impl FocusTimer {
    pub fn start(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            started: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            completed: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn state(&self) -> TimerState {
        if self.completed {
            TimerState::Completed
        } else if self.paused_at.is_some() {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// Time spent running, excluding every paused interval.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let reference = self.paused_at.unwrap_or(now);
        reference
            .saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
            .min(self.duration)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    /// Fraction of the session done, in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed(now).as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state() == TimerState::Running {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        match self.state() {
            TimerState::Running => self.pause(now),
            TimerState::Paused => self.resume(now),
            TimerState::Completed => {}
        }
    }

    /// Advances the machine. Returns `true` only on the tick that completes the session.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state() != TimerState::Running {
            return false;
        }
        if self.elapsed(now) >= self.duration {
            self.completed = true;
            return true;
        }
        false
    }
}

pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
