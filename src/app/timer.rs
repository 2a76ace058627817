//! Round clock
//!
//! The core never reads the wall clock. The host feeds elapsed time in
//! through [`Timer::advance`] and the timer turns it into whole game
//! seconds, one per tick interval. Stretching the interval (time slow)
//! makes game seconds pass more slowly.

use std::time::Duration;

/// Default length of one game second
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// A pausable clock counting whole game seconds.
pub trait Timer {
    /// Begin counting. Elapsed time is kept.
    fn start(&mut self);
    /// Stop counting without resetting.
    fn stop(&mut self);
    /// Stop and zero the clock.
    fn reset(&mut self);
    fn is_running(&self) -> bool;
    /// Whole game seconds counted so far.
    fn elapsed_seconds(&self) -> u64;
    /// Feed host time. Returns the game seconds that passed.
    fn advance(&mut self, delta: Duration) -> u64;
    /// Change the length of one game second.
    fn set_interval(&mut self, interval: Duration);
}

/// A timer driven entirely by [`Timer::advance`].
#[derive(Debug, Clone)]
pub struct ManualTimer {
    running: bool,
    seconds: u64,
    interval: Duration,
    /// Host time not yet worth a whole interval
    carry: Duration,
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self {
            running: false,
            seconds: 0,
            interval: DEFAULT_INTERVAL,
            carry: Duration::ZERO,
        }
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Elapsed time as `MM:SS`
    pub fn formatted(&self) -> String {
        format_time(self.seconds)
    }
}

impl Timer for ManualTimer {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.running = false;
        self.seconds = 0;
        self.carry = Duration::ZERO;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn elapsed_seconds(&self) -> u64 {
        self.seconds
    }

    fn advance(&mut self, delta: Duration) -> u64 {
        if !self.running {
            return 0;
        }
        let interval = self.interval.max(Duration::from_millis(1));
        self.carry += delta;

        let ticks = (self.carry.as_nanos() / interval.as_nanos()) as u64;
        self.carry -= interval * ticks as u32;
        self.seconds += ticks;
        ticks
    }

    fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}

/// Format seconds as `MM:SS`; minutes grow past two digits if needed.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
