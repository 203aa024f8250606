// src/ui/timer.rs
//! Frame clock and countdown timers
//!
//! Nothing in the tree blocks or sleeps. Anything that has to wait (click
//! debounce, the idle timer before attract mode) is a countdown advanced once
//! per `update` by the elapsed time of the frame.

pub use embassy_time::Duration;

const ZERO: Duration = Duration::from_ticks(0);

/// Elapsed time supplied to every `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    /// Time since the previous frame.
    pub elapsed: Duration,
    /// Time since the clock was created.
    pub total: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            elapsed: ZERO,
            total: ZERO,
        }
    }

    /// A clock whose current frame lasted `elapsed`.
    pub fn with_elapsed(elapsed: Duration) -> Self {
        Self {
            elapsed,
            total: elapsed,
        }
    }

    /// Start the next frame, `elapsed` after the previous one.
    pub fn tick(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
        self.total = self.total + elapsed;
    }
}

/// Countdown holding a transient flag true for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: Duration,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    /// A timer that has already expired.
    pub fn new() -> Self {
        Self { remaining: ZERO }
    }

    pub fn start(&mut self, duration: Duration) {
        self.remaining = duration;
    }

    pub fn stop(&mut self) {
        self.remaining = ZERO;
    }

    /// Count down by the clock's frame time, saturating at zero.
    pub fn update(&mut self, clock: &FrameClock) {
        self.remaining = self.remaining.checked_sub(clock.elapsed).unwrap_or(ZERO);
    }

    pub fn has_time_remaining(&self) -> bool {
        self.remaining > ZERO
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_expired() {
        assert!(!CountdownTimer::new().has_time_remaining());
    }

    #[test]
    fn test_timer_counts_down_and_saturates() {
        let mut timer = CountdownTimer::new();
        timer.start(Duration::from_millis(100));

        timer.update(&FrameClock::with_elapsed(Duration::from_millis(60)));
        assert!(timer.has_time_remaining());
        assert_eq!(timer.remaining(), Duration::from_millis(40));

        timer.update(&FrameClock::with_elapsed(Duration::from_millis(60)));
        assert!(!timer.has_time_remaining());
        assert_eq!(timer.remaining(), Duration::from_ticks(0));
    }

    #[test]
    fn test_clock_accumulates_total() {
        let mut clock = FrameClock::new();
        clock.tick(Duration::from_millis(16));
        clock.tick(Duration::from_millis(17));
        assert_eq!(clock.elapsed, Duration::from_millis(17));
        assert_eq!(clock.total, Duration::from_millis(33));
    }
}
