//! Sampling clock
//!
//! Fixed-interval tick gate over a free-running u32 millisecond counter.
//! All elapsed-time math uses wrapping subtraction so comparisons stay
//! correct across counter overflow.

/// Decides when the next sample is due
#[derive(Debug, Clone, Copy)]
pub struct SampleClock {
    interval_ms: u32,
    last_tick_ms: u32,
}

impl SampleClock {
    /// Create a clock that fires every `interval_ms` milliseconds
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_tick_ms: 0,
        }
    }

    /// The configured interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Returns true and advances the clock exactly when a full interval has
    /// elapsed since the last firing.
    ///
    /// No catch-up: however many intervals have elapsed between calls, a
    /// single call fires at most once and rebases on `now_ms`, so a stalled
    /// caller gets one sample, not a backlog replay.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_tick_ms) >= self.interval_ms {
            self.last_tick_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let mut clock = SampleClock::new(500);
        assert!(!clock.tick(100));
        assert!(!clock.tick(499));
        assert!(clock.tick(500));
        assert!(!clock.tick(750));
        assert!(clock.tick(1000));
    }

    #[test]
    fn test_no_catch_up_after_stall() {
        let mut clock = SampleClock::new(500);
        assert!(clock.tick(500));
        // 10 intervals elapse unobserved; only one tick fires and the
        // cadence rebases on the current time
        assert!(clock.tick(5500));
        assert!(!clock.tick(5600));
        assert!(clock.tick(6000));
    }

    #[test]
    fn test_correct_across_counter_wraparound() {
        let mut clock = SampleClock::new(500);
        assert!(clock.tick(u32::MAX - 100));
        // counter wraps; 500 ms later in wrapped time the clock still fires
        assert!(!clock.tick(u32::MAX));
        assert!(clock.tick(399));
        assert!(!clock.tick(600));
        assert!(clock.tick(899));
    }
}
