//! Countdown timer
//!
//! One countdown against the monotonic tick counter. Expiry is edge
//! detected: `poll_expired` reports true exactly once per `start`, at the
//! first tick where nothing remains, and the triggered flag then holds the
//! "currently sounding" state until the timer is cleared or restarted.

use heapless::String;

use crate::alarm::bounded_label;
use crate::clock::Tick;
use crate::error::ConfigError;
use crate::MAX_LABEL_LEN;

/// Shortest accepted duration: one second
pub const MIN_DURATION_MS: Tick = 1_000;

/// Longest accepted duration: 24 hours
pub const MAX_DURATION_MS: Tick = 24 * 60 * 60 * 1_000;

/// The timer engine
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    active: bool,
    start: Tick,
    duration: Tick,
    label: String<MAX_LABEL_LEN>,
    triggered: bool,
}

impl TimerEngine {
    /// Create an inactive engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown
    ///
    /// Rejects durations outside 1 s ..= 24 h atomically; a running timer
    /// is untouched by a rejected call.
    pub fn start(&mut self, now: Tick, duration: Tick, label: &str) -> Result<(), ConfigError> {
        if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&duration) {
            return Err(ConfigError::InvalidDuration);
        }
        self.active = true;
        self.start = now;
        self.duration = duration;
        self.label = bounded_label(label);
        self.triggered = false;
        Ok(())
    }

    /// Deactivate and reset the expiry edge
    pub fn clear(&mut self) {
        self.active = false;
        self.triggered = false;
    }

    /// Remaining ticks, saturating at zero
    pub fn remaining(&self, now: Tick) -> Tick {
        if !self.active {
            return 0;
        }
        self.duration.saturating_sub(now.saturating_sub(self.start))
    }

    /// Remaining whole seconds, rounded up
    pub fn remaining_secs(&self, now: Tick) -> u32 {
        (self.remaining(now).div_ceil(1_000)) as u32
    }

    /// Edge-detected expiry check
    ///
    /// Returns true only the first time `remaining == 0` is observed;
    /// subsequent calls return false until `clear` or `start`.
    pub fn poll_expired(&mut self, now: Tick) -> bool {
        if !self.active || self.triggered {
            return false;
        }
        if self.remaining(now) == 0 {
            self.triggered = true;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_oversized_durations() {
        let mut timer = TimerEngine::new();
        assert_eq!(timer.start(0, 0, ""), Err(ConfigError::InvalidDuration));
        assert_eq!(
            timer.start(0, MAX_DURATION_MS + 1, ""),
            Err(ConfigError::InvalidDuration)
        );
        assert!(!timer.is_active());

        assert!(timer.start(0, MIN_DURATION_MS, "").is_ok());
        assert!(timer.start(0, MAX_DURATION_MS, "").is_ok());
    }

    #[test]
    fn test_remaining_counts_down_and_saturates() {
        let mut timer = TimerEngine::new();
        timer.start(1_000, 5_000, "").unwrap();

        assert_eq!(timer.remaining(1_000), 5_000);
        assert_eq!(timer.remaining(3_500), 2_500);
        assert_eq!(timer.remaining(6_000), 0);
        // Long past expiry: still zero, no underflow.
        assert_eq!(timer.remaining(1_000_000), 0);
    }

    #[test]
    fn test_poll_expired_fires_exactly_once() {
        let mut timer = TimerEngine::new();
        timer.start(0, 300_000, "Tea").unwrap();

        assert!(!timer.poll_expired(299_999));
        assert!(timer.poll_expired(300_000));
        assert!(timer.is_triggered());
        // Second observation without clear/start: false.
        assert!(!timer.poll_expired(300_001));
        assert!(!timer.poll_expired(999_999));
    }

    #[test]
    fn test_restart_rearms_the_edge() {
        let mut timer = TimerEngine::new();
        timer.start(0, 1_000, "").unwrap();
        assert!(timer.poll_expired(1_000));

        timer.start(2_000, 1_000, "").unwrap();
        assert!(!timer.is_triggered());
        assert!(timer.poll_expired(3_000));
    }

    #[test]
    fn test_clear_deactivates() {
        let mut timer = TimerEngine::new();
        timer.start(0, 1_000, "").unwrap();
        timer.clear();
        assert!(!timer.is_active());
        assert_eq!(timer.remaining(500), 0);
        assert!(!timer.poll_expired(5_000));
    }

    #[test]
    fn test_remaining_secs_rounds_up() {
        let mut timer = TimerEngine::new();
        timer.start(0, 300_000, "").unwrap();
        assert_eq!(timer.remaining_secs(0), 300);
        assert_eq!(timer.remaining_secs(1), 300);
        assert_eq!(timer.remaining_secs(1_000), 299);
        assert_eq!(timer.remaining_secs(299_001), 1);
        assert_eq!(timer.remaining_secs(300_000), 0);
    }
}
