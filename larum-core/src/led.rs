//! LED status indication
//!
//! The LED state is derived, never stored: a pure function of the four
//! alarm/timer booleans plus the blink-phase clock. Triggered states take
//! absolute priority over active-but-quiet states.

use crate::clock::Tick;

/// Blink period while a trigger is sounding
pub const TRIGGER_BLINK_MS: Tick = 250;

/// Blink period for armed-but-quiet indication
pub const ACTIVE_BLINK_MS: Tick = 500;

/// What the status LED should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Yellow,
    Green,
    Blue,
}

/// Engine booleans the indicator is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorFlags {
    pub alarm_triggered: bool,
    pub timer_triggered: bool,
    pub alarm_active: bool,
    pub timer_active: bool,
}

/// On-half of a square blink wave with the given period
const fn blink_on(now: Tick, period: Tick) -> bool {
    (now / period) % 2 == 0
}

/// Derive the LED output for this tick
pub fn indicator_color(flags: IndicatorFlags, now: Tick) -> LedColor {
    if flags.alarm_triggered {
        return if blink_on(now, TRIGGER_BLINK_MS) {
            LedColor::Red
        } else {
            LedColor::Off
        };
    }
    if flags.timer_triggered {
        return if blink_on(now, TRIGGER_BLINK_MS) {
            LedColor::Yellow
        } else {
            LedColor::Off
        };
    }
    match (flags.timer_active, flags.alarm_active) {
        (true, true) => {
            if blink_on(now, ACTIVE_BLINK_MS) {
                LedColor::Blue
            } else {
                LedColor::Green
            }
        }
        (true, false) => {
            if blink_on(now, ACTIVE_BLINK_MS) {
                LedColor::Green
            } else {
                LedColor::Off
            }
        }
        (false, true) => LedColor::Blue,
        (false, false) => LedColor::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(
        alarm_triggered: bool,
        timer_triggered: bool,
        timer_active: bool,
        alarm_active: bool,
    ) -> IndicatorFlags {
        IndicatorFlags {
            alarm_triggered,
            timer_triggered,
            alarm_active,
            timer_active,
        }
    }

    #[test]
    fn test_alarm_trigger_blinks_red_fast() {
        let f = flags(true, false, false, true);
        assert_eq!(indicator_color(f, 0), LedColor::Red);
        assert_eq!(indicator_color(f, 250), LedColor::Off);
        assert_eq!(indicator_color(f, 500), LedColor::Red);
    }

    #[test]
    fn test_alarm_trigger_outranks_everything() {
        // All four set: still the red pattern.
        let f = flags(true, true, true, true);
        assert_eq!(indicator_color(f, 0), LedColor::Red);
        assert_eq!(indicator_color(f, 250), LedColor::Off);
    }

    #[test]
    fn test_timer_trigger_blinks_yellow_fast() {
        let f = flags(false, true, true, false);
        assert_eq!(indicator_color(f, 0), LedColor::Yellow);
        assert_eq!(indicator_color(f, 250), LedColor::Off);
    }

    #[test]
    fn test_both_active_alternates_blue_green() {
        let f = flags(false, false, true, true);
        assert_eq!(indicator_color(f, 0), LedColor::Blue);
        assert_eq!(indicator_color(f, 500), LedColor::Green);
        assert_eq!(indicator_color(f, 1000), LedColor::Blue);
    }

    #[test]
    fn test_timer_only_blinks_green_slow() {
        let f = flags(false, false, true, false);
        assert_eq!(indicator_color(f, 0), LedColor::Green);
        assert_eq!(indicator_color(f, 250), LedColor::Green);
        assert_eq!(indicator_color(f, 500), LedColor::Off);
    }

    #[test]
    fn test_alarm_only_is_solid_blue() {
        let f = flags(false, false, false, true);
        assert_eq!(indicator_color(f, 0), LedColor::Blue);
        assert_eq!(indicator_color(f, 250), LedColor::Blue);
        assert_eq!(indicator_color(f, 750), LedColor::Blue);
    }

    #[test]
    fn test_all_clear_is_off() {
        let f = flags(false, false, false, false);
        assert_eq!(indicator_color(f, 0), LedColor::Off);
        assert_eq!(indicator_color(f, 12345), LedColor::Off);
    }
}
