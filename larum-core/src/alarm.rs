//! Alarm trigger evaluation
//!
//! A single alarm with three mutually exclusive schedule modes. Evaluation
//! is polled once per tick but fires at most once per configured minute:
//! the match requires the current second to be exactly zero, so the tick
//! loop cannot re-fire for the rest of that minute.

use heapless::String;

use crate::clock::WallClock;
use crate::config::{AlarmRecord, MODE_DAILY, MODE_DATE, MODE_WEEKDAYS};
use crate::error::ConfigError;
use crate::MAX_LABEL_LEN;

/// Schedule mode. Setting one mode clears the others; the engine never
/// carries residue from a previous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlarmMode {
    /// Fires every day at the configured time
    Daily,
    /// Fires on days selected by the mask
    Weekdays(WeekdayMask),
    /// Fires once, on an exact calendar date
    Date { year: u16, month: u8, day: u8 },
}

/// Seven-day selection mask, bit 0 = Monday .. bit 6 = Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeekdayMask(pub u8);

impl WeekdayMask {
    /// Check the bit for a platform-numbered weekday (0 = Sunday)
    pub const fn contains(self, weekday: u8) -> bool {
        let bit = if weekday == 0 { 6 } else { weekday - 1 };
        self.0 & (1 << bit) != 0
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPoll {
    /// The alarm fired this second; the engine is now triggered
    Fired,
    /// Nothing to do
    Idle,
}

/// Copy a label into the bounded buffer, dropping whatever does not fit
pub(crate) fn bounded_label(label: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in label.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// The alarm engine
///
/// Owns the one alarm instance in the system. `triggered` is the transient
/// "currently sounding" state; `active` means configured and armed.
#[derive(Debug, Clone, Default)]
pub struct AlarmEngine {
    active: bool,
    mode: Option<AlarmMode>,
    hour: u8,
    minute: u8,
    repeat: bool,
    label: String<MAX_LABEL_LEN>,
    triggered: bool,
    persisted: bool,
}

impl AlarmEngine {
    /// Create an inactive engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a daily alarm
    pub fn set_daily(
        &mut self,
        hour: u8,
        minute: u8,
        label: &str,
        repeat: bool,
    ) -> Result<(), ConfigError> {
        self.arm(AlarmMode::Daily, hour, minute, label, repeat)
    }

    /// Arm a weekday-mask alarm
    pub fn set_weekdays(
        &mut self,
        mask: WeekdayMask,
        hour: u8,
        minute: u8,
        label: &str,
        repeat: bool,
    ) -> Result<(), ConfigError> {
        self.arm(AlarmMode::Weekdays(mask), hour, minute, label, repeat)
    }

    /// Arm a fixed-date alarm
    #[allow(clippy::too_many_arguments)]
    pub fn set_date(
        &mut self,
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        label: &str,
        repeat: bool,
    ) -> Result<(), ConfigError> {
        self.arm(AlarmMode::Date { year, month, day }, hour, minute, label, repeat)
    }

    fn arm(
        &mut self,
        mode: AlarmMode,
        hour: u8,
        minute: u8,
        label: &str,
        repeat: bool,
    ) -> Result<(), ConfigError> {
        if hour > 23 || minute > 59 {
            return Err(ConfigError::InvalidTime);
        }
        self.active = true;
        self.mode = Some(mode);
        self.hour = hour;
        self.minute = minute;
        self.repeat = repeat;
        self.label = bounded_label(label);
        self.triggered = false;
        self.persisted = false;
        Ok(())
    }

    /// Disarm and reset the triggered flag
    pub fn clear(&mut self) {
        self.active = false;
        self.mode = None;
        self.triggered = false;
        self.persisted = false;
    }

    /// Evaluate against the wall clock
    ///
    /// `wall` is `None` while the clock source has never synchronized;
    /// evaluation is suppressed entirely in that case. An already-triggered
    /// alarm stays quiet until acknowledged.
    pub fn evaluate(&mut self, wall: Option<&WallClock>) -> AlarmPoll {
        let Some(now) = wall else {
            return AlarmPoll::Idle;
        };
        if !self.active || self.triggered {
            return AlarmPoll::Idle;
        }
        // Second must be exactly zero: one shot per matching minute.
        if now.second != 0 || now.hour != self.hour || now.minute != self.minute {
            return AlarmPoll::Idle;
        }

        let matches = match self.mode {
            Some(AlarmMode::Daily) => true,
            Some(AlarmMode::Weekdays(mask)) => mask.contains(now.weekday),
            Some(AlarmMode::Date { year, month, day }) => {
                now.year == year && now.month == month && now.day == day
            }
            None => false,
        };

        if matches {
            self.triggered = true;
            AlarmPoll::Fired
        } else {
            AlarmPoll::Idle
        }
    }

    /// Acknowledge a trigger
    ///
    /// Clears the triggered flag. A one-shot alarm (repeat = false) is
    /// deactivated here rather than at fire time, so the caller gets to
    /// start the notification before the alarm disarms itself.
    pub fn acknowledge(&mut self) {
        if !self.triggered {
            return;
        }
        self.triggered = false;
        if !self.repeat {
            self.active = false;
            self.persisted = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn mode(&self) -> Option<AlarmMode> {
        self.mode
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Whether the current configuration matches what external storage holds
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Mark the current configuration as saved
    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    /// Snapshot the configuration for external storage
    pub fn to_record(&self) -> AlarmRecord {
        let mut rec = AlarmRecord {
            active: self.active,
            mode: MODE_DAILY,
            year: 0,
            month: 0,
            day: 0,
            weekdays: 0,
            hour: self.hour,
            minute: self.minute,
            repeat: self.repeat,
            label: self.label.clone(),
        };
        match self.mode {
            Some(AlarmMode::Weekdays(mask)) => {
                rec.mode = MODE_WEEKDAYS;
                rec.weekdays = mask.0;
            }
            Some(AlarmMode::Date { year, month, day }) => {
                rec.mode = MODE_DATE;
                rec.year = year;
                rec.month = month;
                rec.day = day;
            }
            _ => {}
        }
        rec
    }

    /// Restore from a stored record
    ///
    /// Goes through the ordinary setters, so an out-of-range record leaves
    /// the engine inactive instead of arming garbage.
    pub fn restore(&mut self, rec: &AlarmRecord) {
        self.clear();
        if !rec.active {
            // An inactive record and an inactive engine agree.
            self.persisted = true;
            return;
        }
        let result = match rec.mode {
            MODE_WEEKDAYS => self.set_weekdays(
                WeekdayMask(rec.weekdays),
                rec.hour,
                rec.minute,
                rec.label.as_str(),
                rec.repeat,
            ),
            MODE_DATE => self.set_date(
                rec.year,
                rec.month,
                rec.day,
                rec.hour,
                rec.minute,
                rec.label.as_str(),
                rec.repeat,
            ),
            _ => self.set_daily(rec.hour, rec.minute, rec.label.as_str(), rec.repeat),
        };
        if result.is_ok() {
            // What we just loaded is, by definition, what storage holds.
            self.persisted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wall(hour: u8, minute: u8, second: u8) -> WallClock {
        WallClock {
            year: 2025,
            month: 3,
            day: 17, // a Monday
            hour,
            minute,
            second,
            weekday: 1,
        }
    }

    #[test]
    fn test_daily_fires_at_second_zero_only() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 30, "wake", true).unwrap();

        assert_eq!(alarm.evaluate(Some(&wall(7, 29, 59))), AlarmPoll::Idle);
        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 0))), AlarmPoll::Fired);
        assert!(alarm.is_triggered());

        // Later the same minute: no re-fire.
        alarm.acknowledge();
        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 1))), AlarmPoll::Idle);
        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 30))), AlarmPoll::Idle);
    }

    #[test]
    fn test_triggered_suppresses_evaluation() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 30, "", true).unwrap();
        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 0))), AlarmPoll::Fired);
        // Still second zero, but already triggered.
        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 0))), AlarmPoll::Idle);
    }

    #[test]
    fn test_unsynchronized_clock_never_fires() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 30, "", true).unwrap();
        assert_eq!(alarm.evaluate(None), AlarmPoll::Idle);
        assert!(!alarm.is_triggered());
    }

    #[test]
    fn test_invalid_time_rejected_without_mutation() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(6, 15, "keep", true).unwrap();

        assert_eq!(alarm.set_daily(24, 0, "x", true), Err(ConfigError::InvalidTime));
        assert_eq!(alarm.set_daily(0, 60, "x", true), Err(ConfigError::InvalidTime));

        // Prior configuration untouched.
        assert_eq!(alarm.hour(), 6);
        assert_eq!(alarm.minute(), 15);
        assert_eq!(alarm.label(), "keep");
    }

    #[test]
    fn test_mode_mutual_exclusivity() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 0, "", true).unwrap();
        alarm
            .set_weekdays(WeekdayMask(0b0011111), 7, 0, "", true)
            .unwrap();

        assert_eq!(alarm.mode(), Some(AlarmMode::Weekdays(WeekdayMask(0b0011111))));

        alarm.set_date(2025, 12, 24, 18, 0, "", false).unwrap();
        assert_eq!(
            alarm.mode(),
            Some(AlarmMode::Date { year: 2025, month: 12, day: 24 })
        );
    }

    #[test]
    fn test_date_mode_requires_exact_date() {
        let mut alarm = AlarmEngine::new();
        alarm.set_date(2025, 3, 17, 7, 30, "", true).unwrap();

        let mut other_day = wall(7, 30, 0);
        other_day.day = 18;
        assert_eq!(alarm.evaluate(Some(&other_day)), AlarmPoll::Idle);

        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 0))), AlarmPoll::Fired);
    }

    #[test]
    fn test_weekday_sunday_maps_to_bit_six() {
        let mut alarm = AlarmEngine::new();
        alarm
            .set_weekdays(WeekdayMask(1 << 6), 9, 0, "", true)
            .unwrap();

        let mut sunday = wall(9, 0, 0);
        sunday.weekday = 0;
        assert_eq!(alarm.evaluate(Some(&sunday)), AlarmPoll::Fired);

        alarm.acknowledge();
        let mut monday = wall(9, 0, 0);
        monday.weekday = 1;
        assert_eq!(alarm.evaluate(Some(&monday)), AlarmPoll::Idle);
    }

    #[test]
    fn test_one_shot_deactivates_on_acknowledge_not_fire() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 30, "", false).unwrap();

        assert_eq!(alarm.evaluate(Some(&wall(7, 30, 0))), AlarmPoll::Fired);
        // Still active while sounding.
        assert!(alarm.is_active());
        assert!(alarm.is_triggered());

        alarm.acknowledge();
        assert!(!alarm.is_active());
        assert!(!alarm.is_triggered());
    }

    #[test]
    fn test_repeat_alarm_stays_active_after_acknowledge() {
        let mut alarm = AlarmEngine::new();
        alarm.set_daily(7, 30, "", true).unwrap();
        alarm.evaluate(Some(&wall(7, 30, 0)));
        alarm.acknowledge();
        assert!(alarm.is_active());
    }

    #[test]
    fn test_label_truncated_to_capacity() {
        let mut alarm = AlarmEngine::new();
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        alarm.set_daily(7, 0, long, true).unwrap();
        assert_eq!(alarm.label().len(), MAX_LABEL_LEN);
        assert!(long.starts_with(alarm.label()));
    }

    #[test]
    fn test_record_round_trip() {
        let mut alarm = AlarmEngine::new();
        alarm
            .set_weekdays(WeekdayMask(0b1100000), 22, 45, "weekend", false)
            .unwrap();

        let rec = alarm.to_record();
        let mut restored = AlarmEngine::new();
        restored.restore(&rec);

        assert!(restored.is_active());
        assert!(restored.is_persisted());
        assert_eq!(restored.mode(), alarm.mode());
        assert_eq!(restored.hour(), 22);
        assert_eq!(restored.minute(), 45);
        assert_eq!(restored.label(), "weekend");
        assert!(!restored.repeat());
    }

    proptest! {
        // For all masks and platform weekdays: a weekday alarm fires on day
        // `d` iff bit (d + 6) % 7 of the mask is set (Monday = bit 0).
        #[test]
        fn prop_weekday_mask_selects_firing_days(mask in 0u8..128, weekday in 0u8..7) {
            let mut alarm = AlarmEngine::new();
            alarm.set_weekdays(WeekdayMask(mask), 6, 0, "", true).unwrap();

            let now = WallClock {
                year: 2025,
                month: 1,
                day: 1,
                hour: 6,
                minute: 0,
                second: 0,
                weekday,
            };
            let expected = mask & (1 << ((weekday + 6) % 7)) != 0;
            prop_assert_eq!(alarm.evaluate(Some(&now)) == AlarmPoll::Fired, expected);
        }
    }
}
