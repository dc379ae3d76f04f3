//! The scheduler context
//!
//! `ClockContext` owns every engine in the appliance — alarm, timer, both
//! melodies, the playback sequencer and the screen state — and advances
//! them once per tick of the single cooperative loop, in a fixed order:
//!
//! 1. debounced input (fed in between ticks via [`ClockContext::button_press`])
//! 2. auto-return to the home screen after inactivity
//! 3. alarm evaluation
//! 4. timer expiry polling
//! 5. melody advance, only while a trigger is active
//! 6. LED derivation
//! 7. screen selection for the renderer
//!
//! Blink phases need no advancing of their own; they are pure functions
//! of the tick passed in. The display buffer, LED and tone sink are
//! written only with what `tick` returns, so no two engines ever race on
//! a shared output. Clearing an alarm or timer silences the sequencer
//! synchronously, in the same call.

use larum_protocol::{AlarmSchedule, Command, MelodyTarget, StatusSnapshot};

use crate::alarm::{AlarmEngine, AlarmMode, AlarmPoll, WeekdayMask};
use crate::clock::{Tick, WallClock};
use crate::config::{ApplianceConfig, MelodyConfig, MAX_MELODY_STR_LEN};
use crate::error::ConfigError;
use crate::led::{indicator_color, IndicatorFlags, LedColor};
use crate::melody::{Melody, MelodySequencer, ToneCommand};
use crate::timer::TimerEngine;

/// Minimum spacing between accepted button edges
pub const DEBOUNCE_MS: Tick = 300;

/// Inactivity timeout before info screens fall back to home
pub const HOME_TIMEOUT_MS: Tick = 10_000;

/// Number of info pages the button cycles through
pub const INFO_PAGES: u8 = 2;

/// Which trigger currently owns the full-screen message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerSource {
    Alarm,
    Timer,
}

/// What the renderer should show this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenMode {
    /// Clock face
    #[default]
    Home,
    /// Status page, cycled by the button
    Info(u8),
    /// Full-screen trigger message
    Triggered(TriggerSource),
}

/// Everything one tick decides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    pub led: LedColor,
    pub tone: ToneCommand,
    pub screen: ScreenMode,
}

/// Result of applying a collaborator command
#[derive(Debug, Clone)]
pub enum Applied {
    /// State changed (or nothing needed doing)
    Done,
    /// Snapshot for the requesting collaborator
    Status(StatusSnapshot),
    /// Melody for the firmware's one blocking preview path
    Preview(Melody),
    /// Wall time for the clock-source collaborator
    SetClock(WallClock),
}

/// The single owner of all appliance engines
#[derive(Debug, Clone)]
pub struct ClockContext {
    alarm: AlarmEngine,
    timer: TimerEngine,
    alarm_melody: Melody,
    timer_melody: Melody,
    melodies: MelodyConfig,
    sequencer: MelodySequencer,
    screen: ScreenMode,
    last_edge: Option<Tick>,
    last_activity: Tick,
}

impl Default for ClockContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockContext {
    /// Context with factory melodies and nothing armed
    pub fn new() -> Self {
        let melodies = MelodyConfig::default();
        Self {
            alarm: AlarmEngine::new(),
            timer: TimerEngine::new(),
            alarm_melody: Melody::parse(melodies.alarm.as_str()),
            timer_melody: Melody::parse(melodies.timer.as_str()),
            melodies,
            sequencer: MelodySequencer::new(),
            screen: ScreenMode::Home,
            last_edge: None,
            last_activity: 0,
        }
    }

    /// Restore alarm and melodies from a stored configuration
    pub fn load_config(&mut self, config: &ApplianceConfig) {
        self.alarm.restore(&config.alarm);
        self.alarm_melody = Melody::parse(config.melodies.alarm.as_str());
        self.timer_melody = Melody::parse(config.melodies.timer.as_str());
        self.melodies = config.melodies.clone();
    }

    /// Advance everything by one tick
    pub fn tick(&mut self, now: Tick, wall: Option<&WallClock>) -> TickOutput {
        // Info pages fall back to home after ten quiet seconds.
        if matches!(self.screen, ScreenMode::Info(_))
            && now.saturating_sub(self.last_activity) >= HOME_TIMEOUT_MS
        {
            self.screen = ScreenMode::Home;
        }

        if self.alarm.evaluate(wall) == AlarmPoll::Fired {
            self.screen = ScreenMode::Triggered(TriggerSource::Alarm);
            self.sequencer.play(&self.alarm_melody, now);
        }

        // Polled even while the alarm sounds, so the timer's own triggered
        // flag still latches for the LED; the alarm keeps the melody.
        if self.timer.poll_expired(now) && !self.alarm.is_triggered() {
            self.screen = ScreenMode::Triggered(TriggerSource::Timer);
            self.sequencer.play(&self.timer_melody, now);
        }

        let tone = if self.alarm.is_triggered() || self.timer.is_triggered() {
            self.sequencer.tick(now)
        } else {
            if self.sequencer.is_playing() {
                self.sequencer.stop();
            }
            ToneCommand::silence()
        };

        TickOutput {
            led: indicator_color(self.indicator_flags(), now),
            tone,
            screen: self.screen,
        }
    }

    /// Handle a raw button edge
    ///
    /// Edges closer than [`DEBOUNCE_MS`] to the last accepted one are
    /// dropped; returns whether this one counted. While a trigger sounds
    /// the button acknowledges it, otherwise it cycles the screens.
    pub fn button_press(&mut self, now: Tick) -> bool {
        if let Some(last) = self.last_edge {
            if now.saturating_sub(last) < DEBOUNCE_MS {
                return false;
            }
        }
        self.last_edge = Some(now);
        self.last_activity = now;

        if self.alarm.is_triggered() || self.timer.is_triggered() {
            self.acknowledge();
        } else {
            self.screen = match self.screen {
                ScreenMode::Home => ScreenMode::Info(0),
                ScreenMode::Info(page) if page + 1 < INFO_PAGES => ScreenMode::Info(page + 1),
                _ => ScreenMode::Home,
            };
        }
        true
    }

    /// Stop whatever is sounding and clear the triggered flags
    ///
    /// A one-shot alarm disarms itself here, per the alarm contract.
    pub fn acknowledge(&mut self) {
        self.sequencer.stop();
        self.alarm.acknowledge();
        if self.timer.is_triggered() {
            self.timer.clear();
        }
        if matches!(self.screen, ScreenMode::Triggered(_)) {
            self.screen = ScreenMode::Home;
        }
    }

    /// Arm the alarm from a wire-facing schedule
    pub fn set_alarm(
        &mut self,
        schedule: AlarmSchedule,
        hour: u8,
        minute: u8,
        label: &str,
        repeat: bool,
    ) -> Result<(), ConfigError> {
        match schedule {
            AlarmSchedule::Daily => self.alarm.set_daily(hour, minute, label, repeat),
            AlarmSchedule::Weekdays(mask) => {
                self.alarm.set_weekdays(WeekdayMask(mask), hour, minute, label, repeat)
            }
            AlarmSchedule::Date { year, month, day } => {
                self.alarm.set_date(year, month, day, hour, minute, label, repeat)
            }
        }
    }

    /// Disarm the alarm; takes effect this tick, silencing if it sounded
    pub fn clear_alarm(&mut self) {
        if self.alarm.is_triggered() {
            self.sequencer.stop();
            if self.screen == ScreenMode::Triggered(TriggerSource::Alarm) {
                self.screen = ScreenMode::Home;
            }
        }
        self.alarm.clear();
    }

    /// Start the countdown; duration arrives in whole seconds
    pub fn set_timer(&mut self, now: Tick, duration_s: u32, label: &str) -> Result<(), ConfigError> {
        self.timer.start(now, duration_s as Tick * 1_000, label)
    }

    /// Cancel the countdown; takes effect this tick, silencing if it sounded
    pub fn clear_timer(&mut self) {
        if self.timer.is_triggered() {
            self.sequencer.stop();
            if self.screen == ScreenMode::Triggered(TriggerSource::Timer) {
                self.screen = ScreenMode::Home;
            }
        }
        self.timer.clear();
    }

    /// Replace a stored melody wholesale
    ///
    /// A melody already sounding keeps playing from the sequencer's own
    /// copy until the trigger ends.
    pub fn set_melody(&mut self, target: MelodyTarget, tokens: &str) {
        let stored = bounded_tokens(tokens);
        match target {
            MelodyTarget::Alarm => {
                self.alarm_melody = Melody::parse(stored.as_str());
                self.melodies.alarm = stored;
            }
            MelodyTarget::Timer => {
                self.timer_melody = Melody::parse(stored.as_str());
                self.melodies.timer = stored;
            }
        }
    }

    /// Apply a collaborator command
    pub fn apply(&mut self, cmd: &Command, now: Tick) -> Result<Applied, ConfigError> {
        match cmd {
            Command::SetAlarm { schedule, hour, minute, label, repeat } => {
                self.set_alarm(*schedule, *hour, *minute, label.as_str(), *repeat)?;
                Ok(Applied::Done)
            }
            Command::ClearAlarm => {
                self.clear_alarm();
                Ok(Applied::Done)
            }
            Command::SetTimer { duration_s, label } => {
                self.set_timer(now, *duration_s, label.as_str())?;
                Ok(Applied::Done)
            }
            Command::ClearTimer => {
                self.clear_timer();
                Ok(Applied::Done)
            }
            Command::SetMelody { target, tokens } => {
                self.set_melody(*target, tokens.as_str());
                Ok(Applied::Done)
            }
            Command::PreviewMelody { tokens } => Ok(Applied::Preview(Melody::parse(tokens.as_str()))),
            Command::AcknowledgeTrigger => {
                self.acknowledge();
                Ok(Applied::Done)
            }
            Command::Status => Ok(Applied::Status(self.status(now))),
            Command::SetTime { year, month, day, hour, minute, second } => {
                Ok(Applied::SetClock(WallClock {
                    year: *year,
                    month: *month,
                    day: *day,
                    hour: *hour,
                    minute: *minute,
                    second: *second,
                    weekday: crate::clock::weekday_for(*year, *month, *day),
                }))
            }
        }
    }

    /// Read-only snapshot for console/HTTP collaborators
    pub fn status(&self, now: Tick) -> StatusSnapshot {
        let alarm_schedule = self.alarm.mode().map(|mode| match mode {
            AlarmMode::Daily => AlarmSchedule::Daily,
            AlarmMode::Weekdays(mask) => AlarmSchedule::Weekdays(mask.0),
            AlarmMode::Date { year, month, day } => AlarmSchedule::Date { year, month, day },
        });
        StatusSnapshot {
            alarm_active: self.alarm.is_active(),
            alarm_triggered: self.alarm.is_triggered(),
            alarm_schedule,
            alarm_hour: self.alarm.hour(),
            alarm_minute: self.alarm.minute(),
            alarm_repeat: self.alarm.repeat(),
            alarm_label: crate::alarm::bounded_label(self.alarm.label()),
            timer_active: self.timer.is_active(),
            timer_triggered: self.timer.is_triggered(),
            timer_remaining_s: self.timer.remaining_secs(now),
            timer_label: crate::alarm::bounded_label(self.timer.label()),
        }
    }

    /// Label for the full-screen trigger message
    pub fn triggered_label(&self) -> &str {
        match self.screen {
            ScreenMode::Triggered(TriggerSource::Alarm) => self.alarm.label(),
            ScreenMode::Triggered(TriggerSource::Timer) => self.timer.label(),
            _ => "",
        }
    }

    fn indicator_flags(&self) -> IndicatorFlags {
        IndicatorFlags {
            alarm_triggered: self.alarm.is_triggered(),
            timer_triggered: self.timer.is_triggered(),
            alarm_active: self.alarm.is_active(),
            timer_active: self.timer.is_active(),
        }
    }

    pub fn alarm(&self) -> &AlarmEngine {
        &self.alarm
    }

    pub fn alarm_mut(&mut self) -> &mut AlarmEngine {
        &mut self.alarm
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn screen(&self) -> ScreenMode {
        self.screen
    }

    /// Stored melody strings, for the persistence collaborator
    pub fn melody_config(&self) -> &MelodyConfig {
        &self.melodies
    }
}

/// Bound a token string to the stored capacity on a char boundary
fn bounded_tokens(tokens: &str) -> heapless::String<MAX_MELODY_STR_LEN> {
    let mut out = heapless::String::new();
    for c in tokens.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at(hour: u8, minute: u8, second: u8) -> WallClock {
        WallClock {
            year: 2025,
            month: 3,
            day: 17,
            hour,
            minute,
            second,
            weekday: 1,
        }
    }

    #[test]
    fn test_tea_timer_scenario() {
        let mut ctx = ClockContext::new();
        ctx.set_timer(0, 300, "Tea").unwrap();

        // Counting down: green slow blink, silent, home screen.
        let out = ctx.tick(1_000, None);
        assert_eq!(out.screen, ScreenMode::Home);
        assert!(out.tone.is_silent());
        assert_eq!(out.led, LedColor::Green);

        // Expiry: triggered screen, first note of the timer melody.
        let out = ctx.tick(300_000, None);
        assert_eq!(out.screen, ScreenMode::Triggered(TriggerSource::Timer));
        assert!(!out.tone.is_silent());
        assert_eq!(out.led, LedColor::Yellow);
        assert!(ctx.timer().is_triggered());
        assert_eq!(ctx.triggered_label(), "Tea");
    }

    #[test]
    fn test_alarm_fire_and_button_acknowledge() {
        let mut ctx = ClockContext::new();
        ctx.set_alarm(AlarmSchedule::Daily, 7, 30, "Wake", true).unwrap();

        let out = ctx.tick(50_000, Some(&wall_at(7, 30, 0)));
        assert_eq!(out.screen, ScreenMode::Triggered(TriggerSource::Alarm));
        assert!(!out.tone.is_silent());
        assert_eq!(out.led, LedColor::Red);

        // Button during the trigger acknowledges instead of navigating.
        assert!(ctx.button_press(51_000));
        assert!(!ctx.alarm().is_triggered());
        assert!(ctx.alarm().is_active());

        let out = ctx.tick(51_100, Some(&wall_at(7, 30, 1)));
        assert_eq!(out.screen, ScreenMode::Home);
        assert!(out.tone.is_silent());
    }

    #[test]
    fn test_unsynchronized_clock_suppresses_alarm() {
        let mut ctx = ClockContext::new();
        ctx.set_alarm(AlarmSchedule::Daily, 7, 30, "", true).unwrap();
        let out = ctx.tick(1_000, None);
        assert!(!ctx.alarm().is_triggered());
        assert!(out.tone.is_silent());
        // Armed alarm still shows solid blue.
        assert_eq!(out.led, LedColor::Blue);
    }

    #[test]
    fn test_melody_loops_while_trigger_active() {
        let mut ctx = ClockContext::new();
        ctx.set_melody(MelodyTarget::Timer, "C5 Q D5 Q E5 H");
        ctx.set_timer(0, 1, "").unwrap();

        let out = ctx.tick(1_000, None);
        assert_eq!(out.tone, ToneCommand::tone(523));
        assert_eq!(ctx.tick(1_250, None).tone, ToneCommand::tone(587));
        assert_eq!(ctx.tick(1_500, None).tone, ToneCommand::tone(659));
        // Wraps back to the first note, still sounding.
        assert_eq!(ctx.tick(2_000, None).tone, ToneCommand::tone(523));
    }

    #[test]
    fn test_clear_timer_silences_same_call() {
        let mut ctx = ClockContext::new();
        ctx.set_timer(0, 1, "").unwrap();
        let out = ctx.tick(1_000, None);
        assert!(!out.tone.is_silent());

        ctx.clear_timer();
        // Synchronous: silent before any further tick.
        let out = ctx.tick(1_001, None);
        assert!(out.tone.is_silent());
        assert_eq!(out.screen, ScreenMode::Home);
        assert_eq!(out.led, LedColor::Off);
    }

    #[test]
    fn test_button_debounce_drops_close_edges() {
        let mut ctx = ClockContext::new();
        assert!(ctx.button_press(1_000));
        assert_eq!(ctx.screen(), ScreenMode::Info(0));
        // 299 ms later: bounce, ignored.
        assert!(!ctx.button_press(1_299));
        assert_eq!(ctx.screen(), ScreenMode::Info(0));
        // 300 ms later: accepted.
        assert!(ctx.button_press(1_300));
        assert_eq!(ctx.screen(), ScreenMode::Info(1));
    }

    #[test]
    fn test_button_cycles_screens() {
        let mut ctx = ClockContext::new();
        assert_eq!(ctx.screen(), ScreenMode::Home);
        ctx.button_press(1_000);
        assert_eq!(ctx.screen(), ScreenMode::Info(0));
        ctx.button_press(2_000);
        assert_eq!(ctx.screen(), ScreenMode::Info(1));
        ctx.button_press(3_000);
        assert_eq!(ctx.screen(), ScreenMode::Home);
    }

    #[test]
    fn test_info_screen_returns_home_after_timeout() {
        let mut ctx = ClockContext::new();
        ctx.button_press(1_000);
        assert_eq!(ctx.screen(), ScreenMode::Info(0));

        let out = ctx.tick(10_999, None);
        assert_eq!(out.screen, ScreenMode::Info(0));
        let out = ctx.tick(11_000, None);
        assert_eq!(out.screen, ScreenMode::Home);
    }

    #[test]
    fn test_one_shot_alarm_disarms_via_acknowledge() {
        let mut ctx = ClockContext::new();
        ctx.set_alarm(AlarmSchedule::Daily, 7, 30, "", false).unwrap();
        ctx.tick(0, Some(&wall_at(7, 30, 0)));
        assert!(ctx.alarm().is_triggered());

        ctx.acknowledge();
        assert!(!ctx.alarm().is_active());
    }

    #[test]
    fn test_alarm_trigger_outranks_timer_trigger() {
        let mut ctx = ClockContext::new();
        ctx.set_melody(MelodyTarget::Alarm, "C5 W");
        ctx.set_melody(MelodyTarget::Timer, "A5 W");
        ctx.set_alarm(AlarmSchedule::Daily, 7, 30, "", true).unwrap();
        ctx.set_timer(0, 1, "").unwrap();

        // Both fire on the same tick: alarm owns screen and melody.
        let out = ctx.tick(1_000, Some(&wall_at(7, 30, 0)));
        assert_eq!(out.screen, ScreenMode::Triggered(TriggerSource::Alarm));
        assert_eq!(out.tone, ToneCommand::tone(523));
        assert_eq!(out.led, LedColor::Red);
        // Timer still latched its own flag.
        assert!(ctx.timer().is_triggered());
    }

    #[test]
    fn test_command_application_round_trip() {
        let mut ctx = ClockContext::new();

        let cmd = Command::parse_line("alarm week MTWTF-- 06:45 work").unwrap();
        assert!(matches!(ctx.apply(&cmd, 0), Ok(Applied::Done)));
        assert!(ctx.alarm().is_active());

        let cmd = Command::parse_line("timer 300 Tea").unwrap();
        ctx.apply(&cmd, 5_000).unwrap();
        assert!(ctx.timer().is_active());

        let cmd = Command::parse_line("status").unwrap();
        let Ok(Applied::Status(status)) = ctx.apply(&cmd, 5_000) else {
            panic!("expected status");
        };
        assert!(status.alarm_active);
        assert_eq!(status.alarm_schedule, Some(AlarmSchedule::Weekdays(0b0011111)));
        assert_eq!(status.alarm_hour, 6);
        assert_eq!(status.alarm_minute, 45);
        assert_eq!(status.alarm_label.as_str(), "work");
        assert!(status.timer_active);
        assert_eq!(status.timer_remaining_s, 300);
        assert_eq!(status.timer_label.as_str(), "Tea");
    }

    #[test]
    fn test_invalid_commands_reject_atomically() {
        let mut ctx = ClockContext::new();
        ctx.set_alarm(AlarmSchedule::Daily, 7, 0, "keep", true).unwrap();

        let err = ctx.set_timer(0, 24 * 60 * 60 + 1, "");
        assert_eq!(err, Err(ConfigError::InvalidDuration));
        assert!(!ctx.timer().is_active());
        assert_eq!(ctx.alarm().label(), "keep");
    }

    #[test]
    fn test_preview_command_yields_parsed_melody() {
        let mut ctx = ClockContext::new();
        let cmd = Command::parse_line("preview C5 Q D5 Q E5 H").unwrap();
        let Ok(Applied::Preview(melody)) = ctx.apply(&cmd, 0) else {
            panic!("expected preview");
        };
        assert_eq!(melody.len(), 3);
        // Preview does not disturb the engines.
        assert!(!ctx.alarm().is_active());
        assert!(!ctx.timer().is_active());
    }

    #[test]
    fn test_set_time_command_produces_wall_clock() {
        let mut ctx = ClockContext::new();
        let cmd = Command::parse_line("time 2025-03-17 21:04:30").unwrap();
        let Ok(Applied::SetClock(wall)) = ctx.apply(&cmd, 0) else {
            panic!("expected clock");
        };
        // 2025-03-17 is a Monday.
        assert_eq!(wall.weekday, 1);
        assert_eq!(wall.hour, 21);
    }
}
