//! Screen composition
//!
//! Builds each of the scheduler's screen modes out of layout passes and
//! backend draw calls. All text placement goes through the core layout
//! engine; when even the smallest font cannot represent a message, the
//! fixed [`TOO_LONG_TEXT`] placeholder is shown instead, per the layout
//! contract.

use core::fmt::Write as _;

use heapless::String;

use larum_core::clock::{Tick, WallClock};
use larum_core::context::{ScreenMode, TriggerSource};
use larum_core::layout::{fit, FontMetrics, LayoutError, Rect};
use larum_protocol::{AlarmSchedule, StatusSnapshot, MAX_LABEL_LEN};

use crate::backend::{DisplayBackend, DisplayError};
use crate::fonts::{FONT_CANDIDATES, SMALL_FONTS, SMALL_FONTS_BASE_INDEX};

/// Fixed placeholder when no font candidate fits a message
pub const TOO_LONG_TEXT: &str = "<TOO LONG>";

/// Blink period of the home-screen colon
pub const COLON_BLINK_MS: Tick = 500;

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Everything a render pass needs, copied out of the context by the
/// controller so the backend write happens in one place
///
/// Comparable, so the controller can skip republishing an unchanged
/// frame; the colon phase arrives pre-derived for the same reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub screen: ScreenMode,
    pub colon_on: bool,
    pub wall: Option<WallClock>,
    pub status: StatusSnapshot,
    pub triggered_label: String<MAX_LABEL_LEN>,
}

impl ViewModel {
    /// Colon phase for a given tick
    pub const fn colon_phase(now: Tick) -> bool {
        (now / COLON_BLINK_MS) % 2 == 0
    }
}

/// Render the current screen
pub fn render(backend: &mut impl DisplayBackend, model: &ViewModel) -> Result<(), DisplayError> {
    backend.clear()?;
    match model.screen {
        ScreenMode::Home => render_home(backend, model)?,
        ScreenMode::Info(0) => render_alarm_info(backend, model)?,
        ScreenMode::Info(_) => render_timer_info(backend, model)?,
        ScreenMode::Triggered(source) => render_triggered(backend, model, source)?,
    }
    backend.flush()
}

/// Home clock: big time on top, date and armed summary below
fn render_home(backend: &mut impl DisplayBackend, model: &ViewModel) -> Result<(), DisplayError> {
    let (width, height) = backend.dimensions();
    let clock_height = height * 2 / 3;

    let mut time_text: String<8> = String::new();
    match &model.wall {
        Some(wall) => {
            let colon = if model.colon_on { ':' } else { ' ' };
            let _ = write!(time_text, "{:02}{}{:02}", wall.hour, colon, wall.minute);
        }
        None => {
            let _ = time_text.push_str("--:--");
        }
    }
    draw_fitted(
        backend,
        time_text.as_str(),
        Rect::new(width, clock_height),
        (0, 0),
        &FONT_CANDIDATES,
        0,
    )?;

    let line_height = (height - clock_height) / 2;

    let mut date_text: String<24> = String::new();
    match &model.wall {
        Some(wall) => {
            let _ = write!(
                date_text,
                "{:04}-{:02}-{:02} {}",
                wall.year,
                wall.month,
                wall.day,
                WEEKDAY_NAMES[wall.weekday as usize % 7]
            );
        }
        None => {
            let _ = date_text.push_str("CLOCK NOT SET");
        }
    }
    draw_fitted(
        backend,
        date_text.as_str(),
        Rect::new(width, line_height),
        (0, clock_height),
        &SMALL_FONTS,
        SMALL_FONTS_BASE_INDEX,
    )?;

    let summary = armed_summary(&model.status);
    draw_fitted(
        backend,
        summary.as_str(),
        Rect::new(width, line_height),
        (0, clock_height + line_height),
        &SMALL_FONTS,
        SMALL_FONTS_BASE_INDEX,
    )
}

/// Info page 0: alarm configuration
fn render_alarm_info(
    backend: &mut impl DisplayBackend,
    model: &ViewModel,
) -> Result<(), DisplayError> {
    let status = &model.status;
    let mut rows = RowWriter::new(backend, 4);
    rows.draw("ALARM")?;
    if status.alarm_active {
        let mut time_row: String<8> = String::new();
        let _ = write!(time_row, "{:02}:{:02}", status.alarm_hour, status.alarm_minute);
        rows.draw(time_row.as_str())?;
        rows.draw(schedule_text(status.alarm_schedule).as_str())?;
        if status.alarm_label.is_empty() {
            rows.draw(if status.alarm_repeat { "REPEAT" } else { "ONCE" })
        } else {
            rows.draw(status.alarm_label.as_str())
        }
    } else {
        rows.draw("OFF")
    }
}

/// Info page 1: timer state
fn render_timer_info(
    backend: &mut impl DisplayBackend,
    model: &ViewModel,
) -> Result<(), DisplayError> {
    let status = &model.status;
    let mut rows = RowWriter::new(backend, 4);
    rows.draw("TIMER")?;
    if status.timer_active {
        rows.draw(format_duration(status.timer_remaining_s).as_str())?;
        if !status.timer_label.is_empty() {
            rows.draw(status.timer_label.as_str())?;
        }
        Ok(())
    } else {
        rows.draw("OFF")
    }
}

/// Full-screen trigger message
fn render_triggered(
    backend: &mut impl DisplayBackend,
    model: &ViewModel,
    source: TriggerSource,
) -> Result<(), DisplayError> {
    let (width, height) = backend.dimensions();
    let message = if model.triggered_label.is_empty() {
        match source {
            TriggerSource::Alarm => "ALARM",
            TriggerSource::Timer => "TIME UP",
        }
    } else {
        model.triggered_label.as_str()
    };
    draw_fitted(
        backend,
        message,
        Rect::new(width, height),
        (0, 0),
        &FONT_CANDIDATES,
        0,
    )
}

/// Lay text out in a sub-rect and draw it, falling back to the fixed
/// placeholder when no candidate fits
fn draw_fitted(
    backend: &mut impl DisplayBackend,
    text: &str,
    rect: Rect,
    origin: (u32, u32),
    fonts: &[FontMetrics],
    base_index: usize,
) -> Result<(), DisplayError> {
    match fit(text, rect, fonts) {
        Ok(layout) => {
            for line in layout.lines.iter() {
                backend.draw_text(
                    origin.0 + line.x,
                    origin.1 + line.y,
                    base_index + layout.font_index,
                    line.content,
                )?;
            }
            Ok(())
        }
        Err(LayoutError::TooLong) => {
            // Smallest available font, top-left; the backend clips.
            backend.draw_text(
                origin.0,
                origin.1,
                base_index + fonts.len().saturating_sub(1),
                TOO_LONG_TEXT,
            )
        }
    }
}

/// Evenly stacked rows drawn with the small-font ladder
struct RowWriter<'a, B: DisplayBackend> {
    backend: &'a mut B,
    row_height: u32,
    width: u32,
    next_y: u32,
}

impl<'a, B: DisplayBackend> RowWriter<'a, B> {
    fn new(backend: &'a mut B, rows: u32) -> Self {
        let (width, height) = backend.dimensions();
        Self {
            backend,
            row_height: height / rows,
            width,
            next_y: 0,
        }
    }

    fn draw(&mut self, text: &str) -> Result<(), DisplayError> {
        let y = self.next_y;
        self.next_y += self.row_height;
        draw_fitted(
            self.backend,
            text,
            Rect::new(self.width, self.row_height),
            (0, y),
            &SMALL_FONTS,
            SMALL_FONTS_BASE_INDEX,
        )
    }
}

/// Short schedule description for the alarm info page
fn schedule_text(schedule: Option<AlarmSchedule>) -> String<16> {
    let mut out = String::new();
    match schedule {
        Some(AlarmSchedule::Daily) | None => {
            let _ = out.push_str("DAILY");
        }
        Some(AlarmSchedule::Weekdays(mask)) => {
            const LETTERS: [char; 7] = ['M', 'T', 'W', 'T', 'F', 'S', 'S'];
            for (i, letter) in LETTERS.iter().enumerate() {
                let _ = out.push(if mask & (1 << i) != 0 { *letter } else { '-' });
            }
        }
        Some(AlarmSchedule::Date { year, month, day }) => {
            let _ = write!(out, "{:04}-{:02}-{:02}", year, month, day);
        }
    }
    out
}

/// One-line summary of what is armed, for the home screen
fn armed_summary(status: &StatusSnapshot) -> String<32> {
    let mut out = String::new();
    if status.alarm_active {
        let _ = write!(out, "AL {:02}:{:02}", status.alarm_hour, status.alarm_minute);
    }
    if status.timer_active {
        if !out.is_empty() {
            let _ = out.push(' ');
        }
        let _ = write!(out, "TM {}", format_duration(status.timer_remaining_s));
    }
    out
}

/// `MM:SS`, or `H:MM:SS` past the hour mark
fn format_duration(total_s: u32) -> String<12> {
    let mut out = String::new();
    let hours = total_s / 3600;
    let minutes = (total_s % 3600) / 60;
    let seconds = total_s % 60;
    if hours > 0 {
        let _ = write!(out, "{}:{:02}:{:02}", hours, minutes, seconds);
    } else {
        let _ = write!(out, "{:02}:{:02}", minutes, seconds);
    }
    out
}
