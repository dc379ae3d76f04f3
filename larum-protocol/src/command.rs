//! Commands and their console text encoding

use heapless::{String, Vec};

use crate::{MAX_LABEL_LEN, MAX_MELODY_STR_LEN};

/// Which melody a melody command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MelodyTarget {
    Alarm,
    Timer,
}

/// Wire-facing alarm schedule
///
/// The weekday mask uses bit 0 = Monday .. bit 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlarmSchedule {
    Daily,
    Weekdays(u8),
    Date { year: u16, month: u8, day: u8 },
}

/// Everything a collaborator can ask of the core
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetAlarm {
        schedule: AlarmSchedule,
        hour: u8,
        minute: u8,
        label: String<MAX_LABEL_LEN>,
        repeat: bool,
    },
    ClearAlarm,
    SetTimer {
        duration_s: u32,
        label: String<MAX_LABEL_LEN>,
    },
    ClearTimer,
    SetMelody {
        target: MelodyTarget,
        tokens: String<MAX_MELODY_STR_LEN>,
    },
    PreviewMelody {
        tokens: String<MAX_MELODY_STR_LEN>,
    },
    /// The physical button / API stop action
    AcknowledgeTrigger,
    Status,
    /// Feed the clock-source collaborator
    SetTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
}

/// Parse failures; the console echoes these back verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    Empty,
    UnknownCommand,
    MissingArgument,
    InvalidTime,
    InvalidDate,
    InvalidMask,
    InvalidDuration,
    LabelTooLong,
    MelodyTooLong,
}

impl Command {
    /// Parse one console line
    ///
    /// Command words are case-insensitive; labels are taken verbatim.
    pub fn parse_line(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };

        if head.eq_ignore_ascii_case("alarm") {
            parse_alarm(&mut words)
        } else if head.eq_ignore_ascii_case("timer") {
            parse_timer(&mut words)
        } else if head.eq_ignore_ascii_case("melody") {
            let target = match words.next() {
                Some(t) if t.eq_ignore_ascii_case("alarm") => MelodyTarget::Alarm,
                Some(t) if t.eq_ignore_ascii_case("timer") => MelodyTarget::Timer,
                Some(_) => return Err(CommandError::UnknownCommand),
                None => return Err(CommandError::MissingArgument),
            };
            let tokens = collect_tokens(&mut words)?;
            Ok(Command::SetMelody { target, tokens })
        } else if head.eq_ignore_ascii_case("preview") {
            let tokens = collect_tokens(&mut words)?;
            Ok(Command::PreviewMelody { tokens })
        } else if head.eq_ignore_ascii_case("stop") {
            Ok(Command::AcknowledgeTrigger)
        } else if head.eq_ignore_ascii_case("status") {
            Ok(Command::Status)
        } else if head.eq_ignore_ascii_case("time") {
            parse_time(&mut words)
        } else {
            Err(CommandError::UnknownCommand)
        }
    }
}

fn parse_alarm<'a, I>(words: &mut I) -> Result<Command, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let sub = words.next().ok_or(CommandError::MissingArgument)?;

    if sub.eq_ignore_ascii_case("off") {
        return Ok(Command::ClearAlarm);
    }

    let schedule = if sub.eq_ignore_ascii_case("daily") {
        AlarmSchedule::Daily
    } else if sub.eq_ignore_ascii_case("week") {
        let mask = parse_mask(words.next().ok_or(CommandError::MissingArgument)?)?;
        AlarmSchedule::Weekdays(mask)
    } else if sub.eq_ignore_ascii_case("date") {
        let (year, month, day) = parse_date(words.next().ok_or(CommandError::MissingArgument)?)?;
        AlarmSchedule::Date { year, month, day }
    } else {
        return Err(CommandError::UnknownCommand);
    };

    let (hour, minute) = parse_hhmm(words.next().ok_or(CommandError::MissingArgument)?)?;
    let (label, repeat) = parse_label_flags(words)?;

    Ok(Command::SetAlarm { schedule, hour, minute, label, repeat })
}

fn parse_timer<'a, I>(words: &mut I) -> Result<Command, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let arg = words.next().ok_or(CommandError::MissingArgument)?;
    if arg.eq_ignore_ascii_case("off") {
        return Ok(Command::ClearTimer);
    }
    let duration_s: u32 = arg.parse().map_err(|_| CommandError::InvalidDuration)?;
    let label = join_words(words)?;
    Ok(Command::SetTimer { duration_s, label })
}

fn parse_time<'a, I>(words: &mut I) -> Result<Command, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let (year, month, day) = parse_date(words.next().ok_or(CommandError::MissingArgument)?)?;
    let clock = words.next().ok_or(CommandError::MissingArgument)?;

    let mut parts = clock.split(':');
    let hour: u8 = parse_field(parts.next(), CommandError::InvalidTime)?;
    let minute: u8 = parse_field(parts.next(), CommandError::InvalidTime)?;
    let second: u8 = parse_field(parts.next(), CommandError::InvalidTime)?;
    if parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
        return Err(CommandError::InvalidTime);
    }

    Ok(Command::SetTime { year, month, day, hour, minute, second })
}

/// `HH:MM`, 24-hour
fn parse_hhmm(token: &str) -> Result<(u8, u8), CommandError> {
    let (h, m) = token.split_once(':').ok_or(CommandError::InvalidTime)?;
    let hour: u8 = h.parse().map_err(|_| CommandError::InvalidTime)?;
    let minute: u8 = m.parse().map_err(|_| CommandError::InvalidTime)?;
    if hour > 23 || minute > 59 {
        return Err(CommandError::InvalidTime);
    }
    Ok((hour, minute))
}

/// `YYYY-MM-DD`
fn parse_date(token: &str) -> Result<(u16, u8, u8), CommandError> {
    let mut parts = token.split('-');
    let year: u16 = parse_field(parts.next(), CommandError::InvalidDate)?;
    let month: u8 = parse_field(parts.next(), CommandError::InvalidDate)?;
    let day: u8 = parse_field(parts.next(), CommandError::InvalidDate)?;
    if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(CommandError::InvalidDate);
    }
    Ok((year, month, day))
}

fn parse_field<T: core::str::FromStr>(
    part: Option<&str>,
    err: CommandError,
) -> Result<T, CommandError> {
    part.ok_or(err)?.parse().map_err(|_| err)
}

/// Seven flag characters, Monday first; `-` means off
fn parse_mask(token: &str) -> Result<u8, CommandError> {
    let mut mask = 0u8;
    let mut count = 0;
    for (i, c) in token.chars().enumerate() {
        if i >= 7 {
            return Err(CommandError::InvalidMask);
        }
        if c != '-' {
            mask |= 1 << i;
        }
        count += 1;
    }
    if count != 7 {
        return Err(CommandError::InvalidMask);
    }
    Ok(mask)
}

/// Remaining words form the label; a trailing `once` flag disables repeat
fn parse_label_flags<'a, I>(words: &mut I) -> Result<(String<MAX_LABEL_LEN>, bool), CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let mut parts: Vec<&str, 16> = Vec::new();
    for word in words {
        parts.push(word).map_err(|_| CommandError::LabelTooLong)?;
    }

    let repeat = match parts.last() {
        Some(last) if last.eq_ignore_ascii_case("once") => {
            parts.pop();
            false
        }
        _ => true,
    };

    let label = join_words(&mut parts.iter().copied())?;
    Ok((label, repeat))
}

/// Space-join words into a bounded label
fn join_words<'a, I>(words: &mut I) -> Result<String<MAX_LABEL_LEN>, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let mut label = String::new();
    for word in words {
        if !label.is_empty() {
            label.push(' ').map_err(|_| CommandError::LabelTooLong)?;
        }
        label.push_str(word).map_err(|_| CommandError::LabelTooLong)?;
    }
    Ok(label)
}

/// Remaining words form the melody token string, space-joined
fn collect_tokens<'a, I>(words: &mut I) -> Result<String<MAX_MELODY_STR_LEN>, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    let mut tokens = String::new();
    for word in words {
        if !tokens.is_empty() {
            tokens.push(' ').map_err(|_| CommandError::MelodyTooLong)?;
        }
        tokens.push_str(word).map_err(|_| CommandError::MelodyTooLong)?;
    }
    if tokens.is_empty() {
        return Err(CommandError::MissingArgument);
    }
    Ok(tokens)
}
