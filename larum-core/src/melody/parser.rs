//! Note-token parsing
//!
//! The grammar is whitespace-separated `note duration` pairs, e.g.
//! `"C5 Q E5 Q G5 H"`. Parsing is tolerant by contract: an unrecognized
//! duration code falls back to a quarter note, and an unrecognized note
//! letter or octave degrades to a pause. Malformed input therefore never
//! fails the whole string, it only silences the offending note. This
//! matches what users expect when hand-editing melodies over the console:
//! a typo costs one beat, not the tune.

use super::{semitone_frequency, Melody, Note, DEFAULT_OCTAVE};

/// Duration code values in milliseconds
pub const WHOLE_MS: u32 = 1000;
pub const HALF_MS: u32 = 500;
pub const QUARTER_MS: u32 = 250;
pub const EIGHTH_MS: u32 = 125;
pub const SIXTEENTH_MS: u32 = 63;

impl Melody {
    /// Parse a token string
    ///
    /// Never fails; see the module notes on tolerance. Parsing stops
    /// silently once the note capacity is reached.
    pub fn parse(input: &str) -> Self {
        let mut melody = Melody::new();
        let mut tokens = input.split_whitespace();
        while let Some(note_token) = tokens.next() {
            // A trailing note with no duration takes the quarter default,
            // same as an unrecognized duration code.
            let duration_ms = tokens.next().map_or(QUARTER_MS, duration_code_ms);
            let note = Note {
                freq_hz: note_frequency(note_token),
                duration_ms,
            };
            if !melody.push_truncating(note) {
                break;
            }
        }
        melody
    }
}

/// Map a duration code token to milliseconds
fn duration_code_ms(token: &str) -> u32 {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => match code.to_ascii_uppercase() {
            'W' => WHOLE_MS,
            'H' => HALF_MS,
            'Q' => QUARTER_MS,
            'E' => EIGHTH_MS,
            'S' => SIXTEENTH_MS,
            _ => QUARTER_MS,
        },
        _ => QUARTER_MS,
    }
}

/// Resolve a note token to a frequency, zero for pauses and junk
fn note_frequency(token: &str) -> u32 {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    let letter = first.to_ascii_uppercase();
    if letter == 'P' {
        return 0;
    }
    let mut semitone: u8 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return 0,
    };

    let mut next = chars.next();
    if next == Some('#') {
        semitone += 1;
        next = chars.next();
    }

    let mut octave = match next {
        None => DEFAULT_OCTAVE,
        Some(d @ '0'..='9') => d as u8 - b'0',
        Some(_) => return 0,
    };
    if chars.next().is_some() {
        return 0;
    }

    // B# wraps to C of the next octave.
    if semitone == 12 {
        semitone = 0;
        octave += 1;
    }

    semitone_frequency(semitone, octave).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::MAX_NOTES;

    #[test]
    fn test_chime_round_trip() {
        let melody = Melody::parse("C5 Q D5 Q E5 H");
        assert_eq!(melody.len(), 3);
        assert_eq!(melody.get(0), Some(Note { freq_hz: 523, duration_ms: 250 }));
        assert_eq!(melody.get(1), Some(Note { freq_hz: 587, duration_ms: 250 }));
        assert_eq!(melody.get(2), Some(Note { freq_hz: 659, duration_ms: 500 }));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Melody::parse("c#4 q"), Melody::parse("C#4 Q"));
        assert_eq!(Melody::parse("a5 w"), Melody::parse("A5 W"));
    }

    #[test]
    fn test_pause_token() {
        let melody = Melody::parse("P W");
        assert_eq!(melody.get(0), Some(Note::pause(1000)));
    }

    #[test]
    fn test_all_duration_codes() {
        let melody = Melody::parse("A4 W A4 H A4 Q A4 E A4 S");
        let durations: heapless::Vec<u32, 5> = melody.iter().map(|n| n.duration_ms).collect();
        assert_eq!(durations.as_slice(), &[1000, 500, 250, 125, 63]);
    }

    #[test]
    fn test_default_octave_is_four() {
        let melody = Melody::parse("A Q");
        assert_eq!(melody.get(0).unwrap().freq_hz, 440);
    }

    #[test]
    fn test_sharp_notes() {
        let melody = Melody::parse("F#4 Q C#5 Q");
        assert_eq!(melody.get(0).unwrap().freq_hz, 370);
        assert_eq!(melody.get(1).unwrap().freq_hz, 554);
    }

    #[test]
    fn test_unrecognized_duration_defaults_to_quarter() {
        let melody = Melody::parse("C5 X C5 longcode");
        assert_eq!(melody.get(0).unwrap().duration_ms, 250);
        assert_eq!(melody.get(1).unwrap().duration_ms, 250);
    }

    #[test]
    fn test_trailing_note_without_duration() {
        let melody = Melody::parse("C5 Q D5");
        assert_eq!(melody.len(), 2);
        assert_eq!(melody.get(1).unwrap().duration_ms, 250);
    }

    #[test]
    fn test_junk_degrades_to_pause_not_failure() {
        let melody = Melody::parse("Z4 Q C9 Q C2 Q banana Q C5 H");
        assert_eq!(melody.len(), 5);
        assert!(melody.get(0).unwrap().is_pause());
        assert!(melody.get(1).unwrap().is_pause());
        assert!(melody.get(2).unwrap().is_pause());
        assert!(melody.get(3).unwrap().is_pause());
        // The valid tail still parses.
        assert_eq!(melody.get(4), Some(Note { freq_hz: 523, duration_ms: 500 }));
    }

    #[test]
    fn test_capacity_truncates_silently() {
        let mut input = heapless::String::<512>::new();
        for _ in 0..(MAX_NOTES + 10) {
            let _ = input.push_str("C5 Q ");
        }
        let melody = Melody::parse(input.as_str());
        assert_eq!(melody.len(), MAX_NOTES);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(Melody::parse("").is_empty());
        assert!(Melody::parse("   \n\t ").is_empty());
    }
}
