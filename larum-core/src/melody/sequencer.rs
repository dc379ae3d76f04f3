//! Melody playback sequencing
//!
//! Playback is a polled state machine, never a blocking call. Each tick
//! compares the monotonic clock against the current note's deadline and
//! advances when it has passed; the melody loops until the caller stops
//! it. The sequencer only decides *what* should be sounding — the tone
//! command it returns is applied to a [`ToneSink`](crate::traits::ToneSink)
//! by the scheduler, which is the sole writer of the audio output.

use crate::clock::Tick;

use super::Melody;

/// Desired tone output for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneCommand {
    /// Frequency in Hz; zero means silence
    pub freq_hz: u32,
}

impl ToneCommand {
    /// Silent output
    pub const fn silence() -> Self {
        Self { freq_hz: 0 }
    }

    /// An audible tone
    pub const fn tone(freq_hz: u32) -> Self {
        Self { freq_hz }
    }

    pub const fn is_silent(&self) -> bool {
        self.freq_hz == 0
    }
}

/// Playback position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Idle,
    Playing { index: usize, note_start: Tick },
}

/// The playback state machine
///
/// Owns a copy of the melody for the duration of playback, the same way
/// the configuration snapshot pattern works elsewhere: a re-parse of the
/// stored token string does not disturb a melody already sounding.
#[derive(Debug, Clone, Default)]
pub struct MelodySequencer {
    melody: Melody,
    playback: Playback,
}

impl Default for Playback {
    fn default() -> Self {
        Playback::Idle
    }
}

impl MelodySequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin looping playback from the first note
    ///
    /// Returns false (and stays idle) for an empty melody.
    pub fn play(&mut self, melody: &Melody, now: Tick) -> bool {
        if melody.is_empty() {
            return false;
        }
        self.melody = melody.clone();
        self.playback = Playback::Playing { index: 0, note_start: now };
        true
    }

    /// Advance playback and report the tone that should be sounding
    ///
    /// While playing, the melody wraps from its last note back to the
    /// first indefinitely; ending playback is the caller's decision, made
    /// when the underlying trigger is acknowledged or cleared.
    pub fn tick(&mut self, now: Tick) -> ToneCommand {
        let Playback::Playing { index, note_start } = self.playback else {
            return ToneCommand::silence();
        };
        let Some(note) = self.melody.get(index) else {
            // Unreachable with a non-empty melody; fail silent.
            self.stop();
            return ToneCommand::silence();
        };
        if now.saturating_sub(note_start) >= note.duration_ms as Tick {
            let next = (index + 1) % self.melody.len();
            self.playback = Playback::Playing { index: next, note_start: now };
        }
        self.current()
    }

    /// Silence output and return to idle
    pub fn stop(&mut self) {
        self.playback = Playback::Idle;
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    /// Tone for the current position without advancing
    pub fn current(&self) -> ToneCommand {
        match self.playback {
            Playback::Playing { index, .. } => match self.melody.get(index) {
                Some(note) => ToneCommand::tone(note.freq_hz),
                None => ToneCommand::silence(),
            },
            Playback::Idle => ToneCommand::silence(),
        }
    }
}
