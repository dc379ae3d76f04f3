//! Tone output capability
//!
//! The sequencer decides what should sound; a `ToneSink` makes it audible.
//! Which sink backs the appliance is decided once at startup from stored
//! configuration, not per call and not at compile time.

use crate::melody::ToneCommand;

/// A thing that can emit (or approximate) a tone
///
/// Implementations are free to ignore the frequency: the fixed-frequency
/// oscillator sink only uses presence or absence of tone as the signal,
/// while the PWM sink reproduces the pitch.
pub trait ToneSink {
    /// Start sounding at the given frequency; zero behaves like `silence`
    fn tone(&mut self, freq_hz: u32);

    /// Stop sounding
    fn silence(&mut self);

    /// Apply a sequencer command
    fn apply(&mut self, cmd: ToneCommand) {
        if cmd.is_silent() {
            self.silence();
        } else {
            self.tone(cmd.freq_hz);
        }
    }
}
