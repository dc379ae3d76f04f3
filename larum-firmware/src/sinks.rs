//! Tone sink implementations
//!
//! Two ways of making noise, selected once at boot from the stored
//! [`BuzzerKind`](larum_core::config::BuzzerKind) rather than at compile
//! time. The on/off sink drives a fixed-frequency oscillator module
//! through any GPIO and ignores the requested pitch entirely; the PWM
//! sink reprograms a PWM slice to the requested frequency.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_hal::digital::OutputPin;

use larum_core::traits::ToneSink;

/// PWM counter base clock after dividing the 125 MHz system clock
const PWM_BASE_HZ: u32 = 1_000_000;

/// Divider taking 125 MHz down to [`PWM_BASE_HZ`]
const PWM_DIVIDER: u8 = 125;

/// Fixed-frequency oscillator behind a GPIO
///
/// Presence or absence of tone is the whole signal; `freq_hz` is ignored.
pub struct OnOffSink<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> OnOffSink<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> ToneSink for OnOffSink<P> {
    fn tone(&mut self, freq_hz: u32) {
        if freq_hz == 0 {
            let _ = self.pin.set_low();
        } else {
            let _ = self.pin.set_high();
        }
    }

    fn silence(&mut self) {
        let _ = self.pin.set_low();
    }
}

/// PWM slice generating the requested frequency at 50% duty
pub struct PwmFrequencySink {
    pwm: Pwm<'static>,
}

impl PwmFrequencySink {
    pub fn new(pwm: Pwm<'static>) -> Self {
        Self { pwm }
    }
}

impl ToneSink for PwmFrequencySink {
    fn tone(&mut self, freq_hz: u32) {
        if freq_hz == 0 {
            self.silence();
            return;
        }
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        // Clamp so sub-16 Hz requests cannot overflow the 16-bit counter.
        let top = (PWM_BASE_HZ / freq_hz).min(u16::MAX as u32) as u16;
        config.top = top;
        config.compare_a = top / 2;
        config.compare_b = top / 2;
        self.pwm.set_config(&config);
    }

    fn silence(&mut self) {
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        config.compare_a = 0;
        config.compare_b = 0;
        self.pwm.set_config(&config);
    }
}

/// The sink chosen at boot
///
/// Enum dispatch keeps the selection a runtime decision without needing
/// an allocator for trait objects.
pub enum AnySink<P: OutputPin> {
    OnOff(OnOffSink<P>),
    Pwm(PwmFrequencySink),
}

impl<P: OutputPin> ToneSink for AnySink<P> {
    fn tone(&mut self, freq_hz: u32) {
        match self {
            AnySink::OnOff(sink) => sink.tone(freq_hz),
            AnySink::Pwm(sink) => sink.tone(freq_hz),
        }
    }

    fn silence(&mut self) {
        match self {
            AnySink::OnOff(sink) => sink.silence(),
            AnySink::Pwm(sink) => sink.silence(),
        }
    }
}
