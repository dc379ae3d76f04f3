//! Persisted configuration records
//!
//! These types represent what the storage collaborator keeps across resets,
//! serialized as postcard binary. The core itself never performs I/O; the
//! firmware loads records at boot and writes them back when the console or
//! HTTP collaborators change something. The running timer is deliberately
//! not persisted.

use heapless::String;

use crate::MAX_LABEL_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Record layout version, checked by the firmware loader
pub const CONFIG_VERSION: u8 = 1;

/// Maximum stored melody token string length
pub const MAX_MELODY_STR_LEN: usize = 256;

/// Alarm mode discriminants in [`AlarmRecord::mode`]
pub const MODE_DAILY: u8 = 0;
pub const MODE_WEEKDAYS: u8 = 1;
pub const MODE_DATE: u8 = 2;

/// Which tone output the board carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuzzerKind {
    /// Fixed-frequency oscillator behind a GPIO; on/off only
    #[default]
    OnOff,
    /// PWM slice generating the requested frequency
    Pwm,
}

/// Stored alarm configuration
///
/// Flat fields rather than an enum so the record layout stays stable;
/// `mode` selects which of the date/weekday fields are meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlarmRecord {
    pub active: bool,
    pub mode: u8,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekdays: u8,
    pub hour: u8,
    pub minute: u8,
    pub repeat: bool,
    pub label: String<MAX_LABEL_LEN>,
}

impl Default for AlarmRecord {
    fn default() -> Self {
        Self {
            active: false,
            mode: MODE_DAILY,
            year: 0,
            month: 0,
            day: 0,
            weekdays: 0,
            hour: 0,
            minute: 0,
            repeat: true,
            label: String::new(),
        }
    }
}

/// Stored melody token strings, one per trigger source
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MelodyConfig {
    pub alarm: String<MAX_MELODY_STR_LEN>,
    pub timer: String<MAX_MELODY_STR_LEN>,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        let mut alarm = String::new();
        let mut timer = String::new();
        // Factory tunes; both well under capacity.
        let _ = alarm.push_str("C5 Q E5 Q G5 Q C6 H P Q");
        let _ = timer.push_str("A5 E P E A5 E P Q");
        Self { alarm, timer }
    }
}

/// Everything the storage collaborator keeps for this appliance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApplianceConfig {
    pub version: u8,
    pub buzzer: BuzzerKind,
    pub alarm: AlarmRecord,
    pub melodies: MelodyConfig,
}

impl ApplianceConfig {
    /// Factory defaults with the current record version
    pub fn factory() -> Self {
        Self {
            version: CONFIG_VERSION,
            ..Self::default()
        }
    }
}

#[cfg(feature = "serde")]
impl ApplianceConfig {
    /// Serialize into a caller-provided buffer, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], postcard::Error> {
        postcard::to_slice(self, buf).map(|used| &*used)
    }

    /// Deserialize from stored bytes
    ///
    /// A version mismatch is reported as `None` rather than an error; the
    /// loader falls back to factory defaults in that case.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let config: Self = postcard::from_bytes(bytes).ok()?;
        (config.version == CONFIG_VERSION).then_some(config)
    }
}
