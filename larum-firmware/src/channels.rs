//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. Uses embassy-sync primitives for safe async communication.
//! The controller task is the only consumer of inputs and the only
//! producer of outputs, so every shared sink has exactly one writer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use larum_core::clock::Tick;
use larum_core::config::ApplianceConfig;
use larum_core::led::LedColor;
use larum_core::melody::{Melody, ToneCommand};
use larum_display::ViewModel;
use larum_protocol::{Command, StatusSnapshot};

/// Channel capacity for button edges
const BUTTON_CHANNEL_SIZE: usize = 4;

/// Channel capacity for collaborator commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Raw button edges (tick of the edge); debounce happens in the core
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, Tick, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Commands from the console/HTTP collaborators
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Periodic tick (monotonic milliseconds since boot)
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, Tick> = Signal::new();

/// Tone command for the buzzer task (updated by the controller)
pub static TONE_SIGNAL: Signal<CriticalSectionRawMutex, ToneCommand> = Signal::new();

/// Melody preview request; handled by the buzzer task outside the tick path
pub static PREVIEW_SIGNAL: Signal<CriticalSectionRawMutex, Melody> = Signal::new();

/// LED color for the indicator task (updated by the controller)
pub static LED_SIGNAL: Signal<CriticalSectionRawMutex, LedColor> = Signal::new();

/// View model for the render task (updated by the controller)
pub static VIEW_SIGNAL: Signal<CriticalSectionRawMutex, ViewModel> = Signal::new();

/// Status snapshot answering a collaborator's status request
pub static STATUS_SIGNAL: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();

/// Configuration snapshot to persist (consumed by the storage task)
pub static SAVE_SIGNAL: Signal<CriticalSectionRawMutex, ApplianceConfig> = Signal::new();
