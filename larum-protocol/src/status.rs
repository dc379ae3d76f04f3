//! Read-only status export
//!
//! A snapshot of the appliance state, produced by the core once per
//! request and rendered by the console (text) or HTTP (JSON, behind the
//! `serde` feature) collaborators. Consumers get values, never references
//! into live engine state.

use heapless::String;

use crate::command::AlarmSchedule;
use crate::MAX_LABEL_LEN;

/// Appliance state as exposed to external collaborators
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    pub alarm_active: bool,
    pub alarm_triggered: bool,
    /// `None` while no alarm has ever been configured
    pub alarm_schedule: Option<AlarmSchedule>,
    pub alarm_hour: u8,
    pub alarm_minute: u8,
    pub alarm_repeat: bool,
    pub alarm_label: String<MAX_LABEL_LEN>,
    pub timer_active: bool,
    pub timer_triggered: bool,
    pub timer_remaining_s: u32,
    pub timer_label: String<MAX_LABEL_LEN>,
}
