//! Configuration-time errors
//!
//! These are returned synchronously to the caller and reject the operation
//! atomically; no engine state changes on rejection. Runtime non-matches
//! (unsynchronized clock, wrong weekday) are not errors, they are `Idle`
//! outcomes.

/// Rejection reasons for alarm/timer configuration calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Hour above 23 or minute above 59
    InvalidTime,
    /// Timer duration zero or above the 24-hour ceiling
    InvalidDuration,
}
