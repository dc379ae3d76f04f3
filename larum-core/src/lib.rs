//! Board-agnostic core logic for the Larum alarm/timer appliance
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Alarm trigger evaluation (daily / weekday-mask / date modes)
//! - Countdown timer with edge-detected expiry
//! - Melody parsing and non-blocking playback sequencing
//! - Adaptive multi-font text layout for small bitmap displays
//! - LED indicator state derivation
//! - The `ClockContext` scheduler that ties them together, one tick at a time
//!
//! Everything here is polled from a single cooperative loop. No operation
//! blocks; timing is modeled as monotonic-tick comparison against stored
//! deadlines. The one deliberate exception, melody preview, lives on the
//! firmware side where real time passes.

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod led;
pub mod melody;
pub mod timer;
pub mod traits;

pub use larum_protocol::MAX_LABEL_LEN;
