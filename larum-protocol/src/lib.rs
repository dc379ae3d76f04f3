//! Larum command surface
//!
//! This crate defines the contract between the appliance core and its
//! external collaborators: the line-oriented serial console and the HTTP
//! handler. Both speak the same [`Command`] vocabulary; the console
//! additionally uses the text encoding parsed by [`Command::parse_line`].
//!
//! # Line grammar
//!
//! ```text
//! alarm daily HH:MM [LABEL..] [once]
//! alarm week MTWTFSS HH:MM [LABEL..] [once]
//! alarm date YYYY-MM-DD HH:MM [LABEL..] [once]
//! alarm off
//! timer SECONDS [LABEL..]
//! timer off
//! melody alarm|timer TOKEN..
//! preview TOKEN..
//! stop
//! status
//! time YYYY-MM-DD HH:MM:SS
//! ```
//!
//! Collaborators own all I/O. Nothing in this crate reads or writes a
//! socket, a UART, or flash; it is vocabulary plus parsing only.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod status;

pub use command::{AlarmSchedule, Command, CommandError, MelodyTarget};
pub use status::StatusSnapshot;

/// Maximum alarm/timer label length in bytes
pub const MAX_LABEL_LEN: usize = 30;

/// Maximum melody token string length in bytes
pub const MAX_MELODY_STR_LEN: usize = 256;
