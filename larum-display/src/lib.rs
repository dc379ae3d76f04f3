//! Display abstraction and screen composition for Larum
//!
//! This crate provides:
//! - `DisplayBackend` trait for different display types (OLED, e-paper, ...)
//! - The bitmap-font candidate ladder used by the text layout engine
//! - View composition for the three screen modes the scheduler selects:
//!   home clock, info pages, and the triggered full-screen message
//!
//! # Architecture
//!
//! Hardware-specific display drivers implement `DisplayBackend`. The
//! firmware render task hands the current [`ViewModel`] to [`render`],
//! which lays text out through `larum_core::layout` and issues backend
//! draw calls. The backend is written from exactly one place per tick.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod fonts;
pub mod views;

pub use backend::{DisplayBackend, DisplayError};
pub use fonts::{FONT_CANDIDATES, SMALL_FONTS};
pub use views::{render, ViewModel};
