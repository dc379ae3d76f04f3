//! Embassy tasks

pub mod buzzer;
pub mod console;
pub mod input;
pub mod led;
pub mod render;
pub mod tick;
