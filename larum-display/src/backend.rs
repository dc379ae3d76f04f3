//! Display backend trait
//!
//! Defines the interface for different display types.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the display
    Communication,
    /// Coordinates or text extend past the panel
    OutOfBounds,
    /// Display not initialized
    NotInitialized,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to pixel
/// displays. `font_index` selects an entry of
/// [`FONT_CANDIDATES`](crate::fonts::FONT_CANDIDATES); implementations
/// map it to their bitmap assets.
pub trait DisplayBackend {
    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at the given pixel position
    fn draw_text(&mut self, x: u32, y: u32, font_index: usize, text: &str)
        -> Result<(), DisplayError>;

    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Panel size in pixels (width, height)
    fn dimensions(&self) -> (u32, u32);
}
