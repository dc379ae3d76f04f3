//! UART display backend
//!
//! The panel sits behind its own little MCU that owns the bitmap font
//! assets; this side only sends draw commands. Frames use a simple
//! binary format:
//!
//! ```text
//! ┌───────┬──────┬────────┬─────────────┬──────────┐
//! │ START │ TYPE │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B   │ 1B     │ 0–60B       │ 1B       │
//! └───────┴──────┴────────┴─────────────┴──────────┘
//! ```
//!
//! Draw calls append frames to an internal buffer; the render task sends
//! the whole buffer over the UART after `flush`.

use heapless::Vec;

use larum_display::{DisplayBackend, DisplayError};

/// Frame start marker
pub const FRAME_START: u8 = 0x7E;

/// Frame types
const CMD_CLEAR: u8 = 0x01;
const CMD_DRAW_TEXT: u8 = 0x02;
const CMD_FLUSH: u8 = 0x03;

/// Longest text payload per frame
const MAX_TEXT_LEN: usize = 56;

/// Byte budget for one full screen worth of frames
const OUT_BUFFER_SIZE: usize = 512;

/// Panel size the display MCU reports at the protocol level
pub const PANEL_WIDTH: u32 = 128;
pub const PANEL_HEIGHT: u32 = 64;

/// Frame-building backend
pub struct UartDisplay {
    out: Vec<u8, OUT_BUFFER_SIZE>,
}

impl UartDisplay {
    pub const fn new() -> Self {
        Self { out: Vec::new() }
    }

    /// Bytes accumulated since the last take, cleared for the next pass
    pub fn take_frame(&mut self) -> Vec<u8, OUT_BUFFER_SIZE> {
        core::mem::take(&mut self.out)
    }

    fn push_frame(&mut self, frame_type: u8, payload: &[u8]) -> Result<(), DisplayError> {
        let mut checksum = frame_type ^ payload.len() as u8;
        for byte in payload {
            checksum ^= *byte;
        }

        let total = 4 + payload.len();
        if self.out.len() + total > OUT_BUFFER_SIZE {
            return Err(DisplayError::Communication);
        }
        // Capacity checked above; pushes cannot fail.
        let _ = self.out.push(FRAME_START);
        let _ = self.out.push(frame_type);
        let _ = self.out.push(payload.len() as u8);
        let _ = self.out.extend_from_slice(payload);
        let _ = self.out.push(checksum);
        Ok(())
    }
}

impl DisplayBackend for UartDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.push_frame(CMD_CLEAR, &[])
    }

    fn draw_text(
        &mut self,
        x: u32,
        y: u32,
        font_index: usize,
        text: &str,
    ) -> Result<(), DisplayError> {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return Err(DisplayError::OutOfBounds);
        }
        let bytes = text.as_bytes();
        if bytes.len() > MAX_TEXT_LEN {
            return Err(DisplayError::OutOfBounds);
        }

        let mut payload: Vec<u8, { MAX_TEXT_LEN + 3 }> = Vec::new();
        let _ = payload.push(x as u8);
        let _ = payload.push(y as u8);
        let _ = payload.push(font_index as u8);
        let _ = payload.extend_from_slice(bytes);
        self.push_frame(CMD_DRAW_TEXT, &payload)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.push_frame(CMD_FLUSH, &[])
    }

    fn dimensions(&self) -> (u32, u32) {
        (PANEL_WIDTH, PANEL_HEIGHT)
    }
}
