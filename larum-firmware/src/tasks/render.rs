//! Display render task
//!
//! Takes the controller's view model, composes the screen through the
//! shared views, and ships the resulting draw frames to the display MCU
//! over UART. Rendering only happens when the controller publishes a new
//! model, so an idle screen costs no UART traffic.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use larum_display::views;

use crate::channels::VIEW_SIGNAL;
use crate::display::UartDisplay;

/// Render task - the only writer of the display link
#[embassy_executor::task]
pub async fn render_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Render task started");

    let mut backend = UartDisplay::new();

    loop {
        let model = VIEW_SIGNAL.wait().await;

        if let Err(e) = views::render(&mut backend, &model) {
            warn!("Render failed: {:?}", e);
            let _ = backend.take_frame();
            continue;
        }

        let frame = backend.take_frame();
        if let Err(e) = tx.write_all(&frame).await {
            warn!("Display write failed: {:?}", e);
        }
    }
}
