//! Button input task
//!
//! Forwards raw press edges with their timestamps; the core context does
//! the 300 ms debounce, so this task stays a dumb pipe.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use crate::channels::BUTTON_CHANNEL;

/// Button task - reports press edges
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;
        BUTTON_CHANNEL.send(Instant::now().as_millis()).await;
        // Let the line settle before arming the edge detector again.
        embassy_time::Timer::after_millis(20).await;
    }
}
