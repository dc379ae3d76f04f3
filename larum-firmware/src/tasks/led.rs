//! Status LED task
//!
//! Drives a common-cathode RGB LED from the controller's derived color.
//! Yellow is red plus green; all blink phasing already happened in the
//! core, so this task just sets legs.

use defmt::*;
use embassy_rp::gpio::Output;

use larum_core::led::LedColor;

use crate::channels::LED_SIGNAL;

/// LED task - the only writer of the RGB legs
#[embassy_executor::task]
pub async fn led_task(
    mut red: Output<'static>,
    mut green: Output<'static>,
    mut blue: Output<'static>,
) {
    info!("LED task started");

    loop {
        let color = LED_SIGNAL.wait().await;
        let (r, g, b) = match color {
            LedColor::Off => (false, false, false),
            LedColor::Red => (true, false, false),
            LedColor::Yellow => (true, true, false),
            LedColor::Green => (false, true, false),
            LedColor::Blue => (false, false, true),
        };
        set_level(&mut red, r);
        set_level(&mut green, g);
        set_level(&mut blue, b);
    }
}

fn set_level(pin: &mut Output<'static>, on: bool) {
    if on {
        pin.set_high();
    } else {
        pin.set_low();
    }
}
