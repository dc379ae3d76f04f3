//! Larum - Alarm/Timer Appliance Firmware
//!
//! Main firmware binary for RP2040-based bedside appliances. One
//! cooperative core advanced at a fixed tick, with hardware I/O fanned
//! out to single-writer tasks.
//!
//! Named after the archaic English "larum", a shortening of "alarum" -
//! the call to arms this little box sounds every morning.
//!
//! # Pin assignments (Pico reference board)
//!
//! | Pin     | Function                      |
//! |---------|-------------------------------|
//! | GPIO 0  | UART0 TX - display link       |
//! | GPIO 1  | UART0 RX - display link       |
//! | GPIO 8  | UART1 TX - console            |
//! | GPIO 9  | UART1 RX - console            |
//! | GPIO 11 | status LED, red leg           |
//! | GPIO 12 | status LED, green leg         |
//! | GPIO 13 | status LED, blue leg          |
//! | GPIO 15 | buzzer (GPIO or PWM7 B)       |
//! | GPIO 16 | button, active low            |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use larum_core::config::BuzzerKind;

mod channels;
mod clock;
mod config;
mod controller;
mod display;
mod sinks;
mod tasks;

use sinks::{AnySink, OnOffSink, PwmFrequencySink};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static DISPLAY_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CONSOLE_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONSOLE_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Larum firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load the stored configuration before anything makes noise.
    let mut flash = Flash::new(p.FLASH, p.DMA_CH0);
    let appliance_config = config::load(&mut flash).await;

    // Tone sink selection is a boot-time decision from the stored record.
    let sink = match appliance_config.buzzer {
        BuzzerKind::OnOff => {
            info!("Buzzer: on/off oscillator");
            AnySink::OnOff(OnOffSink::new(Output::new(p.PIN_15, Level::Low)))
        }
        BuzzerKind::Pwm => {
            info!("Buzzer: PWM frequency generator");
            let pwm = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default());
            AnySink::Pwm(PwmFrequencySink::new(pwm))
        }
    };

    // Display link on UART0.
    let uart_config = UartConfig::default(); // 115200 baud default
    let display_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let display_uart = display_uart.into_buffered(
        Irqs,
        DISPLAY_TX_BUF.init([0u8; 256]),
        DISPLAY_RX_BUF.init([0u8; 64]),
    );
    let (display_tx, _display_rx) = display_uart.split();

    // Console on UART1.
    let console_uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, UartConfig::default());
    let console_uart = console_uart.into_buffered(
        Irqs,
        CONSOLE_TX_BUF.init([0u8; 256]),
        CONSOLE_RX_BUF.init([0u8; 256]),
    );

    let button = Input::new(p.PIN_16, Pull::Up);
    let led_red = Output::new(p.PIN_11, Level::Low);
    let led_green = Output::new(p.PIN_12, Level::Low);
    let led_blue = Output::new(p.PIN_13, Level::Low);

    spawner.spawn(tasks::tick::tick_task()).unwrap();
    spawner.spawn(tasks::input::button_task(button)).unwrap();
    spawner.spawn(tasks::buzzer::buzzer_task(sink)).unwrap();
    spawner
        .spawn(tasks::led::led_task(led_red, led_green, led_blue))
        .unwrap();
    spawner.spawn(tasks::render::render_task(display_tx)).unwrap();
    spawner.spawn(tasks::console::console_task(console_uart)).unwrap();
    spawner.spawn(config::storage_task(flash)).unwrap();
    spawner
        .spawn(controller::controller_task(appliance_config))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
