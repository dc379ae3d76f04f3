//! Serial console task
//!
//! The line-oriented command collaborator. Bytes come in over UART1,
//! lines go through `Command::parse_line`, and accepted commands land on
//! the command channel. All actual behavior lives in the core; this task
//! is transport plus echo.

use core::fmt::Write as _;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::BufferedUart;
use embedded_io_async::{Read, Write};
use heapless::String;

use larum_protocol::{Command, StatusSnapshot};

use crate::channels::{COMMAND_CHANNEL, STATUS_SIGNAL};

/// Longest accepted console line
const MAX_LINE_LEN: usize = 300;

/// Console task - line-oriented command entry
#[embassy_executor::task]
pub async fn console_task(uart: BufferedUart<'static, UART1>) {
    info!("Console task started");

    let (mut tx, mut rx) = uart.split();
    let mut line: String<MAX_LINE_LEN> = String::new();
    let mut overflowed = false;
    let mut buf = [0u8; 64];

    loop {
        match select(rx.read(&mut buf), STATUS_SIGNAL.wait()).await {
            Either::First(Ok(n)) => {
                for &byte in &buf[..n] {
                    if byte == b'\n' || byte == b'\r' {
                        if overflowed {
                            let _ = tx.write_all(b"ERR LineTooLong\r\n").await;
                        } else if !line.is_empty() {
                            handle_line(&mut tx, line.as_str()).await;
                        }
                        line.clear();
                        overflowed = false;
                    } else if line.push(byte as char).is_err() {
                        overflowed = true;
                    }
                }
            }
            Either::First(Err(e)) => {
                warn!("Console read failed: {:?}", e);
            }
            Either::Second(status) => {
                let mut out: String<160> = String::new();
                write_status(&mut out, &status);
                let _ = tx.write_all(out.as_bytes()).await;
            }
        }
    }
}

async fn handle_line(tx: &mut impl Write, line: &str) {
    match Command::parse_line(line) {
        Ok(cmd) => {
            COMMAND_CHANNEL.send(cmd).await;
            let _ = tx.write_all(b"OK\r\n").await;
        }
        Err(e) => {
            let mut out: String<48> = String::new();
            let _ = write!(out, "ERR {:?}\r\n", e);
            let _ = tx.write_all(out.as_bytes()).await;
        }
    }
}

/// Render the status snapshot as one console line
fn write_status(out: &mut String<160>, status: &StatusSnapshot) {
    if status.alarm_active {
        let _ = write!(
            out,
            "alarm {:02}:{:02} {} {}",
            status.alarm_hour,
            status.alarm_minute,
            if status.alarm_repeat { "repeat" } else { "once" },
            status.alarm_label.as_str(),
        );
    } else {
        let _ = out.push_str("alarm off");
    }
    if status.timer_active {
        let _ = write!(
            out,
            " | timer {}s {}",
            status.timer_remaining_s,
            status.timer_label.as_str(),
        );
    } else {
        let _ = out.push_str(" | timer off");
    }
    let _ = out.push_str("\r\n");
}
