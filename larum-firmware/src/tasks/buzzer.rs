//! Buzzer task
//!
//! Applies the controller's tone commands to whichever sink the board
//! configuration selected, and hosts melody preview. Preview is the one
//! deliberately blocking operation in the whole appliance: it plays the
//! candidate melody exactly once, awaiting each note's real duration,
//! so the user can audition a tune before saving it. It runs only from
//! the user-initiated preview command and never from the tick path; a
//! trigger firing mid-preview simply takes over the sink on the next
//! tone command.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use larum_core::melody::Melody;
use larum_core::traits::ToneSink;

use crate::channels::{PREVIEW_SIGNAL, TONE_SIGNAL};
use crate::sinks::AnySink;

/// Play a melody once, end to end
///
/// Blocks its caller for the audible length of the sequence.
pub async fn preview_once(melody: &Melody, sink: &mut impl ToneSink) {
    for note in melody.iter() {
        if note.is_pause() {
            sink.silence();
        } else {
            sink.tone(note.freq_hz);
        }
        Timer::after_millis(note.duration_ms as u64).await;
    }
    sink.silence();
}

/// Buzzer task - the only writer of the tone sink
#[embassy_executor::task]
pub async fn buzzer_task(mut sink: AnySink<Output<'static>>) {
    info!("Buzzer task started");

    loop {
        match select(TONE_SIGNAL.wait(), PREVIEW_SIGNAL.wait()).await {
            Either::First(cmd) => sink.apply(cmd),
            Either::Second(melody) => {
                info!("Previewing melody ({} notes)", melody.len());
                preview_once(&melody, &mut sink).await;
            }
        }
    }
}
