//! Main controller coordinating the core context and the task fleet
//!
//! The controller task owns the `ClockContext` and the wall-clock source.
//! It is the single consumer of ticks, button edges and collaborator
//! commands, and the single producer of tone, LED, view and persistence
//! outputs — so every shared sink has exactly one writer, and the core's
//! fixed tick order is preserved end to end.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::Instant;

use larum_core::clock::Tick;
use larum_core::config::{ApplianceConfig, BuzzerKind, CONFIG_VERSION};
use larum_core::context::{Applied, ClockContext};
use larum_display::ViewModel;
use larum_protocol::Command;

use crate::channels::{
    BUTTON_CHANNEL, COMMAND_CHANNEL, LED_SIGNAL, PREVIEW_SIGNAL, SAVE_SIGNAL, STATUS_SIGNAL,
    TICK_SIGNAL, TONE_SIGNAL, VIEW_SIGNAL,
};
use crate::clock::SystemClock;

/// Controller task - advances the core once per tick
#[embassy_executor::task]
pub async fn controller_task(config: ApplianceConfig) {
    info!("Controller task started");

    let buzzer_kind = config.buzzer;
    let mut context = ClockContext::new();
    context.load_config(&config);

    let mut clock = SystemClock::new();
    let mut last_view: Option<ViewModel> = None;

    loop {
        match select3(
            TICK_SIGNAL.wait(),
            BUTTON_CHANNEL.receive(),
            COMMAND_CHANNEL.receive(),
        )
        .await
        {
            Either3::First(now) => {
                run_tick(&mut context, &clock, now, &mut last_view);
            }
            Either3::Second(edge) => {
                if context.button_press(edge) {
                    debug!("Button press accepted");
                    persist_if_dirty(&mut context, buzzer_kind);
                }
            }
            Either3::Third(cmd) => {
                let now = Instant::now().as_millis();
                handle_command(&mut context, &mut clock, buzzer_kind, &cmd, now);
            }
        }
    }
}

/// One pass of the fixed tick order; publishes the outputs
fn run_tick(
    context: &mut ClockContext,
    clock: &SystemClock,
    now: Tick,
    last_view: &mut Option<ViewModel>,
) {
    let wall = clock.wall(now);
    let out = context.tick(now, wall.as_ref());

    TONE_SIGNAL.signal(out.tone);
    LED_SIGNAL.signal(out.led);

    let mut triggered_label = heapless::String::new();
    let _ = triggered_label.push_str(context.triggered_label());
    let view = ViewModel {
        screen: out.screen,
        colon_on: ViewModel::colon_phase(now),
        wall,
        status: context.status(now),
        triggered_label,
    };
    if last_view.as_ref() != Some(&view) {
        VIEW_SIGNAL.signal(view.clone());
        *last_view = Some(view);
    }
}

/// Apply one collaborator command and route its outcome
fn handle_command(
    context: &mut ClockContext,
    clock: &mut SystemClock,
    buzzer_kind: BuzzerKind,
    cmd: &Command,
    now: Tick,
) {
    match context.apply(cmd, now) {
        Ok(Applied::Done) => {
            if matches!(cmd, Command::SetMelody { .. }) {
                // Melody strings live in the same stored record.
                save_snapshot(context, buzzer_kind);
            } else {
                persist_if_dirty(context, buzzer_kind);
            }
        }
        Ok(Applied::Status(status)) => STATUS_SIGNAL.signal(status),
        Ok(Applied::Preview(melody)) => PREVIEW_SIGNAL.signal(melody),
        Ok(Applied::SetClock(wall)) => {
            info!(
                "Clock set to {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                wall.year, wall.month, wall.day, wall.hour, wall.minute, wall.second
            );
            clock.set(wall, now);
        }
        Err(e) => warn!("Command rejected: {:?}", e),
    }
}

/// Persist when the alarm configuration drifted from storage
///
/// Covers explicit set/clear commands and the quieter paths that also
/// change durable state, like a one-shot alarm disarming itself at
/// acknowledge.
fn persist_if_dirty(context: &mut ClockContext, buzzer_kind: BuzzerKind) {
    if !context.alarm().is_persisted() {
        save_snapshot(context, buzzer_kind);
    }
}

/// Snapshot the stored record and hand it to the storage task
fn save_snapshot(context: &mut ClockContext, buzzer_kind: BuzzerKind) {
    let config = ApplianceConfig {
        version: CONFIG_VERSION,
        buzzer: buzzer_kind,
        alarm: context.alarm().to_record(),
        melodies: context.melody_config().clone(),
    };
    SAVE_SIGNAL.signal(config);
    context.alarm_mut().mark_persisted();
}
