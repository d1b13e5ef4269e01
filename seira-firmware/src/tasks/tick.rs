//! Animation tick task
//!
//! Emits the periodic pulses that drive scroll and oscillation. The
//! display itself is serviced in the main task, which runs each
//! animation frame to completion before awaiting the next pulse, so
//! no two frames can ever overlap.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

/// Milliseconds between animation frames (one pixel of scroll each)
pub const FRAME_INTERVAL_MS: u64 = 50;

/// Pulsed once per animation frame; the display loop awaits it.
/// A signal rather than a channel: if the display loop ever falls
/// behind, pending pulses coalesce instead of queueing up.
pub static FRAME_TICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Pulse [`FRAME_TICK`] at the animation frame rate
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Animation ticker started ({} ms frames)", FRAME_INTERVAL_MS);

    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));
    loop {
        ticker.next().await;
        FRAME_TICK.signal(());
    }
}
