//! Scheduler tick
//!
//! Wakes the controller every scheduler period so timers run and dirty
//! zones are drawn even when no input arrives.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Milliseconds since the tick task started
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

#[embassy_executor::task]
pub async fn tick_task(period_ms: u32) {
    info!("Tick task started ({} ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms.max(1))));
    let start = Instant::now();

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(start.elapsed().as_millis() as u32);
    }
}
