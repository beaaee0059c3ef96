//! Clear-notifications button
//!
//! Active-low push button with the internal pull-up.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::{ControlEvent, CONTROL};

const DEBOUNCE_MS: u64 = 50;

#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_high() {
            continue;
        }

        debug!("Button pressed");
        if CONTROL.try_send(ControlEvent::ClearButton).is_err() {
            warn!("Control channel full, dropping button press");
        }

        button.wait_for_high().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
