//! Reminder record writer
//!
//! Drains [`PERSIST`] into flash. A failed write is retried after a delay
//! unless a newer record arrives first.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Timer;

use noticeboard_hal::{FlashStorage, StorageKey};
use noticeboard_hal_rp2040::flash::Rp2040FlashStorage;

use crate::channels::{ReminderRecord, PERSIST};

const RETRY_DELAY_MS: u64 = 5_000;

#[embassy_executor::task]
pub async fn storage_task(mut flash: Rp2040FlashStorage<'static>) {
    info!("Storage task started");

    let mut pending: ReminderRecord = PERSIST.wait().await;

    loop {
        match flash.write(StorageKey::Reminders, &pending).await {
            Ok(()) => {
                debug!("Reminder record written ({} bytes)", pending.len());
                pending = PERSIST.wait().await;
            }
            Err(e) => {
                warn!("Reminder record write failed: {:?}, retrying", e);
                pending = match select(PERSIST.wait(), Timer::after_millis(RETRY_DELAY_MS)).await {
                    Either::First(newer) => newer,
                    Either::Second(()) => pending,
                };
            }
        }
    }
}
