//! Flash storage driver for RP2040
//!
//! sequential-storage map in the last 64KB of flash.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use noticeboard_hal::flash::{FlashError, StorageKey};

pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB on the Pico
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

pub const STORAGE_RANGE: core::ops::Range<u32> =
    (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Largest item the map can move in one operation, key and header included
pub const SCRATCH_LEN: usize = 2048;

/// RP2040 flash storage
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    scratch: [u8; SCRATCH_LEN],
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            scratch: [0; SCRATCH_LEN],
        }
    }
}

fn map_error<E>(e: sequential_storage::Error<E>) -> FlashError {
    match e {
        sequential_storage::Error::Storage { .. } => FlashError::Flash,
        sequential_storage::Error::FullStorage => FlashError::Full,
        sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
        _ => FlashError::Storage,
    }
}

impl<'d> noticeboard_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
        )
        .await
        .map_err(map_error)?
        .ok_or(FlashError::NotFound)?;

        let len = data.len();
        let dest = buffer.get_mut(..len).ok_or(FlashError::BufferTooSmall)?;
        dest.copy_from_slice(data);
        Ok(len)
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
            &data,
        )
        .await
        .map_err(map_error)
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        matches!(
            map::fetch_item::<StorageKey, &[u8], _>(
                &mut self.flash,
                STORAGE_RANGE,
                &mut NoCache::new(),
                &mut self.scratch,
                &key,
            )
            .await,
            Ok(Some(_))
        )
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        self.flash
            .erase(STORAGE_RANGE.start, STORAGE_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}
