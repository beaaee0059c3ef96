//! Reminder persistence over flash
//!
//! The core writes synchronously, flash is async. `put` keeps a copy for
//! later reads and signals the storage task, which writes the newest
//! record it has seen.

use noticeboard_core::traits::{Store, StoreError};
use noticeboard_hal::StorageKey;

use crate::channels::{ReminderRecord, PERSIST};

pub struct FlashStore {
    reminders: Option<ReminderRecord>,
}

impl FlashStore {
    /// Start from the record read out of flash at boot
    pub fn new(preloaded: Option<ReminderRecord>) -> Self {
        Self {
            reminders: preloaded,
        }
    }
}

fn check_key(key: &str) -> Result<(), StoreError> {
    match StorageKey::from_name(key) {
        Some(StorageKey::Reminders) => Ok(()),
        _ => Err(StoreError::UnknownKey),
    }
}

impl Store for FlashStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        check_key(key)?;
        let record = ReminderRecord::from_slice(bytes).map_err(|_| StoreError::Full)?;
        PERSIST.signal(record.clone());
        self.reminders = Some(record);
        Ok(())
    }

    fn get(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        check_key(key)?;
        let Some(record) = &self.reminders else {
            return Ok(None);
        };
        let dest = buf
            .get_mut(..record.len())
            .ok_or(StoreError::BufferTooSmall)?;
        dest.copy_from_slice(record);
        Ok(Some(record.len()))
    }
}
