//! Flash storage abstractions
//!
//! Wear-levelled key-value storage for the records the controller keeps
//! across reboots.

use noticeboard_core::traits::{StoreError, REMINDERS_KEY};

/// Name under which the device configuration record is kept
pub const DEVICE_CONFIG_KEY: &str = "device-config";

/// Flash record identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Postcard-encoded `DeviceConfig`
    DeviceConfig = 0,
    /// Reminder table record
    Reminders = 1,
}

impl StorageKey {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::DeviceConfig),
            1 => Some(StorageKey::Reminders),
            _ => None,
        }
    }

    /// Map a core store key onto a flash record
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            REMINDERS_KEY => Some(StorageKey::Reminders),
            DEVICE_CONFIG_KEY => Some(StorageKey::DeviceConfig),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StorageKey::DeviceConfig => DEVICE_CONFIG_KEY,
            StorageKey::Reminders => REMINDERS_KEY,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage layer failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        match e {
            FlashError::Full => StoreError::Full,
            FlashError::BufferTooSmall => StoreError::BufferTooSmall,
            FlashError::Flash
            | FlashError::Storage
            | FlashError::NotFound
            | FlashError::Corrupted => StoreError::Io,
        }
    }
}

/// Flash storage trait
///
/// Implementations handle wear levelling and data integrity.
pub trait FlashStorage {
    /// Read a value by key into `buffer`, returning its length
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Replace the value stored under `key`
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    fn exists(&mut self, key: StorageKey) -> impl core::future::Future<Output = bool>;

    /// Erase the whole storage partition
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let Some(slot) = buffer.first_mut() else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        *slot = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let Some(&byte) = buffer.first() else {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        };
        StorageKey::from_u8(byte)
            .map(|key| (key, 1))
            .ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(StorageKey::from_name("reminders"), Some(StorageKey::Reminders));
        assert_eq!(
            StorageKey::from_name(StorageKey::DeviceConfig.name()),
            Some(StorageKey::DeviceConfig)
        );
        assert_eq!(StorageKey::from_name("calibration"), None);
    }

    #[test]
    fn test_key_bytes() {
        for key in [StorageKey::DeviceConfig, StorageKey::Reminders] {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(7), None);
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(StoreError::from(FlashError::Full), StoreError::Full);
        assert_eq!(
            StoreError::from(FlashError::BufferTooSmall),
            StoreError::BufferTooSmall
        );
        assert_eq!(StoreError::from(FlashError::Flash), StoreError::Io);
    }
}
