//! Key-value persistence trait

/// Key under which the reminder record is stored
pub const REMINDERS_KEY: &str = "reminders";

/// Errors from the persistence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backend read or write failed
    Io,
    /// Backend has no room for the value
    Full,
    /// Value does not fit the supplied buffer
    BufferTooSmall,
    /// Key is not known to the backend
    UnknownKey,
}

/// Synchronous key-value store
///
/// `put` may hand the bytes to a background writer; it only has to copy
/// them before returning.
pub trait Store {
    /// Replace the value stored under `key`
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the value under `key` into `buf`
    ///
    /// Returns `Ok(None)` when nothing is stored.
    fn get(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError>;
}
