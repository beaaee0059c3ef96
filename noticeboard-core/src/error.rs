//! Core error type

/// Errors returned by core operations
///
/// None of these are fatal; callers report them and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No free reminder slot
    CapacityExceeded,
    /// No occupied reminder slot with the requested id
    NotFound,
    /// Persisted reminder record failed validation
    StorageCorrupt,
    /// Reminder due time could not be interpreted
    InvalidSchedule,
}

impl Error {
    /// Stable wire code used in host replies
    pub fn code(self) -> u8 {
        match self {
            Error::CapacityExceeded => 1,
            Error::NotFound => 2,
            Error::StorageCorrupt => 3,
            Error::InvalidSchedule => 4,
        }
    }

    /// Inverse of [`Error::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Error::CapacityExceeded),
            2 => Some(Error::NotFound),
            3 => Some(Error::StorageCorrupt),
            4 => Some(Error::InvalidSchedule),
            _ => None,
        }
    }
}
