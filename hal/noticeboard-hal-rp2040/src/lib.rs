//! RP2040-specific HAL for the Noticeboard firmware
//!
//! - Flash storage driver (implements `noticeboard_hal::FlashStorage`)

#![no_std]

pub mod flash;

pub use noticeboard_hal::{FlashStorage as FlashStorageTrait, StorageKey};
