//! Configuration types
//!
//! These types define the device configuration structure.
//! Configuration is stored in flash as postcard-serialized binary data,
//! with embedded TOML defaults compiled into the firmware.

pub mod types;

pub use types::*;
