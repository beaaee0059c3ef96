//! Configuration loading and parsing
//!
//! Loads the device configuration from flash or the embedded device.toml.

pub mod loader;
pub mod toml;

pub use loader::{ConfigError, ConfigPersistence};
pub use toml::{parse_config, ParseError};
