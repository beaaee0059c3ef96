//! Configuration persistence
//!
//! A postcard `DeviceConfig` record in flash overrides the embedded
//! device.toml. Any failure falls back to the built-in defaults.

use defmt::*;

use noticeboard_core::config::{DeviceConfig, CONFIG_VERSION};
use noticeboard_hal::{FlashError, FlashStorage, StorageKey};

use super::toml::{parse_config, ParseError};

/// Embedded default configuration; edit device.toml and rebuild to change
pub const EMBEDDED_CONFIG: &str = include_str!("../../device.toml");

/// Maximum serialized config size
const MAX_CONFIG_SIZE: usize = 128;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Embedded TOML did not parse
    TomlParse(ParseError),
    /// Record written by another firmware version
    VersionMismatch(u8),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::TomlParse(e)
    }
}

/// Loads the device configuration
///
/// Owns the flash driver for the duration of boot; hand it back with
/// [`ConfigPersistence::into_storage`] once the configuration is read.
pub struct ConfigPersistence<F> {
    storage: F,
}

impl<F: FlashStorage> ConfigPersistence<F> {
    pub fn new(storage: F) -> Self {
        Self { storage }
    }

    pub fn into_storage(self) -> F {
        self.storage
    }

    /// Resolve the configuration to run with
    pub async fn load(&mut self) -> DeviceConfig {
        info!("Loading configuration...");

        match self.load_binary().await {
            Ok(config) => {
                info!("Loaded configuration record from flash");
                log_config_summary(&config);
                return config;
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                debug!("No configuration record, using device.toml");
            }
            Err(e) => {
                warn!("Configuration record unusable: {:?}, using device.toml", e);
            }
        }

        match load_embedded() {
            Ok(config) => {
                log_config_summary(&config);
                config
            }
            Err(e) => {
                warn!("Embedded configuration invalid: {:?}, using defaults", e);
                DeviceConfig::default()
            }
        }
    }

    async fn load_binary(&mut self) -> Result<DeviceConfig, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self
            .storage
            .read(StorageKey::DeviceConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of configuration from flash", len);

        let config: DeviceConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch(config.version));
        }

        Ok(config)
    }
}

/// Parse the device.toml compiled into the image
pub fn load_embedded() -> Result<DeviceConfig, ConfigError> {
    Ok(parse_config(EMBEDDED_CONFIG)?)
}

fn log_config_summary(config: &DeviceConfig) {
    info!(
        "UTC offset {} min, layout {:?}, clock {:?}",
        config.utc_offset_minutes, config.layout, config.clock_policy
    );
    debug!(
        "  scheduler {} ms, reminder check {} ms, scroll {} ms, disc {} ms",
        config.timing.scheduler_ms,
        config.timing.reminder_check_ms,
        config.timing.scroll_period_ms,
        config.timing.disc_period_ms
    );
}
