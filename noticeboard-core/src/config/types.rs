//! Configuration type definitions
//!
//! These types represent the device configuration. Configuration is stored
//! in flash as postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// How the clock zone is refreshed between full redraws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockPolicy {
    /// Redraw only the character cells that changed
    #[default]
    CellDiff,
    /// Redraw the whole string whenever any character changed
    WholeString,
}

/// How the content area is split into zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContentLayout {
    /// One content zone covering the whole body
    #[default]
    Single,
    /// Three stacked content zones redrawn independently
    Slotted,
}

impl ContentLayout {
    /// Number of content zones in this layout
    pub const fn zone_count(self) -> usize {
        match self {
            ContentLayout::Single => 1,
            ContentLayout::Slotted => 3,
        }
    }
}

/// Timer cadences, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Render scheduler cycle
    pub scheduler_ms: u32,
    /// Reminder engine check interval
    pub reminder_check_ms: u32,
    /// Countdown refresh while the reminder screen is shown
    pub reminder_refresh_ms: u32,
    /// Ticker scroll step interval
    pub scroll_period_ms: u32,
    /// Disc animation frame interval
    pub disc_period_ms: u32,
    /// Now-playing auto-clear after this long without an update
    pub now_playing_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scheduler_ms: 20,
            reminder_check_ms: 1000,
            reminder_refresh_ms: 60_000,
            scroll_period_ms: 200,
            disc_period_ms: 400,
            now_playing_timeout_ms: 300_000,
        }
    }
}

/// Ticker geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickerConfig {
    /// Pixels advanced per scroll step
    pub scroll_step_px: u16,
    /// Frames in one disc revolution
    pub disc_frames: u8,
    /// Pixel advance of one character cell
    pub char_advance_px: u16,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            scroll_step_px: 2,
            disc_frames: 64,
            char_advance_px: 8,
        }
    }
}

/// Character limits applied when text enters the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextLimits {
    pub app_chars: u8,
    pub sender_chars: u8,
    pub notification_chars: u8,
    pub reminder_chars: u8,
    pub song_chars: u8,
    pub artist_chars: u8,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            app_chars: 16,
            sender_chars: 24,
            notification_chars: 56,
            reminder_chars: 28,
            song_chars: 48,
            artist_chars: 32,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Format version
    pub version: u8,
    /// Local time offset from UTC in minutes
    pub utc_offset_minutes: i16,
    pub clock_policy: ClockPolicy,
    pub layout: ContentLayout,
    pub timing: TimingConfig,
    pub ticker: TickerConfig,
    pub limits: TextLimits,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            // India Standard Time
            utc_offset_minutes: 330,
            clock_policy: ClockPolicy::CellDiff,
            layout: ContentLayout::Single,
            timing: TimingConfig::default(),
            ticker: TickerConfig::default(),
            limits: TextLimits::default(),
        }
    }
}

impl DeviceConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace zero cadences and geometry with defaults
    ///
    /// A zero period would make a timer fire every cycle.
    pub fn sanitized(mut self) -> Self {
        let timing = TimingConfig::default();
        let fix = |v: &mut u32, d: u32| {
            if *v == 0 {
                *v = d;
            }
        };
        fix(&mut self.timing.scheduler_ms, timing.scheduler_ms);
        fix(&mut self.timing.reminder_check_ms, timing.reminder_check_ms);
        fix(&mut self.timing.reminder_refresh_ms, timing.reminder_refresh_ms);
        fix(&mut self.timing.scroll_period_ms, timing.scroll_period_ms);
        fix(&mut self.timing.disc_period_ms, timing.disc_period_ms);
        fix(
            &mut self.timing.now_playing_timeout_ms,
            timing.now_playing_timeout_ms,
        );
        if self.ticker.disc_frames == 0 {
            self.ticker.disc_frames = TickerConfig::default().disc_frames;
        }
        if self.ticker.char_advance_px == 0 {
            self.ticker.char_advance_px = TickerConfig::default().char_advance_px;
        }
        self
    }

    /// Serialize into `buf` with postcard, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize a postcard-encoded configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device() {
        let config = DeviceConfig::default();
        assert_eq!(config.timing.scroll_period_ms, 200);
        assert_eq!(config.timing.disc_period_ms, 400);
        assert_eq!(config.ticker.disc_frames, 64);
        assert_eq!(config.limits.sender_chars, 24);
        assert_eq!(config.utc_offset_minutes, 330);
    }

    #[test]
    fn test_sanitized_replaces_zero_periods() {
        let mut config = DeviceConfig::default();
        config.timing.scroll_period_ms = 0;
        config.ticker.disc_frames = 0;
        let config = config.sanitized();
        assert_eq!(config.timing.scroll_period_ms, 200);
        assert_eq!(config.ticker.disc_frames, 64);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let mut config = DeviceConfig::default();
        config.layout = ContentLayout::Slotted;
        config.clock_policy = ClockPolicy::WholeString;
        let mut buf = [0u8; 128];
        let used = config.to_bytes(&mut buf).unwrap().len();
        let decoded = DeviceConfig::from_bytes(&buf[..used]).unwrap();
        assert_eq!(decoded, config);
    }
}
