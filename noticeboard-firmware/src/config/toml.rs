//! Minimal TOML reader for device.toml
//!
//! Handles only the subset the device configuration uses:
//! - `[section]` headers
//! - `key = value` pairs (string, integer)
//! - Comments (# ...)
//!
//! Keys left out keep their default values.

use noticeboard_core::config::{ClockPolicy, ContentLayout, DeviceConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header not known
    InvalidSection,
    /// Line is neither a header nor a key-value pair
    InvalidLine,
    /// Value does not parse or is out of range
    InvalidValue,
    /// Key not known in its section
    UnknownKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
    Ticker,
    Limits,
}

/// Parse device.toml text over the defaults
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match section {
            Section::Root => apply_root(&mut config, key, value)?,
            Section::Display => apply_display(&mut config, key, value)?,
            Section::Timing => apply_timing(&mut config, key, value)?,
            Section::Ticker => apply_ticker(&mut config, key, value)?,
            Section::Limits => apply_limits(&mut config, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        "ticker" => Ok(Section::Ticker),
        "limits" => Ok(Section::Limits),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_root(config: &mut DeviceConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "version" => config.version = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_display(config: &mut DeviceConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "utc_offset_minutes" => config.utc_offset_minutes = parse_int(value)?,
        "clock_policy" => {
            config.clock_policy = match parse_string(value)? {
                "cell_diff" => ClockPolicy::CellDiff,
                "whole_string" => ClockPolicy::WholeString,
                _ => return Err(ParseError::InvalidValue),
            }
        }
        "layout" => {
            config.layout = match parse_string(value)? {
                "single" => ContentLayout::Single,
                "slotted" => ContentLayout::Slotted,
                _ => return Err(ParseError::InvalidValue),
            }
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_timing(config: &mut DeviceConfig, key: &str, value: &str) -> Result<(), ParseError> {
    let timing = &mut config.timing;
    let field = match key {
        "scheduler_ms" => &mut timing.scheduler_ms,
        "reminder_check_ms" => &mut timing.reminder_check_ms,
        "reminder_refresh_ms" => &mut timing.reminder_refresh_ms,
        "scroll_period_ms" => &mut timing.scroll_period_ms,
        "disc_period_ms" => &mut timing.disc_period_ms,
        "now_playing_timeout_ms" => &mut timing.now_playing_timeout_ms,
        _ => return Err(ParseError::UnknownKey),
    };
    *field = parse_int(value)?;
    Ok(())
}

fn apply_ticker(config: &mut DeviceConfig, key: &str, value: &str) -> Result<(), ParseError> {
    let ticker = &mut config.ticker;
    match key {
        "scroll_step_px" => ticker.scroll_step_px = parse_int(value)?,
        "disc_frames" => ticker.disc_frames = parse_int(value)?,
        "char_advance_px" => ticker.char_advance_px = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_limits(config: &mut DeviceConfig, key: &str, value: &str) -> Result<(), ParseError> {
    let limits = &mut config.limits;
    let field = match key {
        "app_chars" => &mut limits.app_chars,
        "sender_chars" => &mut limits.sender_chars,
        "notification_chars" => &mut limits.notification_chars,
        "reminder_chars" => &mut limits.reminder_chars,
        "song_chars" => &mut limits.song_chars,
        "artist_chars" => &mut limits.artist_chars,
        _ => return Err(ParseError::UnknownKey),
    };
    *field = parse_int(value)?;
    Ok(())
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip surrounding quotes; bare words are accepted as-is
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Ok(value)
    }
}

/// Integers may use `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}
