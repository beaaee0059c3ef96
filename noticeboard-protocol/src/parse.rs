//! Field parsers for host requests

use chrono::format::ParseErrorKind;
use chrono::{Datelike, NaiveDateTime};
use noticeboard_core::time::{local_epoch, EpochSecs};
use noticeboard_core::Error;

/// Why a due time was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Not `yyyy-mm-dd hh:mm`
    Format,
    /// Year before 2000
    Year,
    /// Month, day, hour or minute out of range
    Range,
}

impl From<ScheduleError> for Error {
    fn from(_: ScheduleError) -> Self {
        Error::InvalidSchedule
    }
}

impl From<chrono::ParseError> for ScheduleError {
    fn from(e: chrono::ParseError) -> Self {
        match e.kind() {
            ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => ScheduleError::Range,
            _ => ScheduleError::Format,
        }
    }
}

/// Parse local `yyyy-mm-dd hh:mm` into epoch seconds
///
/// A `T` may stand in for the space. Anything after the minutes (seconds,
/// a zone suffix) is ignored.
pub fn parse_datetime(text: &str, utc_offset_minutes: i32) -> Result<EpochSecs, ScheduleError> {
    let text = text.trim();
    let format = if text.contains('T') {
        "%Y-%m-%dT%H:%M"
    } else {
        "%Y-%m-%d %H:%M"
    };
    let (local, _rest) = NaiveDateTime::parse_and_remainder(text, format)?;
    if local.year() < 2000 {
        return Err(ScheduleError::Year);
    }
    local_epoch(local, utc_offset_minutes).ok_or(ScheduleError::Range)
}

/// Sender name from a raw "from" field
///
/// Notification mirrors send `"App: Sender"`; the text after the last
/// colon is the sender. A value without a colon is used as is.
pub fn extract_sender(raw: &str) -> &str {
    let name = match raw.rfind(':') {
        Some(i) => raw[i + 1..].trim(),
        None => raw,
    };
    if name.is_empty() {
        "Unknown"
    } else {
        name
    }
}

/// Leading unsigned decimal, like a lenient `atoi`; garbage yields 0
pub fn parse_uint(text: &str) -> u32 {
    text.trim()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, c| acc.saturating_mul(10).saturating_add(u32::from(c - b'0')))
}

/// Signed decimal; `None` when no digits are present
pub fn parse_int(text: &str) -> Option<i64> {
    let t = text.trim();
    let (neg, body) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    if body.is_empty() || !body.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = body
        .bytes()
        .try_fold(0i64, |acc, c| acc.checked_mul(10)?.checked_add(i64::from(c - b'0')))?;
    Some(if neg { -value } else { value })
}

/// Decimal such as `"3.75"` in tenths, truncated (`37`)
pub fn parse_tenths(text: &str) -> Option<u32> {
    let t = text.trim();
    let (whole, frac) = t.split_once('.').unwrap_or((t, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let tenth = frac.bytes().next().map_or(0, |c| u32::from(c - b'0'));
    Some(parse_uint(whole).saturating_mul(10).saturating_add(tenth))
}

/// `"1"` or `"true"`; everything else is false
pub fn parse_flag(text: &str) -> bool {
    matches!(text.trim(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    const IST: i32 = 330;

    #[test]
    fn test_datetime_local_offset() {
        let t = parse_datetime("2026-10-14 09:30", IST).unwrap();
        // 04:00 UTC
        assert_eq!(t, 1_791_950_400);
        assert_eq!(parse_datetime("2026-10-14T09:30", IST), Ok(t));
        assert_eq!(parse_datetime(" 2026-10-14 09:30:59 ", IST), Ok(t));
    }

    #[test]
    fn test_datetime_rejects() {
        assert_eq!(parse_datetime("", IST), Err(ScheduleError::Format));
        assert_eq!(parse_datetime("tomorrow", IST), Err(ScheduleError::Format));
        assert_eq!(parse_datetime("2026/10/14 09:30", IST), Err(ScheduleError::Format));
        assert_eq!(parse_datetime("20x6-10-14 09:30", IST), Err(ScheduleError::Format));
        assert_eq!(parse_datetime("1999-12-31 23:59", IST), Err(ScheduleError::Year));
        assert_eq!(parse_datetime("2026-13-01 00:00", IST), Err(ScheduleError::Range));
        assert_eq!(parse_datetime("2026-02-30 00:00", IST), Err(ScheduleError::Range));
        assert_eq!(parse_datetime("2026-01-01 24:00", IST), Err(ScheduleError::Range));
        assert_eq!(Error::from(ScheduleError::Year), Error::InvalidSchedule);
    }

    #[test]
    fn test_extract_sender() {
        assert_eq!(extract_sender("WhatsApp: Priya "), "Priya");
        assert_eq!(extract_sender("a:b:c"), "c");
        assert_eq!(extract_sender("Mum"), "Mum");
        assert_eq!(extract_sender("Group:  "), "Unknown");
        assert_eq!(extract_sender(""), "Unknown");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_uint("15"), 15);
        assert_eq!(parse_uint("15min"), 15);
        assert_eq!(parse_uint("x"), 0);
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("+12"), Some(12));
        assert_eq!(parse_int("1e3"), None);
        assert_eq!(parse_tenths("3.75"), Some(37));
        assert_eq!(parse_tenths("42"), Some(420));
        assert_eq!(parse_tenths(".5"), Some(5));
        assert_eq!(parse_tenths("fast"), None);
        assert_eq!(parse_tenths(""), None);
    }

    #[test]
    fn test_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
