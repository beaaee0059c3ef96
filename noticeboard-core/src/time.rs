//! Wall-clock helpers
//!
//! Local time is UTC plus a fixed offset in minutes. Every conversion is
//! checked: an epoch chrono cannot represent yields `None`.

use core::fmt::Write;

use chrono::{
    DateTime, Datelike, FixedOffset, Month, Months, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};
use heapless::String;

/// Seconds since 1970-01-01T00:00:00Z
pub type EpochSecs = i64;

/// Wall clock broken down at the configured UTC offset
pub type LocalTime = DateTime<FixedOffset>;

/// Earliest wall-clock value accepted as synchronised (2020-01-01T00:00:00Z)
///
/// A clock source that reports anything older has not been set yet.
pub const MIN_VALID_EPOCH: EpochSecs = 1_577_836_800;

/// Latest wall-clock value accepted (9999-12-31T23:59:59Z)
pub const MAX_VALID_EPOCH: EpochSecs = 253_402_300_799;

/// Length of a formatted clock string, e.g. `Wed,14-Oct,09:05:00`
pub const CLOCK_TEXT_LEN: usize = 19;

/// Returns true when the clock value lies between the synchronisation
/// floor and the ceiling
pub fn is_synchronised(epoch: EpochSecs) -> bool {
    (MIN_VALID_EPOCH..=MAX_VALID_EPOCH).contains(&epoch)
}

/// Returns true for a stored timestamp the display can work with
///
/// Looser than [`is_synchronised`]: a reminder may be due before 2020.
pub fn is_plausible(epoch: EpochSecs) -> bool {
    (0..=MAX_VALID_EPOCH).contains(&epoch)
}

fn fixed_offset(offset_minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(offset_minutes.checked_mul(60)?)
}

/// Local time of `epoch` at `offset_minutes` from UTC
pub fn local_time(epoch: EpochSecs, offset_minutes: i32) -> Option<LocalTime> {
    let utc = DateTime::from_timestamp(epoch, 0)?;
    Some(utc.with_timezone(&fixed_offset(offset_minutes)?))
}

/// Epoch seconds of a local date-time
pub fn local_epoch(local: NaiveDateTime, offset_minutes: i32) -> Option<EpochSecs> {
    fixed_offset(offset_minutes)?
        .from_local_datetime(&local)
        .single()
        .map(|t| t.timestamp())
}

/// Convert a local civil date-time to epoch seconds
///
/// Returns `None` for out-of-range fields.
pub fn epoch_from_local(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    offset_minutes: i32,
) -> Option<EpochSecs> {
    let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    local_epoch(local, offset_minutes)
}

/// Format as `%a,%d-%b,%H:%M:%S`
pub fn clock_text(t: &LocalTime) -> String<CLOCK_TEXT_LEN> {
    let mut out = String::new();
    // 19 bytes always fit
    let _ = write!(
        out,
        "{},{:02}-{},{:02}:{:02}:{:02}",
        t.weekday(),
        t.day(),
        month_abbrev(t.month()),
        t.hour(),
        t.minute(),
        t.second()
    );
    out
}

/// Full month name for a 1-based month, empty when out of range
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

/// Short month name for a 1-based month
pub fn month_abbrev(month: u32) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}

/// Number of days in the month starting at `first`
pub fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// First day of the month `offset` months away from `today`'s
pub fn shift_month(today: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let first = today.with_day(1)?;
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}
