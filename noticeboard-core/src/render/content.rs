//! Content resolution
//!
//! Maps a (zone, screen mode, layout) triple to what the canvas should draw
//! there. The body of each screen is a list of rows; with the slotted
//! layout the rows are split contiguously across the three content zones.

use crate::config::ContentLayout;
use crate::state::ScreenMode;

use super::zone::Zone;

/// Notification slots visible on the notifications screen
pub const NOTIFICATION_SLOTS: u8 = 3;

/// Reminder rows visible on the reminders screen
pub const REMINDER_ROWS: u8 = 5;

/// Calendar rows: month title, weekday header and six week rows
pub const CALENDAR_ROWS: u8 = 8;

/// How the clock zone is to be updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockUpdate {
    /// Redraw every character cell
    Full,
    /// Redraw only the cells whose bit is set (bit n = character n)
    Cells(u32),
}

impl ClockUpdate {
    /// Check whether character cell `index` needs drawing
    pub fn touches(&self, index: usize) -> bool {
        match self {
            ClockUpdate::Full => true,
            ClockUpdate::Cells(mask) => index < 32 && mask & (1 << index) != 0,
        }
    }
}

/// What a zone shows this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZoneContent {
    /// Screen title
    Title(ScreenMode),
    /// Wall clock text from the frame
    Clock(ClockUpdate),
    /// Now-playing ticker or PC telemetry
    Status,
    /// Notification slots `first..first + count`
    Notifications { first: u8, count: u8 },
    /// Active reminder rows `first..first + count`
    Reminders { first: u8, count: u8 },
    /// Calendar rows `first..first + count`
    Calendar { first: u8, count: u8 },
}

/// Rows in the body of a screen
pub fn body_rows(mode: ScreenMode) -> u8 {
    match mode {
        ScreenMode::Notifications => NOTIFICATION_SLOTS,
        ScreenMode::Reminders => REMINDER_ROWS,
        ScreenMode::Calendar => CALENDAR_ROWS,
    }
}

/// Contiguous share of `total` rows for part `index` of `parts`
///
/// Earlier parts take the remainder, so 5 rows over 3 parts is 2, 2, 1.
pub fn partition(total: u8, parts: u8, index: u8) -> (u8, u8) {
    if parts == 0 || index >= parts {
        return (total, 0);
    }
    let base = total / parts;
    let extra = total % parts;
    let count = base + u8::from(index < extra);
    let first = index * base + index.min(extra);
    (first, count)
}

/// Resolve the content renderer for a header zone
///
/// Header zones do not depend on layout; the clock update is supplied by
/// the scheduler.
pub fn header_content(zone: Zone, mode: ScreenMode, clock: ClockUpdate) -> Option<ZoneContent> {
    match zone {
        Zone::Title => Some(ZoneContent::Title(mode)),
        Zone::Clock => Some(ZoneContent::Clock(clock)),
        Zone::Status => Some(ZoneContent::Status),
        _ => None,
    }
}

/// Resolve the content renderer for a content zone
///
/// Returns `None` for header zones and for content zones outside the
/// layout.
pub fn body_content(zone: Zone, mode: ScreenMode, layout: ContentLayout) -> Option<ZoneContent> {
    let index = zone.content_index()?;
    let parts = layout.zone_count();
    if index >= parts {
        return None;
    }
    let (first, count) = partition(body_rows(mode), parts as u8, index as u8);
    Some(match mode {
        ScreenMode::Notifications => ZoneContent::Notifications { first, count },
        ScreenMode::Reminders => ZoneContent::Reminders { first, count },
        ScreenMode::Calendar => ZoneContent::Calendar { first, count },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_spreads_remainder_first() {
        assert_eq!(partition(5, 3, 0), (0, 2));
        assert_eq!(partition(5, 3, 1), (2, 2));
        assert_eq!(partition(5, 3, 2), (4, 1));
        assert_eq!(partition(8, 1, 0), (0, 8));
    }

    #[test]
    fn test_single_layout_takes_whole_body() {
        assert_eq!(
            body_content(Zone::Content1, ScreenMode::Reminders, ContentLayout::Single),
            Some(ZoneContent::Reminders { first: 0, count: 5 })
        );
        assert_eq!(
            body_content(Zone::Content2, ScreenMode::Reminders, ContentLayout::Single),
            None
        );
    }

    #[test]
    fn test_slotted_notifications_one_per_zone() {
        for (i, zone) in [Zone::Content1, Zone::Content2, Zone::Content3]
            .into_iter()
            .enumerate()
        {
            assert_eq!(
                body_content(zone, ScreenMode::Notifications, ContentLayout::Slotted),
                Some(ZoneContent::Notifications {
                    first: i as u8,
                    count: 1
                })
            );
        }
    }

    #[test]
    fn test_header_content() {
        assert_eq!(
            header_content(Zone::Title, ScreenMode::Calendar, ClockUpdate::Full),
            Some(ZoneContent::Title(ScreenMode::Calendar))
        );
        assert_eq!(
            header_content(Zone::Content1, ScreenMode::Calendar, ClockUpdate::Full),
            None
        );
    }

    #[test]
    fn test_clock_update_touches() {
        let update = ClockUpdate::Cells(0b101);
        assert!(update.touches(0));
        assert!(!update.touches(1));
        assert!(update.touches(2));
        assert!(ClockUpdate::Full.touches(18));
    }
}
