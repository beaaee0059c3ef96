//! Terminal geometry
//!
//! Cell positions of every zone on the 40x14 terminal.

use noticeboard_core::render::{body_rows, ZoneContent};
use noticeboard_core::state::ScreenMode;
use noticeboard_protocol::{TERMINAL_COLS, TERMINAL_ROWS};

pub const HEADER_ROW: u8 = 0;
pub const TITLE_COL: u8 = 0;
pub const TITLE_WIDTH: u8 = 20;
pub const CLOCK_COL: u8 = 21;
pub const CLOCK_WIDTH: u8 = TERMINAL_COLS - CLOCK_COL;

pub const STATUS_ROW: u8 = 1;
/// Ticker text starts after the disc glyph and a space
pub const TICKER_COL: u8 = 2;
pub const TICKER_WIDTH: u8 = TERMINAL_COLS - TICKER_COL;

pub const RULE_ROW: u8 = 2;
pub const BODY_ROW: u8 = 3;

pub const NOTIFICATION_HEIGHT: u8 = 3;
pub const REMINDER_HEIGHT: u8 = 2;
pub const CALENDAR_HEIGHT: u8 = 1;

/// Calendar grid: seven three-cell day columns, centred
pub const CALENDAR_COL: u8 = (TERMINAL_COLS - 21) / 2;

/// Terminal rows `(first, count)` owned by a content zone
///
/// The zone holding the last body row also owns everything below it, so
/// the zones of any screen tile the body down to the bottom edge. `None`
/// for header content.
pub fn zone_rows(content: ZoneContent) -> Option<(u8, u8)> {
    let (mode, first, count, height) = match content {
        ZoneContent::Notifications { first, count } => {
            (ScreenMode::Notifications, first, count, NOTIFICATION_HEIGHT)
        }
        ZoneContent::Reminders { first, count } => {
            (ScreenMode::Reminders, first, count, REMINDER_HEIGHT)
        }
        ZoneContent::Calendar { first, count } => {
            (ScreenMode::Calendar, first, count, CALENDAR_HEIGHT)
        }
        _ => return None,
    };
    let top = BODY_ROW + first * height;
    if first + count >= body_rows(mode) {
        Some((top, TERMINAL_ROWS.saturating_sub(top)))
    } else {
        Some((top, count * height))
    }
}
