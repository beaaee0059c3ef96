//! Zone canvas for character terminals
//!
//! Turns each `(zone, content)` pair from the render scheduler into cell
//! drawing on a [`DisplayBackend`]. Every draw first blanks the zone's
//! region, so a zone never shows leftovers from a previous screen.

use core::fmt::Write;

use chrono::Datelike;
use heapless::String;
use noticeboard_core::config::DeviceConfig;
use noticeboard_core::entity::text::ellipsized;
use noticeboard_core::entity::{Notification, Priority, Reminder};
use noticeboard_core::render::{ClockUpdate, Frame, Zone, ZoneContent};
use noticeboard_core::state::{ScreenMode, Telemetry};
use noticeboard_core::time::{days_in_month, month_name};
use noticeboard_core::traits::{Canvas, CanvasError};
use noticeboard_protocol::TERMINAL_COLS;

use crate::backend::{DisplayBackend, DisplayError};
use crate::layout::*;
use crate::screen::ROW_BYTES;

type Line = String<ROW_BYTES>;

/// Disc animation glyphs, one per frame modulo the cycle
pub const DISC_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";

/// [`Canvas`] over a character display
pub struct ZoneCanvas<B> {
    backend: B,
    char_advance_px: u16,
}

impl<B: DisplayBackend> ZoneCanvas<B> {
    /// `char_advance_px` converts the ticker's pixel offset into cells
    pub fn new(backend: B, char_advance_px: u16) -> Self {
        Self {
            backend,
            char_advance_px: char_advance_px.max(1),
        }
    }

    pub fn from_config(backend: B, config: &DeviceConfig) -> Self {
        Self::new(backend, config.ticker.char_advance_px)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    fn draw_title(&mut self, mode: ScreenMode) -> Result<(), DisplayError> {
        let line: Line = padded(mode.title(), TITLE_WIDTH);
        self.backend.draw_text(HEADER_ROW, TITLE_COL, &line)?;
        self.backend.hline(RULE_ROW, 0, TERMINAL_COLS)
    }

    fn draw_clock(&mut self, update: ClockUpdate, text: &str) -> Result<(), DisplayError> {
        if text.is_empty() {
            let line: Line = padded("--:--:--", CLOCK_WIDTH);
            return self.backend.draw_text(HEADER_ROW, CLOCK_COL, &line);
        }
        match update {
            ClockUpdate::Full => {
                let line: Line = padded(text, CLOCK_WIDTH);
                self.backend.draw_text(HEADER_ROW, CLOCK_COL, &line)
            }
            ClockUpdate::Cells(_) => {
                // One draw per run of changed cells
                let len = text.len();
                let mut i = 0;
                while i < len {
                    if !update.touches(i) {
                        i += 1;
                        continue;
                    }
                    let start = i;
                    while i < len && update.touches(i) {
                        i += 1;
                    }
                    if let Some(run) = text.get(start..i) {
                        self.backend
                            .draw_text(HEADER_ROW, CLOCK_COL + start as u8, run)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn draw_status(&mut self, frame: &Frame<'_>) -> Result<(), DisplayError> {
        let line = if frame.telemetry.gaming_mode {
            telemetry_line(frame.telemetry)
        } else {
            self.ticker_line(frame)
        };
        let line: Line = padded(&line, TERMINAL_COLS);
        self.backend.draw_text(STATUS_ROW, 0, &line)
    }

    fn ticker_line(&self, frame: &Frame<'_>) -> Line {
        let ticker = frame.ticker;
        let mut line = Line::new();
        let glyph = DISC_GLYPHS[usize::from(ticker.disc_frame) % DISC_GLYPHS.len()];
        let _ = line.push(glyph);
        let _ = line.push(' ');

        if !ticker.active {
            let _ = line.push_str("Nothing playing");
            return line;
        }

        let text = ticker.text();
        let width = usize::from(TICKER_WIDTH);
        let shown = text.trim_end();
        if shown.chars().count() <= width {
            let _ = line.push_str(shown);
            return line;
        }

        let total = text.chars().count();
        let offset = (ticker.scroll_px / u32::from(self.char_advance_px)) as usize % total;
        for c in text.chars().cycle().skip(offset).take(width) {
            let _ = line.push(c);
        }
        line
    }

    fn draw_notifications(&mut self, frame: &Frame<'_>, first: u8, count: u8) -> Result<(), DisplayError> {
        let top = BODY_ROW + first * NOTIFICATION_HEIGHT;
        if first == 0 && frame.notifications.iter().all(Notification::is_empty) {
            return self.backend.draw_text(top, 0, "No notifications");
        }
        for k in 0..count {
            let Some(n) = frame.notification(usize::from(first + k)) else {
                continue;
            };
            let row = top + k * NOTIFICATION_HEIGHT;

            let mut head = Line::new();
            let _ = write!(head, "{}  {}", n.app, n.sender);
            self.backend.draw_text(row, 0, &head)?;
            match n.priority {
                Priority::High => {
                    let end = n.app.chars().count().min(usize::from(TERMINAL_COLS)) as u8;
                    self.backend.invert_region(row, 0, end)?;
                }
                Priority::Medium => self.backend.draw_text(row, TERMINAL_COLS - 1, "!")?,
                Priority::Normal => {}
            }

            // Message wraps onto the third row
            let cols = usize::from(TERMINAL_COLS);
            let split = n
                .message
                .char_indices()
                .nth(cols)
                .map_or(n.message.len(), |(i, _)| i);
            let (upper, lower) = n.message.split_at(split);
            self.backend.draw_text(row + 1, 0, upper)?;
            if !lower.is_empty() {
                self.backend.draw_text(row + 2, 0, lower)?;
            }
        }
        Ok(())
    }

    fn draw_reminders(&mut self, frame: &Frame<'_>, first: u8, count: u8) -> Result<(), DisplayError> {
        let top = BODY_ROW + first * REMINDER_HEIGHT;
        if first == 0 && frame.reminders.is_empty() {
            return self.backend.draw_text(top, 0, "No reminders");
        }
        for k in 0..count {
            let Some(r) = frame.reminder(usize::from(first + k)) else {
                continue;
            };
            let row = top + k * REMINDER_HEIGHT;

            let mut head = Line::new();
            let _ = write!(head, "{:>3} ", r.id);
            let label_col = head.len() as u8;
            let _ = head.push_str(&due_label(frame, r));
            if r.priority == Priority::High {
                let _ = head.push_str(" !");
            }
            self.backend.draw_text(row, 0, &head)?;
            if r.triggered {
                self.backend.invert_region(row, label_col, label_col + 3)?;
            }

            let body: Line = ellipsized(&r.message, usize::from(TERMINAL_COLS - 4));
            self.backend.draw_text(row + 1, 4, &body)?;
        }
        Ok(())
    }

    fn draw_calendar(&mut self, frame: &Frame<'_>, first: u8, count: u8) -> Result<(), DisplayError> {
        let top = BODY_ROW + first * CALENDAR_HEIGHT;
        let Some(month_start) = frame.calendar_month else {
            if first == 0 {
                self.backend.draw_text(top, 0, "Clock not set")?;
            }
            return Ok(());
        };

        let lead = month_start.weekday().num_days_from_monday() as i16;
        let days = days_in_month(month_start).unwrap_or(0) as i16;
        let today = frame
            .local
            .filter(|t| t.year() == month_start.year() && t.month() == month_start.month())
            .map(|t| t.day() as i16);

        for k in 0..count {
            let row = top + k;
            match first + k {
                0 => {
                    let mut title = Line::new();
                    let _ = write!(
                        title,
                        "{} {}",
                        month_name(month_start.month()),
                        month_start.year()
                    );
                    let col = (usize::from(TERMINAL_COLS) - title.len()) / 2;
                    self.backend.draw_text(row, col as u8, &title)?;
                }
                1 => self.backend.draw_text(row, CALENDAR_COL, WEEKDAY_HEADER)?,
                index => {
                    let week = i16::from(index - 2);
                    let mut cells = Line::new();
                    let mut marked = None;
                    let mut any = false;
                    for c in 0..7i16 {
                        let day = week * 7 + c + 1 - lead;
                        if (1..=days).contains(&day) {
                            let _ = write!(cells, "{:>2} ", day);
                            any = true;
                            if today == Some(day) {
                                marked = Some(c as u8);
                            }
                        } else {
                            let _ = cells.push_str("   ");
                        }
                    }
                    if !any {
                        continue;
                    }
                    self.backend.draw_text(row, CALENDAR_COL, cells.trim_end())?;
                    if let Some(c) = marked {
                        let col = CALENDAR_COL + c * 3;
                        self.backend.invert_region(row, col, col + 2)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<B: DisplayBackend> Canvas for ZoneCanvas<B> {
    fn draw(
        &mut self,
        _zone: Zone,
        content: ZoneContent,
        frame: &Frame<'_>,
    ) -> Result<(), CanvasError> {
        if !self.backend.is_ready() {
            return Err(CanvasError::Busy);
        }

        if let Some((top, rows)) = zone_rows(content) {
            self.backend.clear_rows(top, rows)?;
        }

        match content {
            ZoneContent::Title(mode) => self.draw_title(mode)?,
            ZoneContent::Clock(update) => self.draw_clock(update, frame.clock_text)?,
            ZoneContent::Status => self.draw_status(frame)?,
            ZoneContent::Notifications { first, count } => {
                self.draw_notifications(frame, first, count)?
            }
            ZoneContent::Reminders { first, count } => self.draw_reminders(frame, first, count)?,
            ZoneContent::Calendar { first, count } => self.draw_calendar(frame, first, count)?,
        }

        self.backend.flush()?;
        Ok(())
    }
}

/// `text` cut or blank-filled to exactly `width` cells
fn padded<const N: usize>(text: &str, width: u8) -> String<N> {
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars().take(width) {
        if out.push(c).is_err() {
            break;
        }
        used += 1;
    }
    for _ in used..width {
        if out.push(' ').is_err() {
            break;
        }
    }
    out
}

/// Compact PC stats: `61C 35% 4.2G|70C 99%|12G|v12 ^3.4`
///
/// The CPU temperature is left out while it reads zero.
fn telemetry_line(t: &Telemetry) -> Line {
    let mut line = Line::new();
    if t.cpu_temp_c > 0 {
        let _ = write!(line, "{}C ", t.cpu_temp_c);
    }
    let _ = write!(
        line,
        "{}% {}.{}G|{}C {}%|{}G|v",
        t.cpu_usage_pct,
        t.cpu_ghz_x10 / 10,
        t.cpu_ghz_x10 % 10,
        t.gpu_temp_c,
        t.gpu_usage_pct,
        t.ram_used_gb
    );
    push_rate(&mut line, t.net_down_x10);
    let _ = line.push_str(" ^");
    push_rate(&mut line, t.net_up_x10);
    line
}

/// Mbit/s from tenths; one decimal below 10
fn push_rate(line: &mut Line, x10: u16) {
    let _ = if x10 >= 100 {
        write!(line, "{}", x10 / 10)
    } else {
        write!(line, "{}.{}", x10 / 10, x10 % 10)
    };
}

/// Compact remaining time, minutes rounded up: `1d 2h 5m`, `2h 0m`, `7m`
pub fn countdown(secs: i64) -> String<16> {
    let minutes = secs.max(0).saturating_add(59) / 60;
    let (d, h, m) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    let mut out = String::new();
    let _ = if d > 0 {
        write!(out, "{}d {}h {}m", d, h, m)
    } else if h > 0 {
        write!(out, "{}h {}m", h, m)
    } else {
        write!(out, "{}m", m)
    };
    out
}

fn due_label(frame: &Frame<'_>, r: &Reminder) -> String<32> {
    let mut out = String::new();
    if r.triggered {
        let _ = out.push_str("DUE");
        if let Some(secs) = frame.seconds_until(r).filter(|_| r.next_review_at.is_some()) {
            let _ = write!(out, " again in {}", countdown(secs));
        }
        if r.review_count > 0 {
            let _ = write!(out, " x{}", r.review_count);
        }
        return out;
    }
    match (r.due_at, frame.seconds_until(r)) {
        (None, _) => {
            let _ = out.push_str("no due time");
        }
        (Some(_), None) => {
            let _ = out.push_str("--");
        }
        (Some(_), Some(secs)) if secs <= 0 => {
            let _ = out.push_str("due now");
        }
        (Some(_), Some(secs)) => {
            let _ = write!(out, "in {}", countdown(secs));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded() {
        let s: String<16> = padded("abc", 5);
        assert_eq!(s.as_str(), "abc  ");
        let s: String<16> = padded("abcdef", 4);
        assert_eq!(s.as_str(), "abcd");
    }

    #[test]
    fn test_countdown() {
        assert_eq!(countdown(30).as_str(), "1m");
        assert_eq!(countdown(60).as_str(), "1m");
        assert_eq!(countdown(61).as_str(), "2m");
        assert_eq!(countdown(2 * 3600).as_str(), "2h 0m");
        assert_eq!(countdown(86_400 + 2 * 3600 + 5 * 60).as_str(), "1d 2h 5m");
        assert_eq!(countdown(-10).as_str(), "0m");
    }

    #[test]
    fn test_telemetry_line_fits() {
        let t = Telemetry {
            gaming_mode: true,
            cpu_temp_c: 61,
            cpu_usage_pct: 35,
            cpu_ghz_x10: 42,
            ram_used_gb: 12,
            ram_total_gb: 32,
            gpu_temp_c: 70,
            gpu_usage_pct: 99,
            net_down_x10: 125,
            net_up_x10: 34,
        };
        let line = telemetry_line(&t);
        assert_eq!(line.as_str(), "61C 35% 4.2G|70C 99%|12G|v12 ^3.4");
        assert!(line.chars().count() <= usize::from(TERMINAL_COLS));

        let cold = Telemetry {
            cpu_temp_c: 0,
            net_down_x10: 0,
            ..t
        };
        assert_eq!(telemetry_line(&cold).as_str(), "35% 4.2G|70C 99%|12G|v0.0 ^3.4");
    }

    #[test]
    fn test_telemetry_line_worst_case_fits() {
        let t = Telemetry {
            gaming_mode: true,
            cpu_temp_c: 100,
            cpu_usage_pct: 100,
            cpu_ghz_x10: 99,
            ram_used_gb: 128,
            ram_total_gb: 128,
            gpu_temp_c: 100,
            gpu_usage_pct: 100,
            net_down_x10: 9_999,
            net_up_x10: 9_999,
        };
        assert!(telemetry_line(&t).chars().count() <= usize::from(TERMINAL_COLS));
    }

    #[test]
    fn test_countdown_saturates() {
        assert!(countdown(i64::MAX).starts_with("106751991167300d"));
    }
}
