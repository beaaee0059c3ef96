//! Screen buffer
//!
//! A character grid that records what a terminal would show. Used as the
//! backend in host tests and as the frame buffer of a terminal that decodes
//! [`TerminalMessage`]s.

use heapless::String;
use noticeboard_protocol::{TerminalMessage, TERMINAL_COLS, TERMINAL_ROWS};

use crate::backend::{DisplayBackend, DisplayError};

pub const SCREEN_ROWS: usize = TERMINAL_ROWS as usize;
pub const SCREEN_COLS: usize = TERMINAL_COLS as usize;

/// Glyph stored for horizontal rules
pub const RULE_GLYPH: char = '-';

/// Bytes needed for one row of multibyte characters
pub const ROW_BYTES: usize = SCREEN_COLS * 4;

#[derive(Clone)]
pub struct Screen {
    cells: [[char; SCREEN_COLS]; SCREEN_ROWS],
    inverted: [[bool; SCREEN_COLS]; SCREEN_ROWS],
    /// Bit n set when row n changed since the last flush
    dirty_rows: u16,
    flushes: u32,
    text_draws: u32,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            cells: [[' '; SCREEN_COLS]; SCREEN_ROWS],
            inverted: [[false; SCREEN_COLS]; SCREEN_ROWS],
            dirty_rows: 0,
            flushes: 0,
            text_draws: 0,
        }
    }

    /// Row contents with trailing blanks trimmed
    pub fn row(&self, row: usize) -> String<ROW_BYTES> {
        let mut out = String::new();
        if let Some(cells) = self.cells.get(row) {
            for &c in cells {
                let _ = out.push(c);
            }
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out
    }

    /// Characters `start..end` of a row, untrimmed
    pub fn span(&self, row: usize, start: usize, end: usize) -> String<ROW_BYTES> {
        let mut out = String::new();
        if let Some(cells) = self.cells.get(row) {
            for &c in cells.iter().take(end.min(SCREEN_COLS)).skip(start) {
                let _ = out.push(c);
            }
        }
        out
    }

    pub fn is_inverted(&self, row: usize, col: usize) -> bool {
        self.inverted
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Take and reset the changed-row mask
    pub fn take_dirty_rows(&mut self) -> u16 {
        core::mem::take(&mut self.dirty_rows)
    }

    pub fn flush_count(&self) -> u32 {
        self.flushes
    }

    /// Number of `draw_text` calls so far
    pub fn text_draws(&self) -> u32 {
        self.text_draws
    }

    /// Apply a drawing command received from the controller
    pub fn apply(&mut self, msg: &TerminalMessage<'_>) -> Result<(), DisplayError> {
        match *msg {
            TerminalMessage::Clear | TerminalMessage::Reset => self.clear(),
            TerminalMessage::ClearRows { first, count } => self.clear_rows(first, count),
            TerminalMessage::Text { row, col, text } => self.draw_text(row, col, text),
            TerminalMessage::Invert {
                row,
                start_col,
                end_col,
            } => self.invert_region(row, start_col, end_col),
            TerminalMessage::HLine {
                row,
                start_col,
                end_col,
            } => self.hline(row, start_col, end_col),
            TerminalMessage::Pong => Ok(()),
        }
    }

    fn check_row(row: u8) -> Result<usize, DisplayError> {
        let row = usize::from(row);
        if row < SCREEN_ROWS {
            Ok(row)
        } else {
            Err(DisplayError::InvalidCoordinates)
        }
    }

    fn check_span(row: u8, start: u8, end: u8) -> Result<(usize, usize, usize), DisplayError> {
        let row = Self::check_row(row)?;
        let end = usize::from(end).min(SCREEN_COLS);
        let start = usize::from(start);
        if start > end {
            return Err(DisplayError::InvalidCoordinates);
        }
        Ok((row, start, end))
    }

    fn touch(&mut self, row: usize) {
        self.dirty_rows |= 1 << row;
    }
}

impl DisplayBackend for Screen {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.clear_rows(0, TERMINAL_ROWS)
    }

    fn clear_rows(&mut self, first: u8, count: u8) -> Result<(), DisplayError> {
        let first = Self::check_row(first)?;
        let end = (first + usize::from(count)).min(SCREEN_ROWS);
        for row in first..end {
            self.cells[row] = [' '; SCREEN_COLS];
            self.inverted[row] = [false; SCREEN_COLS];
            self.touch(row);
        }
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let row = Self::check_row(row)?;
        let col = usize::from(col);
        if col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        for (cell, c) in self.cells[row][col..].iter_mut().zip(text.chars()) {
            *cell = c;
        }
        self.text_draws += 1;
        self.touch(row);
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        let (row, start, end) = Self::check_span(row, start_col, end_col)?;
        for cell in &mut self.inverted[row][start..end] {
            *cell = true;
        }
        self.touch(row);
        Ok(())
    }

    fn hline(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        let (row, start, end) = Self::check_span(row, start_col, end_col)?;
        for cell in &mut self.cells[row][start..end] {
            *cell = RULE_GLYPH;
        }
        self.touch(row);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.flushes += 1;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (TERMINAL_COLS, TERMINAL_ROWS)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for row in 0..SCREEN_ROWS {
            if row > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", self.row(row).as_str());
        }
        defmt::write!(f, "]");
    }
}
