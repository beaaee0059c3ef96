//! Display terminal link
//!
//! [`DisplayBackend`] that turns every drawing primitive into a terminal
//! message queued for the UART transmit task.

use portable_atomic::Ordering;

use noticeboard_display::{DisplayBackend, DisplayError};
use noticeboard_protocol::{TerminalMessage, TERMINAL_COLS, TERMINAL_ROWS};

use crate::channels::{TERMINAL_READY, TERMINAL_TX};

/// Free queue slots required before a zone is drawn
///
/// The busiest zone (five notifications with highlights) needs fewer.
const DRAW_HEADROOM: usize = 24;

#[derive(Debug, Default)]
pub struct TerminalLink {
    queued: u32,
}

impl TerminalLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages queued since boot
    pub fn queued(&self) -> u32 {
        self.queued
    }

    fn send(&mut self, message: TerminalMessage<'_>) -> Result<(), DisplayError> {
        let packet = message
            .encode()
            .map_err(|_| DisplayError::InvalidCoordinates)?;
        TERMINAL_TX
            .try_send(packet)
            .map_err(|_| DisplayError::BufferOverflow)?;
        self.queued = self.queued.wrapping_add(1);
        Ok(())
    }
}

impl DisplayBackend for TerminalLink {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.send(TerminalMessage::Clear)
    }

    fn clear_rows(&mut self, first: u8, count: u8) -> Result<(), DisplayError> {
        self.send(TerminalMessage::ClearRows { first, count })
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.send(TerminalMessage::Text { row, col, text })
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        self.send(TerminalMessage::Invert {
            row,
            start_col,
            end_col,
        })
    }

    fn hline(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        self.send(TerminalMessage::HLine {
            row,
            start_col,
            end_col,
        })
    }

    /// Messages go out as they are queued
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (TERMINAL_COLS, TERMINAL_ROWS)
    }

    fn is_ready(&self) -> bool {
        TERMINAL_READY.load(Ordering::Acquire) && TERMINAL_TX.free_capacity() >= DRAW_HEADROOM
    }
}
