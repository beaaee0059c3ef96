//! Display terminal link
//!
//! The terminal is a character screen: it keeps no application state,
//! draws what the controller sends and reports knob input.

use crate::input::InputEvent;
use crate::packet::{FrameError, Packet, PayloadWriter};

// Terminal -> controller
pub const MSG_INPUT: u8 = 0x01;
pub const MSG_PING: u8 = 0x02;
pub const MSG_ACK: u8 = 0x03;

// Controller -> terminal
pub const MSG_CLEAR: u8 = 0x20;
pub const MSG_TEXT: u8 = 0x21;
pub const MSG_INVERT: u8 = 0x22;
pub const MSG_HLINE: u8 = 0x23;
pub const MSG_PONG: u8 = 0x24;
pub const MSG_CLEAR_ROWS: u8 = 0x25;
pub const MSG_RESET: u8 = 0x2F;

pub const TERMINAL_ROWS: u8 = 14;
pub const TERMINAL_COLS: u8 = 40;

/// Drawing commands for the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminalMessage<'a> {
    Clear,
    /// Blank `count` rows starting at `first`
    ClearRows { first: u8, count: u8 },
    /// Text clipped to the right edge of the screen
    Text { row: u8, col: u8, text: &'a str },
    Invert { row: u8, start_col: u8, end_col: u8 },
    HLine { row: u8, start_col: u8, end_col: u8 },
    Pong,
    Reset,
}

impl<'a> TerminalMessage<'a> {
    pub fn encode(&self) -> Result<Packet, FrameError> {
        match *self {
            TerminalMessage::Clear => Ok(Packet::bare(MSG_CLEAR)),
            TerminalMessage::ClearRows { first, count } => {
                Packet::new(MSG_CLEAR_ROWS, &[first, count])
            }
            TerminalMessage::Text { row, col, text } => {
                let room = usize::from(TERMINAL_COLS.saturating_sub(col));
                let end = text.char_indices().nth(room).map_or(text.len(), |(i, _)| i);
                let clipped = &text[..end];
                let mut w = PayloadWriter::new();
                w.u8(row)?.u8(col)?.text(clipped)?;
                Ok(w.finish(MSG_TEXT))
            }
            TerminalMessage::Invert {
                row,
                start_col,
                end_col,
            } => Packet::new(MSG_INVERT, &[row, start_col, end_col]),
            TerminalMessage::HLine {
                row,
                start_col,
                end_col,
            } => Packet::new(MSG_HLINE, &[row, start_col, end_col]),
            TerminalMessage::Pong => Ok(Packet::bare(MSG_PONG)),
            TerminalMessage::Reset => Ok(Packet::bare(MSG_RESET)),
        }
    }

    /// Terminal-side decoding
    pub fn decode(packet: &'a Packet) -> Result<Self, FrameError> {
        let mut r = packet.reader();
        let msg = match packet.kind {
            MSG_CLEAR => TerminalMessage::Clear,
            MSG_CLEAR_ROWS => TerminalMessage::ClearRows {
                first: r.u8()?,
                count: r.u8()?,
            },
            MSG_TEXT => TerminalMessage::Text {
                row: r.u8()?,
                col: r.u8()?,
                text: r.text()?,
            },
            MSG_INVERT => TerminalMessage::Invert {
                row: r.u8()?,
                start_col: r.u8()?,
                end_col: r.u8()?,
            },
            MSG_HLINE => TerminalMessage::HLine {
                row: r.u8()?,
                start_col: r.u8()?,
                end_col: r.u8()?,
            },
            MSG_PONG => TerminalMessage::Pong,
            MSG_RESET => TerminalMessage::Reset,
            other => return Err(FrameError::UnknownType(other)),
        };
        Ok(msg)
    }
}

/// Reports from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminalEvent {
    Input(InputEvent),
    /// Heartbeat; answered with [`TerminalMessage::Pong`]
    Ping,
    Ack { seq: u8 },
}

impl TerminalEvent {
    pub fn decode(packet: &Packet) -> Result<Self, FrameError> {
        let mut r = packet.reader();
        match packet.kind {
            MSG_INPUT => InputEvent::from_byte(r.u8()?)
                .map(TerminalEvent::Input)
                .ok_or(FrameError::InvalidField),
            MSG_PING => Ok(TerminalEvent::Ping),
            MSG_ACK => Ok(TerminalEvent::Ack { seq: r.u8()? }),
            other => Err(FrameError::UnknownType(other)),
        }
    }

    pub fn encode(&self) -> Result<Packet, FrameError> {
        match *self {
            TerminalEvent::Input(event) => Packet::new(MSG_INPUT, &[event.to_byte()]),
            TerminalEvent::Ping => Ok(Packet::bare(MSG_PING)),
            TerminalEvent::Ack { seq } => Packet::new(MSG_ACK, &[seq]),
        }
    }
}
