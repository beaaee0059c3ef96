//! Noticeboard UART protocols
//!
//! Two links share one packet format:
//!
//! - the display terminal, a character screen with a rotary knob that
//!   draws what it is told and reports input
//! - the host bridge, which forwards form-style requests from the PC or
//!   Wi-Fi companion and receives replies
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod host;
pub mod input;
pub mod packet;
pub mod parse;
pub mod terminal;

pub use host::{HostReply, HostRequest, RequestError, StatsUpdate};
pub use input::InputEvent;
pub use packet::{FrameError, Packet, PacketParser, PayloadReader, PayloadWriter, START_BYTE};
pub use parse::{extract_sender, parse_datetime, ScheduleError};
pub use terminal::{TerminalEvent, TerminalMessage, TERMINAL_COLS, TERMINAL_ROWS};
