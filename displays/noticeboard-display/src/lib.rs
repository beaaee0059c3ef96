//! Character-terminal rendering for Noticeboard
//!
//! This crate provides:
//! - `DisplayBackend` trait for text-mode surfaces (the UART terminal, an
//!   in-memory grid)
//! - `Screen`, a character grid implementing `DisplayBackend`
//! - `ZoneCanvas`, the core `Canvas` for a 40x14 character terminal
//!
//! # Layout
//!
//! ```text
//! row 0      title (cols 0..20)          clock (cols 21..40)
//! row 1      disc + now-playing ticker, or PC telemetry
//! row 2      rule
//! rows 3..14 body: notifications, reminders or the calendar
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod canvas;
pub mod layout;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use canvas::ZoneCanvas;
pub use screen::Screen;
