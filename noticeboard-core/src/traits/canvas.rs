//! Canvas trait for zone drawing

use crate::render::{Frame, Zone, ZoneContent};

/// Errors that can occur while drawing a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanvasError {
    /// Output link rejected or dropped the draw
    Communication,
    /// Draw queue is full; retry next cycle
    Busy,
    /// Zone geometry does not fit the display
    OutOfBounds,
}

/// Drawing surface
///
/// Called once per dirty zone per scheduler tick. Implementations clear
/// the zone's region and draw `content` from the read-only `frame`.
pub trait Canvas {
    fn draw(&mut self, zone: Zone, content: ZoneContent, frame: &Frame<'_>)
        -> Result<(), CanvasError>;
}
