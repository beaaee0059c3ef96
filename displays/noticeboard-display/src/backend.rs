//! Display backend trait
//!
//! Text-mode drawing surface addressed in character cells.

use noticeboard_core::traits::CanvasError;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Link to the display failed
    Communication,
    /// Row or column outside the display
    InvalidCoordinates,
    /// Display has not answered yet
    NotReady,
    /// Outgoing queue is full
    BufferOverflow,
}

impl From<DisplayError> for CanvasError {
    fn from(e: DisplayError) -> Self {
        match e {
            DisplayError::Communication => CanvasError::Communication,
            DisplayError::InvalidCoordinates => CanvasError::OutOfBounds,
            DisplayError::NotReady | DisplayError::BufferOverflow => CanvasError::Busy,
        }
    }
}

/// Character display surface
///
/// Columns are counted in characters, not bytes. Text running past the
/// right edge is clipped by the backend.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Blank `count` rows starting at `first`, dropping any inversion
    fn clear_rows(&mut self, first: u8, count: u8) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Invert cells `start_col..end_col` on `row`
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Horizontal rule across cells `start_col..end_col` on `row`
    fn hline(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Push buffered drawing to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            CanvasError::from(DisplayError::Communication),
            CanvasError::Communication
        );
        assert_eq!(
            CanvasError::from(DisplayError::InvalidCoordinates),
            CanvasError::OutOfBounds
        );
        assert_eq!(CanvasError::from(DisplayError::BufferOverflow), CanvasError::Busy);
        assert_eq!(CanvasError::from(DisplayError::NotReady), CanvasError::Busy);
    }
}
