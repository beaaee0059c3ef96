//! Text measurement

/// Pixel width of rendered text in the ticker font
pub trait TextMetrics {
    fn text_width(&self, text: &str) -> u32;
}

/// Monospace metrics: every character has the same advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAdvance {
    pub advance_px: u16,
}

impl FixedAdvance {
    pub const fn new(advance_px: u16) -> Self {
        Self { advance_px }
    }
}

impl TextMetrics for FixedAdvance {
    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * u32::from(self.advance_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_counts_chars() {
        let metrics = FixedAdvance::new(6);
        assert_eq!(metrics.text_width("abc"), 18);
        assert_eq!(metrics.text_width("é"), 6);
        assert_eq!(metrics.text_width(""), 0);
    }
}
