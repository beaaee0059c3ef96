//! Clock partial-update cache
//!
//! Remembers the last clock text drawn so the next redraw can be limited
//! to the cells that changed. The cache is only committed after a
//! successful draw.

use heapless::String;

use crate::config::ClockPolicy;
use crate::time::CLOCK_TEXT_LEN;

use super::content::ClockUpdate;

#[derive(Debug, Clone, Default)]
pub struct ClockFace {
    previous: Option<String<CLOCK_TEXT_LEN>>,
}

impl ClockFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last drawn text; the next update is a full redraw
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check whether `text` differs from what is on screen
    pub fn is_stale(&self, text: &str) -> bool {
        self.previous.as_deref() != Some(text)
    }

    /// Work out how to draw `text` under `policy`
    ///
    /// Returns `None` when nothing on screen would change.
    pub fn plan(&self, text: &str, policy: ClockPolicy) -> Option<ClockUpdate> {
        let previous = match &self.previous {
            Some(p) => p.as_str(),
            None => return Some(ClockUpdate::Full),
        };

        if previous.len() != text.len() {
            return Some(ClockUpdate::Full);
        }

        let mask = previous
            .bytes()
            .zip(text.bytes())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .fold(0u32, |mask, (i, _)| if i < 32 { mask | (1 << i) } else { mask });

        match (mask, policy) {
            (0, _) => None,
            (_, ClockPolicy::CellDiff) => Some(ClockUpdate::Cells(mask)),
            (_, ClockPolicy::WholeString) => Some(ClockUpdate::Full),
        }
    }

    /// Record `text` as what is now on screen
    pub fn commit(&mut self, text: &str) {
        let mut s = String::new();
        let _ = s.push_str(text);
        self.previous = Some(s);
    }
}
