//! Board time source
//!
//! Monotonic time comes from the embassy time driver. The wall clock has
//! no battery backup: it is unknown after boot until the host sends the
//! time, then runs from the monotonic counter.

use embassy_time::Instant;

use noticeboard_core::time::EpochSecs;
use noticeboard_core::traits::Clock;

#[derive(Debug, Clone, Copy)]
struct WallBase {
    epoch: EpochSecs,
    at_ms: u64,
}

#[derive(Debug, Default)]
pub struct BoardClock {
    wall: Option<WallBase>,
}

impl BoardClock {
    pub const fn new() -> Self {
        Self { wall: None }
    }

    /// Anchor the wall clock at `epoch` as of now
    pub fn set_time(&mut self, epoch: EpochSecs) {
        self.wall = Some(WallBase {
            epoch,
            at_ms: self.now_millis(),
        });
    }
}

impl Clock for BoardClock {
    fn now_millis(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn now_epoch(&self) -> Option<EpochSecs> {
        self.wall.map(|base| {
            let elapsed_s = self.now_millis().saturating_sub(base.at_ms) / 1000;
            base.epoch.saturating_add(elapsed_s as EpochSecs)
        })
    }
}
