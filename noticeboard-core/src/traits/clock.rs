//! Time source trait

use crate::time::{is_synchronised, EpochSecs};

/// Monotonic and wall-clock time
pub trait Clock {
    /// Milliseconds since boot; never goes backwards
    fn now_millis(&self) -> u64;

    /// Raw wall clock in epoch seconds, `None` if never set
    fn now_epoch(&self) -> Option<EpochSecs>;

    /// Wall clock, `None` until it is past the synchronisation floor
    fn wall_clock(&self) -> Option<EpochSecs> {
        self.now_epoch().filter(|t| is_synchronised(*t))
    }
}
