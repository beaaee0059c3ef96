//! Attention indicator trait

use crate::state::Indication;

/// Attention indicator (status LED or similar)
///
/// Implementations must not block; blink patterns run asynchronously.
pub trait Indicator {
    fn apply(&mut self, indication: Indication);
}
