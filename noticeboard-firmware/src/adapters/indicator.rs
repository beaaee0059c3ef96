//! Status LED indicator
//!
//! Forwards requests to the LED task, which runs blink patterns without
//! holding up the controller.

use defmt::*;

use noticeboard_core::state::Indication;
use noticeboard_core::traits::Indicator;

use crate::channels::INDICATIONS;

#[derive(Debug, Default)]
pub struct LedIndicator;

impl Indicator for LedIndicator {
    fn apply(&mut self, indication: Indication) {
        if INDICATIONS.try_send(indication).is_err() {
            warn!("Indication channel full, dropping {:?}", indication);
        }
    }
}
