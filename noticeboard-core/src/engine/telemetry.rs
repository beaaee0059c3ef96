//! Host telemetry intake
//!
//! Telemetry only ever changes the Status zone.

use crate::render::Zone;
use crate::state::{SystemState, Telemetry};

/// Switch the status line between the ticker and host telemetry
pub fn set_gaming_mode<const N: usize, const M: usize>(
    state: &mut SystemState<N, M>,
    enabled: bool,
) {
    if state.telemetry.gaming_mode != enabled {
        state.telemetry.gaming_mode = enabled;
        state.dirty.mark_dirty(Zone::Status);
    }
}

/// Replace the host figures, keeping the current gaming mode
pub fn update_pc_stats<const N: usize, const M: usize>(
    state: &mut SystemState<N, M>,
    stats: Telemetry,
) {
    let stats = Telemetry {
        gaming_mode: state.telemetry.gaming_mode,
        ..stats
    };
    if state.telemetry != stats {
        state.telemetry = stats;
        state.dirty.mark_dirty(Zone::Status);
    }
}
