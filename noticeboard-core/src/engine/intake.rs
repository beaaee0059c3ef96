//! Notification intake

use crate::entity::Notification;
use crate::state::{Indication, ScreenMode, SystemState};

/// Blink pattern for a new notification
pub const NOTIFY_BLINK: Indication = Indication::Blink {
    times: 2,
    period_ms: 100,
};

/// Add a notification at the newest position and bring its screen forward
///
/// The oldest entry falls off the ring when it is full.
pub fn add_notification<const N: usize, const M: usize>(
    state: &mut SystemState<N, M>,
    notification: Notification,
) {
    state.notifications.push(notification);
    state.switch_screen(ScreenMode::Notifications);
    state.indicate(NOTIFY_BLINK);
}

/// Forget every notification
pub fn clear_notifications<const N: usize, const M: usize>(state: &mut SystemState<N, M>) {
    state.notifications.clear();
    state.dirty.mark_all_content_dirty();
    state.indicate(Indication::Off);
}
