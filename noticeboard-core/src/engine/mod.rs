//! Producers that mutate [`crate::state::SystemState`]
//!
//! Each producer only changes its own slice of the state and marks the
//! zones that now show something different.

pub mod intake;
pub mod reminders;
pub mod telemetry;
pub mod ticker;

pub use intake::{add_notification, clear_notifications, NOTIFY_BLINK};
pub use reminders::{ReminderEngine, TickOutcome, REVIEW_BLINK, TRIGGER_BLINK};
pub use telemetry::{set_gaming_mode, update_pc_stats};
pub use ticker::{TickerEngine, TickerState, ARTIST_SEPARATOR, TICKER_GAP, TICKER_TEXT_LEN};
