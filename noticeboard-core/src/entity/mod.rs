//! Domain entities
//!
//! Pure data with invariants; no I/O and no dirty-tracking.

pub mod notification;
pub mod reminder;
pub mod text;

pub use notification::{Notification, NotificationRing, Priority, MAX_NOTIFICATIONS};
pub use reminder::{Reminder, ReminderId, ReminderTable, MAX_REMINDERS, MAX_REMINDER_ID};
pub use text::{bounded, Text};
