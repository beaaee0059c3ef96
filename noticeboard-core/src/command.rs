//! Commands accepted by the core
//!
//! Transport parses and truncates raw input into these; each variant maps
//! to exactly one core entry point.

use heapless::{String, Vec};

use crate::entity::text::{ARTIST_LEN, REMINDER_LEN, SONG_LEN};
use crate::entity::{Notification, Priority, Reminder, ReminderId, MAX_REMINDERS};
use crate::error::Error;
use crate::state::{ScreenMode, Telemetry};
use crate::time::EpochSecs;

/// A parsed request for the core
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    AddNotification(Notification),
    ClearNotifications,
    AddReminder {
        message: String<REMINDER_LEN>,
        due_at: Option<EpochSecs>,
        repeat_minutes: u32,
        priority: Priority,
    },
    CompleteReminder {
        id: ReminderId,
    },
    /// Active reminders in display order
    ListReminders,
    /// Free every reminder slot
    ClearReminders,
    SetNowPlaying {
        song: String<SONG_LEN>,
        artist: String<ARTIST_LEN>,
    },
    ClearNowPlaying,
    SwitchScreen(ScreenMode),
    /// Move the calendar by this many months
    PageCalendar(i8),
    SetGamingMode(bool),
    UpdatePcStats(Telemetry),
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddNotification(_) => "add_notification",
            Command::ClearNotifications => "clear_notifications",
            Command::AddReminder { .. } => "add_reminder",
            Command::CompleteReminder { .. } => "complete_reminder",
            Command::ListReminders => "list_reminders",
            Command::ClearReminders => "clear_reminders",
            Command::SetNowPlaying { .. } => "set_now_playing",
            Command::ClearNowPlaying => "clear_now_playing",
            Command::SwitchScreen(_) => "switch_screen",
            Command::PageCalendar(_) => "page_calendar",
            Command::SetGamingMode(_) => "set_gaming_mode",
            Command::UpdatePcStats(_) => "update_pc_stats",
        }
    }
}

/// Result of handling a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply<const M: usize = MAX_REMINDERS> {
    Ok,
    ReminderAdded(ReminderId),
    Reminders(Vec<Reminder, M>),
    Error(Error),
}

impl<const M: usize> Reply<M> {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Reply::Error(_))
    }
}

impl<const M: usize> From<Result<(), Error>> for Reply<M> {
    fn from(result: Result<(), Error>) -> Self {
        match result {
            Ok(()) => Reply::Ok,
            Err(e) => Reply::Error(e),
        }
    }
}
