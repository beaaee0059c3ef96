//! Read-only view handed to the canvas

use chrono::NaiveDate;

use crate::config::ContentLayout;
use crate::engine::ticker::TickerState;
use crate::entity::{Notification, Reminder};
use crate::state::{ScreenMode, Telemetry};
use crate::time::{EpochSecs, LocalTime};

/// Snapshot of everything a zone renderer may read
///
/// Built once per scheduler tick; the canvas never calls back into the
/// core.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub screen: ScreenMode,
    pub layout: ContentLayout,
    /// Ring slots, newest first, empty slots included
    pub notifications: &'a [Notification],
    /// Active reminders in display order
    pub reminders: &'a [&'a Reminder],
    pub ticker: &'a TickerState,
    pub telemetry: &'a Telemetry,
    /// Wall clock, `None` until synchronised
    pub now: Option<EpochSecs>,
    /// Local breakdown of `now`
    pub local: Option<LocalTime>,
    /// Formatted clock, empty until synchronised
    pub clock_text: &'a str,
    /// First day of the month shown by the calendar
    pub calendar_month: Option<NaiveDate>,
}

impl<'a> Frame<'a> {
    /// Notification slot `index`, skipping empty slots
    pub fn notification(&self, index: usize) -> Option<&'a Notification> {
        self.notifications.get(index).filter(|n| !n.is_empty())
    }

    /// Active reminder at display row `index`
    pub fn reminder(&self, index: usize) -> Option<&'a Reminder> {
        self.reminders.get(index).copied()
    }

    /// Seconds until a reminder's effective due time, negative when overdue
    pub fn seconds_until(&self, reminder: &Reminder) -> Option<i64> {
        let now = self.now?;
        reminder.effective_due().map(|due| due.saturating_sub(now))
    }
}
