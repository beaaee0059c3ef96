//! Reminder engine
//!
//! Drives every reminder through its lifecycle on a fixed check cadence,
//! turns transitions into dirty marks and indicator requests, and keeps
//! the persisted record in step with the table.
//!
//! All mutations made during one check are persisted with a single store
//! write. A failed write leaves the engine unsaved and the next check
//! retries it.

use heapless::String;

use crate::config::DeviceConfig;
use crate::entity::text::REMINDER_LEN;
use crate::entity::{Priority, ReminderId};
use crate::error::Error;
use crate::state::{Indication, ReminderEvent, ScreenMode, SystemState};
use crate::storage::{self, LoadReport, MAX_RECORD_LEN};
use crate::time::EpochSecs;
use crate::traits::{Store, StoreError, REMINDERS_KEY};

/// Blink pattern when a reminder first fires
pub const TRIGGER_BLINK: Indication = Indication::Blink {
    times: 3,
    period_ms: 150,
};

/// Blink pattern for a follow-up
pub const REVIEW_BLINK: Indication = Indication::Blink {
    times: 2,
    period_ms: 100,
};

/// What one engine tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// A check ran this tick
    pub checked: bool,
    /// Check skipped because the wall clock is not synchronised
    pub deferred: bool,
    pub triggered: u8,
    pub reviewed: u8,
    /// The record was written this tick
    pub persisted: bool,
    /// The record write failed and will be retried
    pub store_error: Option<StoreError>,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.triggered > 0 || self.reviewed > 0
    }
}

/// Reminder lifecycle driver
#[derive(Debug, Clone)]
pub struct ReminderEngine {
    check_period_ms: u64,
    refresh_period_ms: u64,
    last_check_ms: Option<u64>,
    last_refresh_ms: u64,
    unsaved: bool,
}

impl ReminderEngine {
    pub fn new(check_period_ms: u32, refresh_period_ms: u32) -> Self {
        Self {
            check_period_ms: u64::from(check_period_ms),
            refresh_period_ms: u64::from(refresh_period_ms),
            last_check_ms: None,
            last_refresh_ms: 0,
            unsaved: false,
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(
            config.timing.reminder_check_ms,
            config.timing.reminder_refresh_ms,
        )
    }

    /// True while a mutation has not reached the store
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Restore the table from the store
    ///
    /// Nothing stored yields an empty table. A corrupt record also leaves
    /// the table empty and is reported as `StorageCorrupt`.
    pub fn load<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        store: &mut S,
    ) -> Result<LoadReport, Error> {
        let mut buf = [0u8; MAX_RECORD_LEN];
        let len = match store.get(REMINDERS_KEY, &mut buf) {
            Ok(Some(len)) => len,
            Ok(None) => return Ok(LoadReport::default()),
            Err(_) => return Err(Error::StorageCorrupt),
        };

        let (table, report) = storage::decode::<M>(&buf[..len.min(buf.len())])?;
        state.reminders = table;
        state.dirty.mark_all_content_dirty();
        Ok(report)
    }

    /// Run a check if one is due at `now_ms`
    pub fn tick<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        store: &mut S,
        wall: Option<EpochSecs>,
        now_ms: u64,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(last) = self.last_check_ms {
            if now_ms.saturating_sub(last) < self.check_period_ms {
                return outcome;
            }
        }
        self.last_check_ms = Some(now_ms);
        outcome.checked = true;

        match wall {
            Some(now) => self.check(state, now, &mut outcome),
            None => outcome.deferred = true,
        }

        if wall.is_some()
            && state.screen == ScreenMode::Reminders
            && now_ms.saturating_sub(self.last_refresh_ms) >= self.refresh_period_ms
        {
            self.last_refresh_ms = now_ms;
            state.dirty.mark_all_content_dirty();
        }

        if self.unsaved {
            match self.persist(state, store) {
                Ok(()) => outcome.persisted = true,
                Err(e) => outcome.store_error = Some(e),
            }
        }

        outcome
    }

    fn check<const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        now: EpochSecs,
        outcome: &mut TickOutcome,
    ) {
        for reminder in state.reminders.iter_mut() {
            let Some(event) = reminder.pending_event(now) else {
                continue;
            };
            if !reminder.apply(event, now) {
                continue;
            }
            match event {
                ReminderEvent::Due => outcome.triggered = outcome.triggered.saturating_add(1),
                ReminderEvent::ReviewDue => {
                    outcome.reviewed = outcome.reviewed.saturating_add(1)
                }
                ReminderEvent::Complete => {}
            }
        }

        if outcome.triggered > 0 {
            state.switch_screen(ScreenMode::Reminders);
            state.indicate(TRIGGER_BLINK);
        } else if outcome.reviewed > 0 {
            state.dirty.mark_all_content_dirty();
            state.indicate(REVIEW_BLINK);
        }

        if outcome.changed() {
            self.unsaved = true;
        }
    }

    /// Add an idle reminder and persist the table
    ///
    /// The id is returned even if the write fails; the write is retried on
    /// the next check.
    pub fn add<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        store: &mut S,
        message: String<REMINDER_LEN>,
        due_at: Option<EpochSecs>,
        repeat_minutes: u32,
        priority: Priority,
    ) -> Result<ReminderId, Error> {
        let id = state
            .reminders
            .insert(message, due_at, repeat_minutes, priority)?;
        state.dirty.mark_all_content_dirty();
        self.mark_and_persist(state, store);
        Ok(id)
    }

    /// Mark a reminder done and turn the indicator off
    pub fn complete<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        store: &mut S,
        id: ReminderId,
        now: EpochSecs,
    ) -> Result<(), Error> {
        let reminder = state.reminders.get_mut(id).ok_or(Error::NotFound)?;
        reminder.apply(ReminderEvent::Complete, now);
        state.indicate(Indication::Off);
        state.dirty.mark_all_content_dirty();
        self.mark_and_persist(state, store);
        Ok(())
    }

    /// Free every slot, keeping the id counter
    pub fn clear<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        store: &mut S,
    ) {
        state.reminders.clear();
        state.dirty.mark_all_content_dirty();
        self.mark_and_persist(state, store);
    }

    fn mark_and_persist<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &SystemState<N, M>,
        store: &mut S,
    ) {
        self.unsaved = true;
        // A failure leaves `unsaved` set for the next check
        let _ = self.persist(state, store);
    }

    fn persist<S: Store, const N: usize, const M: usize>(
        &mut self,
        state: &SystemState<N, M>,
        store: &mut S,
    ) -> Result<(), StoreError> {
        let mut buf = [0u8; MAX_RECORD_LEN];
        let len =
            storage::encode(&state.reminders, &mut buf).map_err(|_| StoreError::BufferTooSmall)?;
        store.put(REMINDERS_KEY, &buf[..len])?;
        self.unsaved = false;
        Ok(())
    }
}
