//! Top-level aggregate
//!
//! [`Noticeboard`] owns the system state and every producer. The control
//! loop feeds it commands, polls it on each timer tick and lets it render;
//! nothing else holds a reference into the state.

use heapless::Vec;

use crate::command::{Command, Reply};
use crate::config::DeviceConfig;
use crate::engine::{
    add_notification, clear_notifications, set_gaming_mode, update_pc_stats, ReminderEngine,
    TickOutcome, TickerEngine,
};
use crate::entity::{Reminder, MAX_NOTIFICATIONS, MAX_REMINDERS};
use crate::error::Error;
use crate::render::{RenderReport, RenderScheduler};
use crate::state::SystemState;
use crate::storage::LoadReport;
use crate::traits::{Canvas, Clock, FixedAdvance, Indicator, Store};

/// The status display application
pub struct Noticeboard<const N: usize = MAX_NOTIFICATIONS, const M: usize = MAX_REMINDERS> {
    config: DeviceConfig,
    state: SystemState<N, M>,
    reminders: ReminderEngine,
    ticker: TickerEngine,
    scheduler: RenderScheduler,
    metrics: FixedAdvance,
}

impl<const N: usize, const M: usize> Noticeboard<N, M> {
    pub fn new(config: DeviceConfig) -> Self {
        let config = config.sanitized();
        Self {
            state: SystemState::new(config.layout),
            reminders: ReminderEngine::from_config(&config),
            ticker: TickerEngine::from_config(&config),
            scheduler: RenderScheduler::from_config(&config),
            metrics: FixedAdvance::new(config.ticker.char_advance_px),
            config,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Read-only view of the state
    pub fn state(&self) -> &SystemState<N, M> {
        &self.state
    }

    /// True while a reminder mutation has not reached the store
    pub fn has_unsaved_reminders(&self) -> bool {
        self.reminders.is_unsaved()
    }

    /// Restore persisted reminders
    pub fn load<S: Store>(&mut self, store: &mut S) -> Result<LoadReport, Error> {
        self.reminders.load(&mut self.state, store)
    }

    /// Apply one command
    pub fn handle<S: Store, K: Clock>(
        &mut self,
        command: Command,
        store: &mut S,
        clock: &K,
    ) -> Reply<M> {
        let now_ms = clock.now_millis();
        match command {
            Command::AddNotification(notification) => {
                add_notification(&mut self.state, notification);
                Reply::Ok
            }
            Command::ClearNotifications => {
                clear_notifications(&mut self.state);
                Reply::Ok
            }
            Command::AddReminder {
                message,
                due_at,
                repeat_minutes,
                priority,
            } => match self.reminders.add(
                &mut self.state,
                store,
                message,
                due_at,
                repeat_minutes,
                priority,
            ) {
                Ok(id) => Reply::ReminderAdded(id),
                Err(e) => Reply::Error(e),
            },
            Command::CompleteReminder { id } => {
                let now = clock.wall_clock().unwrap_or(0);
                self.reminders
                    .complete(&mut self.state, store, id, now)
                    .into()
            }
            Command::ListReminders => Reply::Reminders(self.list_reminders()),
            Command::ClearReminders => {
                self.reminders.clear(&mut self.state, store);
                Reply::Ok
            }
            Command::SetNowPlaying { song, artist } => {
                self.ticker.set_now_playing(
                    &mut self.state.ticker,
                    &mut self.state.dirty,
                    &song,
                    &artist,
                    &self.metrics,
                    now_ms,
                );
                Reply::Ok
            }
            Command::ClearNowPlaying => {
                self.ticker
                    .clear_now_playing(&mut self.state.ticker, &mut self.state.dirty);
                Reply::Ok
            }
            Command::SwitchScreen(mode) => {
                self.state.switch_screen(mode);
                Reply::Ok
            }
            Command::PageCalendar(delta) => {
                self.state.page_calendar(delta);
                Reply::Ok
            }
            Command::SetGamingMode(enabled) => {
                set_gaming_mode(&mut self.state, enabled);
                Reply::Ok
            }
            Command::UpdatePcStats(stats) => {
                update_pc_stats(&mut self.state, stats);
                Reply::Ok
            }
        }
    }

    /// Snapshot of active reminders in display order
    pub fn list_reminders(&self) -> Vec<Reminder, M> {
        self.state
            .reminders
            .active()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Run the time-driven producers
    pub fn poll<S: Store, K: Clock>(&mut self, store: &mut S, clock: &K) -> TickOutcome {
        let now_ms = clock.now_millis();
        let outcome = self
            .reminders
            .tick(&mut self.state, store, clock.wall_clock(), now_ms);
        self.ticker
            .tick(&mut self.state.ticker, &mut self.state.dirty, now_ms);
        outcome
    }

    /// Draw every dirty zone
    pub fn render<C: Canvas, K: Clock>(&mut self, canvas: &mut C, clock: &K) -> RenderReport {
        self.scheduler
            .tick(&mut self.state, canvas, clock.wall_clock())
    }

    /// Treat the display as blank: every zone is redrawn on the next render
    pub fn redraw_all(&mut self) {
        self.state.dirty.mark_all_dirty();
        self.scheduler.invalidate();
    }

    /// Forward queued indicator requests, returning how many were sent
    pub fn drain_indications<I: Indicator>(&mut self, indicator: &mut I) -> usize {
        let mut sent = 0;
        while let Some(indication) = self.state.next_indication() {
            indicator.apply(indication);
            sent += 1;
        }
        sent
    }
}

impl<const N: usize, const M: usize> Default for Noticeboard<N, M> {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}
