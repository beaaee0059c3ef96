//! Reminder table
//!
//! A fixed arena of tagged slots. Ids come from a counter that starts at 1
//! and only ever moves forward, so a freed slot never hands an old id back
//! out. Completed reminders keep their slot until the table is cleared.

use heapless::{String, Vec};

use super::notification::Priority;
use super::text::REMINDER_LEN;
use crate::error::Error;
use crate::state::{ReminderEvent, ReminderPhase};
use crate::time::EpochSecs;

/// Default table capacity
pub const MAX_REMINDERS: usize = 10;

/// Largest id accepted from persisted records
pub const MAX_REMINDER_ID: u32 = 100_000;

/// Reminder identifier, never zero for an occupied slot
pub type ReminderId = u32;

/// A scheduled reminder
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reminder {
    pub id: ReminderId,
    pub message: String<REMINDER_LEN>,
    pub due_at: Option<EpochSecs>,
    /// Follow-up interval; 0 means remind once
    pub repeat_minutes: u32,
    pub completed: bool,
    pub priority: Priority,
    pub triggered: bool,
    pub next_review_at: Option<EpochSecs>,
    pub review_count: u32,
}

impl Reminder {
    /// New reminder in the idle phase
    pub fn new(
        id: ReminderId,
        message: String<REMINDER_LEN>,
        due_at: Option<EpochSecs>,
        repeat_minutes: u32,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            message,
            due_at,
            repeat_minutes,
            completed: false,
            priority,
            triggered: false,
            next_review_at: None,
            review_count: 0,
        }
    }

    /// Lifecycle phase derived from the flags
    pub fn phase(&self) -> ReminderPhase {
        if self.completed {
            ReminderPhase::Completed
        } else if self.triggered {
            ReminderPhase::Triggered
        } else {
            ReminderPhase::Idle
        }
    }

    /// Follow-up interval in seconds
    pub fn repeat_secs(&self) -> i64 {
        i64::from(self.repeat_minutes) * 60
    }

    /// Time the reminder next wants attention
    pub fn effective_due(&self) -> Option<EpochSecs> {
        self.next_review_at.or(self.due_at)
    }

    /// The event this reminder is ready for at `now`, if any
    pub fn pending_event(&self, now: EpochSecs) -> Option<ReminderEvent> {
        match self.phase() {
            ReminderPhase::Idle => match self.due_at {
                Some(due) if now >= due => Some(ReminderEvent::Due),
                _ => None,
            },
            ReminderPhase::Triggered => match self.next_review_at {
                Some(next) if self.repeat_minutes > 0 && now >= next => {
                    Some(ReminderEvent::ReviewDue)
                }
                _ => None,
            },
            ReminderPhase::Completed => None,
        }
    }

    /// Apply a lifecycle event at `now`
    ///
    /// Returns false and leaves the reminder untouched when the current
    /// phase does not accept the event.
    pub fn apply(&mut self, event: ReminderEvent, now: EpochSecs) -> bool {
        let from = self.phase();
        let to = from.transition(event);
        match (from, event, to) {
            (ReminderPhase::Idle, ReminderEvent::Due, ReminderPhase::Triggered) => {
                self.triggered = true;
                self.review_count = 0;
                self.next_review_at = match (self.due_at, self.repeat_minutes) {
                    (Some(due), r) if r > 0 => Some(due.saturating_add(self.repeat_secs())),
                    _ => None,
                };
                true
            }
            (ReminderPhase::Triggered, ReminderEvent::ReviewDue, ReminderPhase::Triggered) => {
                self.review_count = self.review_count.saturating_add(1);
                self.next_review_at = Some(now.saturating_add(self.repeat_secs()));
                true
            }
            (_, ReminderEvent::Complete, ReminderPhase::Completed) => {
                self.completed = true;
                self.triggered = false;
                self.next_review_at = None;
                self.review_count = 0;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-capacity reminder arena
#[derive(Debug, Clone)]
pub struct ReminderTable<const M: usize = MAX_REMINDERS> {
    slots: [Option<Reminder>; M],
    next_id: ReminderId,
}

impl<const M: usize> Default for ReminderTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> ReminderTable<M> {
    /// Create an empty table with the id counter at 1
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            next_id: 1,
        }
    }

    /// Rebuild a table from loaded slots
    ///
    /// The counter is raised above every occupied id so loaded ids are
    /// never reissued.
    pub fn from_parts(slots: [Option<Reminder>; M], next_id: ReminderId) -> Self {
        let max_id = slots.iter().flatten().map(|r| r.id).max().unwrap_or(0);
        Self {
            slots,
            next_id: next_id.max(max_id.saturating_add(1)).max(1),
        }
    }

    /// Allocate an id and store a new idle reminder
    ///
    /// On `CapacityExceeded` neither the table nor the counter changes.
    pub fn insert(
        &mut self,
        message: String<REMINDER_LEN>,
        due_at: Option<EpochSecs>,
        repeat_minutes: u32,
        priority: Priority,
    ) -> Result<ReminderId, Error> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::CapacityExceeded)?;

        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        *slot = Some(Reminder::new(id, message, due_at, repeat_minutes, priority));
        Ok(id)
    }

    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.slots.iter().flatten().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: ReminderId) -> Option<&mut Reminder> {
        self.slots.iter_mut().flatten().find(|r| r.id == id)
    }

    /// Free every slot; the id counter is kept
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Raw slots in table order
    pub fn slots(&self) -> &[Option<Reminder>] {
        &self.slots
    }

    /// Occupied slots in table order
    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Reminder> {
        self.slots.iter_mut().flatten()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub const fn capacity(&self) -> usize {
        M
    }

    /// Id the next insert will receive
    pub fn next_id(&self) -> ReminderId {
        self.next_id
    }

    /// Active reminders in display order
    ///
    /// Completed reminders are excluded. Triggered reminders come first,
    /// then ascending effective due time (next review if set, otherwise the
    /// due time), reminders without a due time last, table order breaking
    /// ties.
    pub fn active(&self) -> Vec<&Reminder, M> {
        let mut indexed: Vec<(usize, &Reminder), M> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|r| (i, r)))
            .filter(|(_, r)| r.phase().is_active())
            .collect();

        // The index makes every key unique, so an unstable sort is stable
        indexed.sort_unstable_by_key(|(i, r)| {
            let due = r.effective_due();
            (!r.triggered, due.is_none(), due.unwrap_or(0), *i)
        });

        indexed.into_iter().map(|(_, r)| r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::text::bounded;

    const T: EpochSecs = 1_800_000_000;

    fn msg(s: &str) -> String<REMINDER_LEN> {
        bounded(s, REMINDER_LEN)
    }

    #[test]
    fn test_ids_start_at_one() {
        let mut table: ReminderTable<4> = ReminderTable::new();
        assert_eq!(table.insert(msg("a"), None, 0, Priority::Normal), Ok(1));
        assert_eq!(table.insert(msg("b"), None, 0, Priority::Normal), Ok(2));
    }

    #[test]
    fn test_capacity_exceeded_leaves_table_unchanged() {
        let mut table: ReminderTable<2> = ReminderTable::new();
        table.insert(msg("a"), Some(T), 0, Priority::Normal).unwrap();
        table.insert(msg("b"), Some(T), 0, Priority::Normal).unwrap();
        let before = table.clone();

        let result = table.insert(msg("c"), Some(T), 0, Priority::Normal);
        assert_eq!(result, Err(Error::CapacityExceeded));
        assert_eq!(table.slots(), before.slots());
        assert_eq!(table.next_id(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut table: ReminderTable<2> = ReminderTable::new();
        table.insert(msg("a"), None, 0, Priority::Normal).unwrap();
        table.clear();
        assert_eq!(table.insert(msg("b"), None, 0, Priority::Normal), Ok(2));
    }

    #[test]
    fn test_trigger_sets_review_from_due() {
        let mut r = Reminder::new(1, msg("x"), Some(T), 5, Priority::Normal);
        assert_eq!(r.pending_event(T - 1), None);
        assert_eq!(r.pending_event(T), Some(ReminderEvent::Due));
        assert!(r.apply(ReminderEvent::Due, T + 3));
        assert!(r.triggered);
        assert_eq!(r.next_review_at, Some(T + 300));
        assert_eq!(r.review_count, 0);
    }

    #[test]
    fn test_review_advances_from_now() {
        let mut r = Reminder::new(1, msg("x"), Some(T), 5, Priority::Normal);
        r.apply(ReminderEvent::Due, T);
        assert_eq!(r.pending_event(T + 300), Some(ReminderEvent::ReviewDue));
        assert!(r.apply(ReminderEvent::ReviewDue, T + 300));
        assert_eq!(r.review_count, 1);
        assert_eq!(r.next_review_at, Some(T + 600));
    }

    #[test]
    fn test_no_repeat_never_reviews() {
        let mut r = Reminder::new(1, msg("x"), Some(T), 0, Priority::Normal);
        r.apply(ReminderEvent::Due, T);
        assert_eq!(r.next_review_at, None);
        assert_eq!(r.pending_event(T + 100_000), None);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut r = Reminder::new(1, msg("x"), Some(T), 5, Priority::Normal);
        r.apply(ReminderEvent::Due, T);
        assert!(r.apply(ReminderEvent::Complete, T + 10));
        assert!(r.completed && !r.triggered);
        assert_eq!(r.next_review_at, None);
        assert!(!r.apply(ReminderEvent::Due, T + 20));
        assert_eq!(r.pending_event(T + 1000), None);
    }

    #[test]
    fn test_active_order() {
        let mut table: ReminderTable<5> = ReminderTable::new();
        let a = table.insert(msg("a"), Some(T + 100), 0, Priority::Normal).unwrap();
        let b = table.insert(msg("b"), Some(T + 50), 0, Priority::Normal).unwrap();
        let c = table.insert(msg("c"), None, 0, Priority::Normal).unwrap();
        let d = table.insert(msg("d"), Some(T + 10), 0, Priority::Normal).unwrap();
        table.get_mut(a).unwrap().apply(ReminderEvent::Due, T + 100);
        table.get_mut(d).unwrap().apply(ReminderEvent::Complete, T);

        let order: Vec<ReminderId, 5> = table.active().iter().map(|r| r.id).collect();
        assert_eq!(order.as_slice(), &[a, b, c]);
    }

    #[test]
    fn test_from_parts_raises_counter() {
        let mut slots: [Option<Reminder>; 3] = Default::default();
        slots[1] = Some(Reminder::new(7, msg("x"), None, 0, Priority::Normal));
        let table = ReminderTable::from_parts(slots, 2);
        assert_eq!(table.next_id(), 8);
    }
}
