//! Notification ring
//!
//! Fixed-capacity insert-at-head buffer. Index 0 is always the most recent
//! notification; inserting shifts everything down one slot and the oldest
//! entry falls off the end.

use heapless::String;

use super::text::{APP_LEN, NOTIFICATION_LEN, SENDER_LEN};

/// Default ring capacity
pub const MAX_NOTIFICATIONS: usize = 5;

/// Notification urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    High,
    Medium,
    #[default]
    Normal,
}

impl Priority {
    /// Parse a priority name; anything unrecognised is `Normal`
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("high") {
            Priority::High
        } else if name.eq_ignore_ascii_case("medium") {
            Priority::Medium
        } else {
            Priority::Normal
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Normal => "normal",
        }
    }

    /// Wire/storage byte
    pub fn as_u8(self) -> u8 {
        match self {
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Normal => 0,
        }
    }

    /// Inverse of [`Priority::as_u8`]; unknown values are `Normal`
    pub fn from_u8(value: u8) -> Self {
        match value {
            2 => Priority::High,
            1 => Priority::Medium,
            _ => Priority::Normal,
        }
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notification {
    pub app: String<APP_LEN>,
    pub sender: String<SENDER_LEN>,
    pub message: String<NOTIFICATION_LEN>,
    pub priority: Priority,
}

impl Notification {
    /// An empty slot carries an empty message
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Ring of the `N` most recent notifications
#[derive(Debug, Clone)]
pub struct NotificationRing<const N: usize = MAX_NOTIFICATIONS> {
    slots: [Notification; N],
}

impl<const N: usize> Default for NotificationRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NotificationRing<N> {
    /// Create an empty ring
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Notification::default()),
        }
    }

    /// Insert at index 0, evicting the oldest entry
    pub fn push(&mut self, notification: Notification) {
        if N == 0 {
            return;
        }
        self.slots.rotate_right(1);
        self.slots[0] = notification;
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Notification::default();
        }
    }

    /// Slot at `index`, empty slots included
    pub fn get(&self, index: usize) -> Option<&Notification> {
        self.slots.get(index)
    }

    /// All slots, newest first
    pub fn slots(&self) -> &[Notification] {
        &self.slots
    }

    /// Non-empty notifications, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.slots.iter().filter(|n| !n.is_empty())
    }

    /// Number of non-empty slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
