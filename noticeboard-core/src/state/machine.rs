//! Reminder phase machine
//!
//! Field updates for each transition live on [`crate::entity::Reminder`];
//! this only decides which transitions exist.

use super::events::ReminderEvent;

/// Reminder lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReminderPhase {
    /// Waiting for the due time
    Idle,
    /// Due time passed; follow-ups fire on the repeat interval
    Triggered,
    /// Done; nothing fires again
    Completed,
}

impl ReminderPhase {
    /// Check whether the reminder should be shown in the active list
    pub fn is_active(&self) -> bool {
        !matches!(self, ReminderPhase::Completed)
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: ReminderEvent) -> Self {
        use ReminderEvent::*;
        use ReminderPhase::*;

        match (self, event) {
            (Idle, Due) => Triggered,
            (Triggered, ReviewDue) => Triggered,
            (Idle, Complete) | (Triggered, Complete) | (Completed, Complete) => Completed,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_to_triggered() {
        assert_eq!(
            ReminderPhase::Idle.transition(ReminderEvent::Due),
            ReminderPhase::Triggered
        );
    }

    #[test]
    fn test_complete_from_any_phase() {
        for phase in [
            ReminderPhase::Idle,
            ReminderPhase::Triggered,
            ReminderPhase::Completed,
        ] {
            assert_eq!(
                phase.transition(ReminderEvent::Complete),
                ReminderPhase::Completed
            );
        }
    }

    #[test]
    fn test_completed_is_terminal() {
        let done = ReminderPhase::Completed;
        assert_eq!(done.transition(ReminderEvent::Due), done);
        assert_eq!(done.transition(ReminderEvent::ReviewDue), done);
        assert!(!done.is_active());
    }

    #[test]
    fn test_review_only_when_triggered() {
        assert_eq!(
            ReminderPhase::Idle.transition(ReminderEvent::ReviewDue),
            ReminderPhase::Idle
        );
        assert_eq!(
            ReminderPhase::Triggered.transition(ReminderEvent::Due),
            ReminderPhase::Triggered
        );
    }
}
