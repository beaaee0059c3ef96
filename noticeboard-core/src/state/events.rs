//! Reminder lifecycle events

/// Events that drive a reminder between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReminderEvent {
    /// Wall clock reached the due time
    Due,
    /// Wall clock reached the next follow-up time
    ReviewDue,
    /// User or host marked the reminder done
    Complete,
}
