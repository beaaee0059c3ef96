//! Reminder lifecycle and the shared system state
//!
//! The reminder lifecycle is a pure function of the current phase and an
//! event. Everything the producers mutate and the renderer reads lives in
//! one [`SystemState`] aggregate.

mod events;
mod machine;
mod system;

pub use events::ReminderEvent;
pub use machine::ReminderPhase;
pub use system::{CalendarView, Indication, ScreenMode, SystemState, Telemetry, MAX_INDICATIONS};
