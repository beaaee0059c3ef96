//! Collaborator abstractions
//!
//! These traits define the narrow interfaces between the core and the
//! outside world. Board crates and the display crate implement them.

pub mod canvas;
pub mod clock;
pub mod indicator;
pub mod metrics;
pub mod store;

pub use canvas::{Canvas, CanvasError};
pub use clock::Clock;
pub use indicator::Indicator;
pub use metrics::{FixedAdvance, TextMetrics};
pub use store::{Store, StoreError, REMINDERS_KEY};
