//! Zone-based incremental rendering
//!
//! Producers mark zones dirty; the [`RenderScheduler`] drains them once per
//! cycle and hands each one to a [`crate::traits::Canvas`].

pub mod clock;
pub mod content;
pub mod frame;
pub mod scheduler;
pub mod zone;

pub use clock::ClockFace;
pub use content::{
    body_content, body_rows, header_content, partition, ClockUpdate, ZoneContent,
    CALENDAR_ROWS, NOTIFICATION_SLOTS, REMINDER_ROWS,
};
pub use frame::Frame;
pub use scheduler::{RenderReport, RenderScheduler};
pub use zone::{DirtyTracker, Zone};
