//! Board implementations of the core collaborator traits

pub mod clock;
pub mod indicator;
pub mod store;
pub mod terminal;

pub use clock::BoardClock;
pub use indicator::LedIndicator;
pub use store::FlashStore;
pub use terminal::TerminalLink;
