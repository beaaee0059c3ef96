//! Noticeboard Hardware Abstraction Layer
//!
//! Board-independent traits implemented by chip-specific crates.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  noticeboard-firmware                    │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  noticeboard-hal (this crate - traits)   │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  noticeboard-hal-rp2040                  │
//! └──────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
