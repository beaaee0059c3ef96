//! Board-agnostic core logic for the status display firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (canvas, store, clock, indicator, text metrics)
//! - Notification ring and reminder table entities
//! - Reminder lifecycle state machine and engine
//! - Now-playing ticker and disc animation
//! - Zone dirty tracking and the incremental render scheduler
//! - Reminder record persistence format
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod app;
pub mod command;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod render;
pub mod state;
pub mod storage;
pub mod time;
pub mod traits;

pub use app::Noticeboard;
pub use error::Error;
