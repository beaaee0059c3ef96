//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Only the controller task touches application state; everything else
//! reaches it through [`CONTROL`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;
use portable_atomic::AtomicBool;

use noticeboard_core::entity::MAX_REMINDERS;
use noticeboard_core::state::Indication;
use noticeboard_core::storage::record_len;
use noticeboard_protocol::{HostRequest, InputEvent, Packet};

pub const CONTROL_CHANNEL_SIZE: usize = 8;
/// Enough for a full-screen redraw
pub const TERMINAL_TX_SIZE: usize = 48;
/// A full reminder listing plus its terminator
pub const HOST_TX_SIZE: usize = MAX_REMINDERS + 2;
pub const INDICATION_CHANNEL_SIZE: usize = 8;

/// Encoded reminder table as written by the controller
pub const RECORD_LEN: usize = record_len(MAX_REMINDERS);
pub type ReminderRecord = Vec<u8, RECORD_LEN>;

/// Everything that can wake the controller besides its tick
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    /// Decoded request from the host bridge
    Host(HostRequest),
    /// Knob or push input from the display terminal
    Input(InputEvent),
    /// Board button that clears notifications
    ClearButton,
    /// Terminal answered a ping after being silent
    TerminalAttached,
}

/// Producer tasks to the controller
pub static CONTROL: Channel<CriticalSectionRawMutex, ControlEvent, CONTROL_CHANNEL_SIZE> =
    Channel::new();

/// Latest reminder record awaiting a flash write
pub static PERSIST: Signal<CriticalSectionRawMutex, ReminderRecord> = Signal::new();

/// Draw packets for the display terminal
pub static TERMINAL_TX: Channel<CriticalSectionRawMutex, Packet, TERMINAL_TX_SIZE> =
    Channel::new();

/// Reply packets for the host bridge
pub static HOST_TX: Channel<CriticalSectionRawMutex, Packet, HOST_TX_SIZE> = Channel::new();

/// Ping from the terminal awaiting a pong
pub static HEARTBEAT_RECEIVED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Indicator requests for the LED task
pub static INDICATIONS: Channel<CriticalSectionRawMutex, Indication, INDICATION_CHANNEL_SIZE> =
    Channel::new();

/// Terminal has pinged within the presence timeout
pub static TERMINAL_READY: AtomicBool = AtomicBool::new(false);
