//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod controller;
pub mod host_rx;
pub mod host_tx;
pub mod led;
pub mod storage;
pub mod terminal_rx;
pub mod terminal_tx;
pub mod tick;

pub use button::button_task;
pub use controller::controller_task;
pub use host_rx::host_rx_task;
pub use host_tx::host_tx_task;
pub use led::{led_task, RgbLed};
pub use storage::storage_task;
pub use terminal_rx::terminal_rx_task;
pub use terminal_tx::terminal_tx_task;
pub use tick::tick_task;
