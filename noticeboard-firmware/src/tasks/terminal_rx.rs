//! Display terminal receive task
//!
//! Decodes input and heartbeats from the terminal and tracks whether it
//! is attached.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Read;
use portable_atomic::Ordering;

use noticeboard_protocol::{PacketParser, TerminalEvent};

use crate::channels::{ControlEvent, CONTROL, HEARTBEAT_RECEIVED, TERMINAL_READY};

const RX_BUF_SIZE: usize = 64;

/// The terminal pings every second; three missed pings mean it is gone
const PRESENCE_TIMEOUT: Duration = Duration::from_secs(3);

#[embassy_executor::task]
pub async fn terminal_rx_task(mut rx: BufferedUartRx) {
    info!("Terminal RX task started");

    let mut parser = PacketParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match with_timeout(PRESENCE_TIMEOUT, rx.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                warn!("Terminal UART read error: {:?}", e);
                continue;
            }
            Err(_) => {
                if TERMINAL_READY.swap(false, Ordering::AcqRel) {
                    warn!("Terminal silent, pausing drawing");
                }
                parser.reset();
                continue;
            }
        };

        trace!("Terminal RX: {} bytes", n);

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(packet)) => match TerminalEvent::decode(&packet) {
                    Ok(event) => handle_event(event),
                    Err(e) => warn!("Bad terminal message: {:?}", e),
                },
                Ok(None) => {}
                Err(e) => warn!("Terminal frame error: {:?}", e),
            }
        }
    }
}

fn handle_event(event: TerminalEvent) {
    match event {
        TerminalEvent::Ping => {
            trace!("PING received");
            HEARTBEAT_RECEIVED.signal(());
            if !TERMINAL_READY.swap(true, Ordering::AcqRel) {
                info!("Terminal attached");
                if CONTROL.try_send(ControlEvent::TerminalAttached).is_err() {
                    warn!("Control channel full, dropping attach");
                }
            }
        }
        TerminalEvent::Input(input) => {
            debug!("Input event: {:?}", input);
            if CONTROL.try_send(ControlEvent::Input(input)).is_err() {
                warn!("Control channel full, dropping input");
            }
        }
        TerminalEvent::Ack { seq } => {
            trace!("ACK {} received", seq);
        }
    }
}
