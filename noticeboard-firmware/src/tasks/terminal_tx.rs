//! Display terminal transmit task
//!
//! Writes queued draw messages and answers heartbeats.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use noticeboard_protocol::{Packet, TerminalMessage};

use crate::channels::{HEARTBEAT_RECEIVED, TERMINAL_TX};

#[embassy_executor::task]
pub async fn terminal_tx_task(mut tx: BufferedUartTx) {
    info!("Terminal TX task started");

    loop {
        match select(TERMINAL_TX.receive(), HEARTBEAT_RECEIVED.wait()).await {
            Either::First(packet) => {
                if let Err(e) = write_packet(&mut tx, &packet).await {
                    warn!("Failed to send terminal message: {:?}", e);
                }
            }
            Either::Second(()) => match TerminalMessage::Pong.encode() {
                Ok(pong) => match write_packet(&mut tx, &pong).await {
                    Ok(()) => trace!("PONG sent"),
                    Err(e) => warn!("Failed to send PONG: {:?}", e),
                },
                Err(e) => warn!("PONG encode failed: {:?}", e),
            },
        }
    }
}

async fn write_packet(
    tx: &mut BufferedUartTx,
    packet: &Packet,
) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(&packet.to_bytes()).await
}
