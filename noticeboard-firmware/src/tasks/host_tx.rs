//! Host bridge transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::HOST_TX;

#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx) {
    info!("Host TX task started");

    loop {
        let packet = HOST_TX.receive().await;
        match tx.write_all(&packet.to_bytes()).await {
            Ok(()) => trace!("Host reply 0x{:02x} sent", packet.kind),
            Err(e) => warn!("Failed to send host reply: {:?}", e),
        }
    }
}
