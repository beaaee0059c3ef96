//! Host bridge receive task
//!
//! Decodes requests from the PC or Wi-Fi companion. Malformed requests are
//! answered here with an error reply; valid ones go to the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use noticeboard_core::config::DeviceConfig;
use noticeboard_protocol::{HostReply, HostRequest, PacketParser, RequestError};

use crate::channels::{ControlEvent, CONTROL, HOST_TX};

const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn host_rx_task(mut rx: BufferedUartRx, config: DeviceConfig) {
    info!("Host RX task started");

    let mut parser = PacketParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Host UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            let request = match parser.feed(byte) {
                Ok(Some(packet)) => HostRequest::decode(&packet, &config),
                Ok(None) => continue,
                Err(e) => Err(RequestError::from(e)),
            };

            match request {
                Ok(request) => {
                    debug!("Host request: {:?}", request);
                    if CONTROL.try_send(ControlEvent::Host(request)).is_err() {
                        warn!("Control channel full, dropping host request");
                    }
                }
                Err(e) => {
                    warn!("Rejected host request: {:?}", e);
                    reject(e);
                }
            }
        }
    }
}

fn reject(error: RequestError) {
    match HostReply::Error(error.code()).encode() {
        Ok(packet) => {
            if HOST_TX.try_send(packet).is_err() {
                warn!("Host reply queue full, dropping error reply");
            }
        }
        Err(e) => warn!("Error reply encode failed: {:?}", e),
    }
}
