//! Noticeboard - Always-on Status Display Firmware
//!
//! Main firmware binary for RP2040 boards driving a character display
//! terminal over UART0 and taking requests from a host bridge on UART1.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use noticeboard_hal::{FlashError, FlashStorage, StorageKey};
use noticeboard_hal_rp2040::flash::Rp2040FlashStorage;

use crate::adapters::FlashStore;
use crate::channels::{ReminderRecord, RECORD_LEN};
use crate::config::ConfigPersistence;

mod adapters;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

const UART_BUF_SIZE: usize = 256;

// UART buffers must live forever
static TERMINAL_TX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();
static TERMINAL_RX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();
static HOST_TX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();
static HOST_RX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Noticeboard firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut persistence = ConfigPersistence::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0));
    let config = persistence.load().await;
    let mut flash = persistence.into_storage();
    let store = FlashStore::new(read_reminder_record(&mut flash).await);

    // Display terminal: GPIO0 TX, GPIO1 RX, 115200 baud
    let terminal_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let terminal_uart = terminal_uart.into_buffered(
        Irqs,
        TERMINAL_TX_BUF.init([0u8; UART_BUF_SIZE]),
        TERMINAL_RX_BUF.init([0u8; UART_BUF_SIZE]),
    );
    let (terminal_tx, terminal_rx) = terminal_uart.split();

    // Host bridge: GPIO4 TX, GPIO5 RX, 115200 baud
    let host_uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, UartConfig::default());
    let host_uart = host_uart.into_buffered(
        Irqs,
        HOST_TX_BUF.init([0u8; UART_BUF_SIZE]),
        HOST_RX_BUF.init([0u8; UART_BUF_SIZE]),
    );
    let (host_tx, host_rx) = host_uart.split();

    info!("UARTs initialized");

    // Clear-notifications button on GPIO15, RGB LED on GPIO18-20
    let button = Input::new(p.PIN_15, Pull::Up);
    let led = tasks::RgbLed::new(
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
        Output::new(p.PIN_20, Level::Low),
    );

    spawner
        .spawn(tasks::tick_task(config.timing.scheduler_ms))
        .unwrap();
    spawner.spawn(tasks::terminal_rx_task(terminal_rx)).unwrap();
    spawner.spawn(tasks::terminal_tx_task(terminal_tx)).unwrap();
    spawner.spawn(tasks::host_rx_task(host_rx, config)).unwrap();
    spawner.spawn(tasks::host_tx_task(host_tx)).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::led_task(led)).unwrap();
    spawner.spawn(tasks::storage_task(flash)).unwrap();
    spawner.spawn(tasks::controller_task(config, store)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Reminder record left by the previous run, if it can be read
async fn read_reminder_record(flash: &mut Rp2040FlashStorage<'static>) -> Option<ReminderRecord> {
    let mut buf = [0u8; RECORD_LEN];
    match flash.read(StorageKey::Reminders, &mut buf).await {
        Ok(len) => {
            debug!("Read {} byte reminder record", len);
            ReminderRecord::from_slice(&buf[..len]).ok()
        }
        Err(FlashError::NotFound) => {
            info!("No reminder record, starting empty");
            None
        }
        Err(e) => {
            warn!("Reminder record unreadable: {:?}, starting empty", e);
            None
        }
    }
}
