//! Status LED task
//!
//! Common-cathode RGB LED on three GPIOs. Notifications show red,
//! reminders orange; other screens leave it dark. Blinks flash the
//! current colour off and back.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use noticeboard_core::state::{Indication, ScreenMode};

use crate::channels::INDICATIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Colour {
    red: bool,
    green: bool,
    blue: bool,
}

impl Colour {
    const OFF: Colour = Colour {
        red: false,
        green: false,
        blue: false,
    };

    fn for_screen(mode: ScreenMode) -> Self {
        match mode {
            ScreenMode::Notifications => Colour {
                red: true,
                ..Colour::OFF
            },
            ScreenMode::Reminders => Colour {
                red: true,
                green: true,
                ..Colour::OFF
            },
            ScreenMode::Calendar => Colour::OFF,
        }
    }
}

pub struct RgbLed {
    red: Output<'static>,
    green: Output<'static>,
    blue: Output<'static>,
}

impl RgbLed {
    pub fn new(red: Output<'static>, green: Output<'static>, blue: Output<'static>) -> Self {
        Self { red, green, blue }
    }

    fn show(&mut self, colour: Colour) {
        self.red.set_level(colour.red.into());
        self.green.set_level(colour.green.into());
        self.blue.set_level(colour.blue.into());
    }
}

#[embassy_executor::task]
pub async fn led_task(mut led: RgbLed) {
    info!("LED task started");

    let mut colour = Colour::OFF;
    led.show(colour);

    loop {
        match INDICATIONS.receive().await {
            Indication::Screen(mode) => {
                colour = Colour::for_screen(mode);
                led.show(colour);
            }
            Indication::Off => {
                colour = Colour::OFF;
                led.show(colour);
            }
            Indication::Blink { times, period_ms } => {
                trace!("Blink {} x {} ms", times, period_ms);
                let period = u64::from(period_ms);
                for _ in 0..times {
                    led.show(Colour::OFF);
                    Timer::after_millis(period).await;
                    led.show(colour);
                    Timer::after_millis(period).await;
                }
            }
        }
    }
}
