//! Control the vibration motor
//!
//! Implementation based upon https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::{Duration, Timer};

/// Controller for the internal vibration motor
pub struct Vibrator<'a> {
    /// Pin P0.16: High = off, Low = on
    pin_enable: Output<'a, P0_16>,
}

impl<'a> Vibrator<'a> {
    pub fn init(pin_enable: Output<'a, P0_16>) -> Self {
        let mut vibrator = Self { pin_enable };
        vibrator.off();
        vibrator
    }

    /// Pulse the motor `times` times, with pauses as long as the pulses.
    pub async fn pulse(&mut self, length: Duration, times: u8) {
        for i in 0..times {
            if i > 0 {
                Timer::after(length).await;
            }
            self.on();
            Timer::after(length).await;
            self.off();
        }
    }

    fn on(&mut self) {
        self.pin_enable.set_low();
    }

    fn off(&mut self) {
        self.pin_enable.set_high();
    }
}
