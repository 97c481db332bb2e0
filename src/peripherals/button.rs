//! Side button

use debouncr::{debounce_2, Debouncer, Edge, Repeat2};
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_13, P0_15},
};
use embassy_time::Timer;

/// Debounced side button.
///
/// The button is only powered while it is sampled.
pub struct Button<'a> {
    /// Pin P0.13: high while pressed
    pin_button: Input<'a, P0_13>,
    /// Pin P0.15: powers the button
    pin_enable: Output<'a, P0_15>,
    debouncer: Debouncer<u8, Repeat2>,
}

impl<'a> Button<'a> {
    pub fn init(pin_button: Input<'a, P0_13>, pin_enable: Output<'a, P0_15>) -> Self {
        Self {
            pin_button,
            pin_enable,
            debouncer: debounce_2(false),
        }
    }

    /// Sample the button once. True on the sample a stable press begins.
    pub async fn pressed(&mut self) -> bool {
        self.pin_enable.set_high();
        // The button needs a short time to give stable outputs
        Timer::after_nanos(1).await;

        let edge = self.debouncer.update(self.pin_button.is_high());

        // Button consumes around 34µA when P0.15 is left high.
        // To reduce current consumption, set it low most of the time.
        self.pin_enable.set_low();

        edge == Some(Edge::Rising)
    }
}
