//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::{prelude::*, primitives::Rectangle};
use mipidsi::{models::ST7789, Builder, Orientation};
use watchface::WatchFace;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// ST7789 LCD the watch face is drawn on
pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'a, SPI>,
        cs_pin: Output<'a, P0_25>,
        dc_pin: Output<'a, P0_18>,
        rst_pin: Output<'a, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        Ok(Self { lcd })
    }

    /// Screen area in pixels
    pub fn bounds() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(LCD_W.into(), LCD_H.into()))
    }

    /// Draw the whole watch face
    pub fn draw_face(&mut self, face: &mut WatchFace) -> Result<(), Error> {
        face.render(&mut self.lcd).map_err(|_| Error::Draw)
    }

    /// Redraw only the time of the watch face
    pub fn draw_time(&mut self, face: &mut WatchFace) -> Result<(), Error> {
        face.render_time(&mut self.lcd).map_err(|_| Error::Draw)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Display controller did not initialize
    Init,
    /// Writing pixels failed
    Draw,
}
