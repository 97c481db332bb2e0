//! In-memory display for rendering tests

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PointsIter, Rectangle},
};

const WIDTH: usize = 240;
const HEIGHT: usize = 240;

pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    pub fn filled(color: Rgb565) -> Self {
        Self {
            pixels: vec![color; WIDTH * HEIGHT],
        }
    }

    pub fn pixel(&self, point: Point) -> Rgb565 {
        self.pixels[point.y as usize * WIDTH + point.x as usize]
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel == color).count()
    }

    pub fn count_in(&self, area: &Rectangle, color: Rgb565) -> usize {
        area.intersection(&self.bounding_box())
            .points()
            .filter(|&point| self.pixel(point) == color)
            .count()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.pixels[point.y as usize * WIDTH + point.x as usize] = color;
            }
        }
        Ok(())
    }
}
