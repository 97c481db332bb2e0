//! Screen layers
//!
//! A layer owns a frame on the screen and knows how to draw itself into
//! it. The window stacks a bitmap layer for the background and a text
//! layer for the time on top.

use embedded_graphics::{
    image::Image,
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_24_POINT;
use tinybmp::Bmp;

use crate::{clock::TimeText, resources::ResourceId};

const TIME_TEXT_STYLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Layer showing a single image, centered in its frame
pub struct BitmapLayer {
    frame: Rectangle,
    bitmap: Option<ResourceId>,
}

impl BitmapLayer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            bitmap: None,
        }
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn bitmap(&self) -> Option<ResourceId> {
        self.bitmap
    }

    pub fn set_bitmap(&mut self, bitmap: Option<ResourceId>) {
        self.bitmap = bitmap;
    }

    /// Draw the decoded image of the current bitmap, or a blank white window when there is none.
    pub fn draw<D>(&self, bmp: Option<&Bmp<'static, Rgb565>>, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match bmp {
            Some(bmp) => {
                let size = bmp.size();
                let offset = Point::new(
                    (self.frame.size.width as i32 - size.width as i32) / 2,
                    (self.frame.size.height as i32 - size.height as i32) / 2,
                );
                Image::new(bmp, self.frame.top_left + offset).draw(target)
            }
            None => target.fill_solid(&self.frame, Rgb565::WHITE),
        }
    }
}

/// Layer showing one line of centered text with a clear background
pub struct TextLayer {
    frame: Rectangle,
    text: TimeText,
    color: Rgb565,
}

impl TextLayer {
    pub fn new(frame: Rectangle, color: Rgb565) -> Self {
        Self {
            frame,
            text: TimeText::placeholder(),
            color,
        }
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn set_text(&mut self, text: TimeText) {
        self.text = text;
    }

    /// Area any text of this layer can cover: the frame width, one line high
    pub fn text_bounds(&self) -> Rectangle {
        Rectangle::new(
            self.frame.top_left,
            Size::new(self.frame.size.width, PROFONT_24_POINT.character_size.height),
        )
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let character_style = MonoTextStyle::new(&PROFONT_24_POINT, self.color);
        let position = Point::new(
            self.frame.top_left.x + self.frame.size.width as i32 / 2,
            self.frame.top_left.y,
        );
        Text::with_text_style(self.text(), position, character_style, TIME_TEXT_STYLE)
            .draw(target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cache::BitmapCache, testing::FrameBuffer};
    use chrono::NaiveTime;
    use embedded_graphics::pixelcolor::Rgb888;

    use crate::clock::ClockStyle;

    #[test]
    fn bitmap_layer_without_image_is_blank() {
        let mut fb = FrameBuffer::filled(Rgb565::BLACK);
        let layer = BitmapLayer::new(fb.bounding_box());
        layer.draw(None, &mut fb).unwrap();
        assert_eq!(fb.count(Rgb565::WHITE), 240 * 240);
    }

    #[test]
    fn bitmap_layer_draws_image() {
        let mut cache = BitmapCache::new();
        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        let mut layer = BitmapLayer::new(fb.bounding_box());
        layer.set_bitmap(Some(ResourceId::ColorWeezer));

        let bmp = cache.get_or_load(ResourceId::ColorWeezer).unwrap();
        layer.draw(Some(bmp), &mut fb).unwrap();

        assert_eq!(fb.count(Rgb565::MAGENTA), 0);
        assert_eq!(
            fb.pixel(Point::new(5, 100)),
            Rgb565::from(Rgb888::new(0x5b, 0xb4, 0xe6))
        );
    }

    #[test]
    fn text_layer_starts_with_placeholder() {
        let layer = TextLayer::new(Rectangle::new(Point::zero(), Size::new(240, 240)), Rgb565::BLACK);
        assert_eq!(layer.text(), "00:00");
    }

    #[test]
    fn text_stays_inside_text_bounds() {
        let mut fb = FrameBuffer::filled(Rgb565::WHITE);
        let mut layer = TextLayer::new(
            Rectangle::new(Point::new(0, 16), Size::new(240, 224)),
            Rgb565::BLACK,
        );
        layer.set_text(TimeText::new(
            &NaiveTime::from_hms_opt(12, 34, 0).unwrap(),
            ClockStyle::TwentyFourHour,
        ));
        layer.draw(&mut fb).unwrap();

        let bounds = layer.text_bounds();
        let drawn = fb.count(Rgb565::BLACK);
        assert!(drawn > 0);
        assert_eq!(fb.count_in(&bounds, Rgb565::BLACK), drawn);
    }

    #[test]
    fn text_is_centered() {
        let mut fb = FrameBuffer::filled(Rgb565::WHITE);
        let layer = TextLayer::new(fb.bounding_box(), Rgb565::BLACK);
        layer.draw(&mut fb).unwrap();

        let left = fb.count_in(
            &Rectangle::new(Point::zero(), Size::new(120, 240)),
            Rgb565::BLACK,
        );
        let right = fb.count_in(
            &Rectangle::new(Point::new(120, 0), Size::new(120, 240)),
            Rgb565::BLACK,
        );
        assert!(left > 0 && right > 0);
        // "00:00" is mirror symmetric around the colon, give or take a column
        assert!(left.abs_diff(right) < left / 4);
    }
}
