//! Watch face window
//!
//! Holds the layer stack while the window is loaded and reacts to the
//! two events a watch face gets: the minute tick and changes of the
//! companion connection.

use chrono::{NaiveTime, Timelike};
use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::{
    cache::BitmapCache,
    clock::{ClockStyle, TimeText},
    layer::{BitmapLayer, TextLayer},
    platform::Platform,
    resources::ResourceId,
};

/// Haptic feedback requested by the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alert {
    /// Two short pulses
    DoublePulse,
}

impl Alert {
    /// Number of motor pulses
    pub const fn pulses(self) -> u8 {
        match self {
            Self::DoublePulse => 2,
        }
    }
}

/// Layers of a loaded window, bottom to top
struct Layers {
    background: BitmapLayer,
    time: TextLayer,
}

pub struct WatchFace {
    platform: Platform,
    style: ClockStyle,
    /// Screen area of the window
    bounds: Rectangle,
    /// Present between `load` and `unload`
    layers: Option<Layers>,
    cache: BitmapCache,
    connected: bool,
    /// Last time handed to `update_time`, to the minute
    time: Option<NaiveTime>,
}

impl WatchFace {
    pub fn new(platform: Platform, style: ClockStyle, bounds: Rectangle) -> Self {
        Self {
            platform,
            style,
            bounds,
            layers: None,
            cache: BitmapCache::new(),
            connected: true,
            time: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn style(&self) -> ClockStyle {
        self.style
    }

    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    /// Connection state the background currently reflects
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Image shown by the background layer
    pub fn background(&self) -> Option<ResourceId> {
        self.layers
            .as_ref()
            .and_then(|layers| layers.background.bitmap())
    }

    /// Text shown by the time layer
    pub fn time_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.time.text())
    }

    pub fn cache(&self) -> &BitmapCache {
        &self.cache
    }

    /// Create the layers and show the connected background.
    pub fn load(&mut self) {
        let time_frame = Rectangle::new(
            self.bounds.top_left + Point::new(0, self.platform.time_offset()),
            self.bounds.size,
        );
        self.layers = Some(Layers {
            background: BitmapLayer::new(self.bounds),
            time: TextLayer::new(time_frame, Rgb565::BLACK),
        });
        info!("Watch face loaded on {} platform", self.platform);

        self.show_background(true);
    }

    /// Drop the layers and release every decoded bitmap.
    pub fn unload(&mut self) {
        self.layers = None;
        self.cache.clear();
        info!("Watch face unloaded");
    }

    /// Put the current time on the time layer.
    pub fn update_time(&mut self, now: &impl Timelike) {
        self.time = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0);
        self.show_time();
    }

    /// Switch between 12 and 24 hour time and reformat the shown time.
    pub fn set_style(&mut self, style: ClockStyle) {
        self.style = style;
        info!("Clock style set to {}", style);
        self.show_time();
    }

    fn show_time(&mut self) {
        let (Some(layers), Some(time)) = (self.layers.as_mut(), self.time) else {
            return;
        };
        let text = TimeText::new(&time, self.style);
        layers.time.set_text(text);
        debug!("Time updated: {}", text.as_str());
    }

    /// Swap the background for the new connection state.
    ///
    /// Losing the connection asks for a double pulse, every time.
    pub fn on_connection(&mut self, connected: bool) -> Option<Alert> {
        let alert = if connected {
            info!("Companion connected");
            None
        } else {
            warn!("Companion disconnected");
            Some(Alert::DoublePulse)
        };
        self.show_background(connected);
        alert
    }

    fn show_background(&mut self, connected: bool) {
        self.connected = connected;
        let Some(layers) = self.layers.as_mut() else {
            return;
        };

        let id = ResourceId::background(self.platform, connected);
        let bitmap = match self.cache.get_or_load(id) {
            Ok(_) => Some(id),
            Err(e) => {
                error!("Failed to load background: {}", e);
                None
            }
        };
        layers.background.set_bitmap(bitmap);
    }

    /// Draw the whole window. Does nothing while unloaded.
    pub fn render<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(layers) = self.layers.as_ref() else {
            return Ok(());
        };
        draw_layers(layers, &mut self.cache, target)
    }

    /// Redraw only the strip under the time text.
    pub fn render_time<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(layers) = self.layers.as_ref() else {
            return Ok(());
        };
        let area = layers.time.text_bounds();
        draw_layers(layers, &mut self.cache, &mut target.clipped(&area))
    }
}

fn draw_layers<D>(layers: &Layers, cache: &mut BitmapCache, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let bmp = layers
        .background
        .bitmap()
        .and_then(|id| cache.get_or_load(id).ok());
    layers.background.draw(bmp, target)?;
    layers.time.draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameBuffer;
    use chrono::NaiveTime;
    use embedded_graphics::pixelcolor::Rgb888;
    use profont::PROFONT_24_POINT;

    const SKY: Rgb888 = Rgb888::new(0x5b, 0xb4, 0xe6);
    const WASHED_OUT: Rgb888 = Rgb888::new(0xb8, 0xb8, 0xb8);

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 240))
    }

    fn watch_face(platform: Platform) -> WatchFace {
        WatchFace::new(platform, ClockStyle::TwentyFourHour, screen())
    }

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    /// Where the time text lands on rectangular screens
    fn time_strip() -> Rectangle {
        Rectangle::new(
            Point::new(0, 16),
            Size::new(240, PROFONT_24_POINT.character_size.height),
        )
    }

    #[test]
    fn load_shows_connected_background() {
        for (platform, id) in [
            (Platform::Monochrome, ResourceId::MonoWeezer),
            (Platform::Color, ResourceId::ColorWeezer),
            (Platform::Round, ResourceId::RoundWeezer),
        ] {
            let mut face = watch_face(platform);
            assert!(!face.is_loaded());

            face.load();
            assert!(face.is_loaded());
            assert_eq!(face.background(), Some(id));
            assert_eq!(face.time_text(), Some("00:00"));
            assert_eq!(face.cache().loaded_count(), 1);
        }
    }

    #[test]
    fn disconnect_swaps_background_and_alerts() {
        for (platform, id) in [
            (Platform::Monochrome, ResourceId::MonoDiss),
            (Platform::Color, ResourceId::ColorDiss),
            (Platform::Round, ResourceId::RoundDiss),
        ] {
            let mut face = watch_face(platform);
            face.load();

            assert_eq!(face.on_connection(false), Some(Alert::DoublePulse));
            assert_eq!(face.background(), Some(id));
            assert!(!face.is_connected());
        }
    }

    #[test]
    fn reconnect_reuses_decoded_bitmaps() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.on_connection(false);
        assert_eq!(face.cache().loaded_count(), 2);

        assert_eq!(face.on_connection(true), None);
        assert_eq!(face.background(), Some(ResourceId::ColorWeezer));
        face.on_connection(false);
        face.on_connection(true);
        assert_eq!(face.cache().loaded_count(), 2);
    }

    #[test]
    fn every_disconnect_alerts() {
        let mut face = watch_face(Platform::Round);
        face.load();
        assert_eq!(face.on_connection(false), Some(Alert::DoublePulse));
        assert_eq!(face.on_connection(false), Some(Alert::DoublePulse));
        assert_eq!(Alert::DoublePulse.pulses(), 2);
    }

    #[test]
    fn time_follows_clock_style() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.update_time(&hm(13, 7));
        assert_eq!(face.time_text(), Some("13:07"));

        let mut face = WatchFace::new(Platform::Color, ClockStyle::TwelveHour, screen());
        face.load();
        face.update_time(&hm(13, 7));
        assert_eq!(face.time_text(), Some("01:07"));
    }

    #[test]
    fn unloaded_face_draws_nothing() {
        let mut face = watch_face(Platform::Color);
        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);

        face.update_time(&hm(9, 41));
        assert_eq!(face.on_connection(false), Some(Alert::DoublePulse));
        face.render(&mut fb).unwrap();
        face.render_time(&mut fb).unwrap();

        assert_eq!(fb.count(Rgb565::MAGENTA), 240 * 240);
        assert_eq!(face.background(), None);
        assert_eq!(face.time_text(), None);
        assert_eq!(face.cache().loaded_count(), 0);
    }

    #[test]
    fn unload_releases_bitmaps() {
        let mut face = watch_face(Platform::Monochrome);
        face.load();
        face.on_connection(false);
        assert_eq!(face.cache().loaded_count(), 2);

        face.unload();
        assert!(!face.is_loaded());
        assert_eq!(face.cache().loaded_count(), 0);

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();
        assert_eq!(fb.count(Rgb565::MAGENTA), 240 * 240);
    }

    #[test]
    fn renders_background_and_time() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.update_time(&hm(12, 34));

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();

        assert_eq!(fb.count(Rgb565::MAGENTA), 0);
        assert_eq!(fb.pixel(Point::new(5, 100)), Rgb565::from(SKY));
        let strip = time_strip();
        assert!(fb.count_in(&strip, Rgb565::BLACK) > 0);
    }

    #[test]
    fn renders_disconnected_background() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.on_connection(false);

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(5, 100)), Rgb565::from(WASHED_OUT));
    }

    #[test]
    fn renders_monochrome_background() {
        let mut face = watch_face(Platform::Monochrome);
        face.load();

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(5, 100)), Rgb565::WHITE);
        assert_eq!(fb.pixel(Point::new(0, 100)), Rgb565::BLACK);
    }

    #[test]
    fn renders_round_background() {
        let mut face = watch_face(Platform::Round);
        face.load();

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(0, 0)), Rgb565::BLACK);
        assert_eq!(fb.pixel(Point::new(5, 100)), Rgb565::from(SKY));
    }

    #[test]
    fn time_redraw_stays_in_its_strip() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.update_time(&hm(10, 8));

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render_time(&mut fb).unwrap();

        let strip = time_strip();
        let strip_pixels = (strip.size.width * strip.size.height) as usize;
        assert_eq!(fb.count(Rgb565::MAGENTA), 240 * 240 - strip_pixels);
        assert_eq!(fb.count_in(&strip, Rgb565::MAGENTA), 0);
        assert!(fb.count_in(&strip, Rgb565::BLACK) > 0);
        assert_eq!(fb.pixel(Point::new(5, 20)), Rgb565::from(SKY));
    }

    #[test]
    fn round_time_strip_sits_lower() {
        let mut face = watch_face(Platform::Round);
        face.load();

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render_time(&mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(120, 19)), Rgb565::MAGENTA);
        assert_ne!(fb.pixel(Point::new(120, 20)), Rgb565::MAGENTA);
    }

    #[test]
    fn time_stays_visible_without_background() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.layers.as_mut().unwrap().background.set_bitmap(None);
        face.update_time(&hm(12, 34));

        let mut fb = FrameBuffer::filled(Rgb565::MAGENTA);
        face.render(&mut fb).unwrap();

        let strip = time_strip();
        assert_eq!(fb.count(Rgb565::MAGENTA), 0);
        assert!(fb.count_in(&strip, Rgb565::BLACK) > 0);
        assert_eq!(fb.count(Rgb565::BLACK), fb.count_in(&strip, Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(5, 100)), Rgb565::WHITE);
    }

    #[test]
    fn style_change_reformats_shown_time() {
        let mut face = watch_face(Platform::Color);
        face.load();
        face.set_style(ClockStyle::TwelveHour);
        assert_eq!(face.time_text(), Some("00:00"));

        face.update_time(&hm(18, 45));
        assert_eq!(face.time_text(), Some("06:45"));

        face.set_style(ClockStyle::TwentyFourHour);
        assert_eq!(face.style(), ClockStyle::TwentyFourHour);
        assert_eq!(face.time_text(), Some("18:45"));
    }
}
