//! Image resources embedded in flash
//!
//! All images are 240x240 BMP files. Monochrome ones use a 1 bpp color
//! table, the color and round ones an 8 bpp color table.

use crate::platform::Platform;

static MONO_WEEZER: &[u8] = include_bytes!("../assets/mono_weezer.bmp");
static COLOR_WEEZER: &[u8] = include_bytes!("../assets/color_weezer.bmp");
static ROUND_WEEZER: &[u8] = include_bytes!("../assets/round_weezer.bmp");
static MONO_DISS: &[u8] = include_bytes!("../assets/mono_diss.bmp");
static COLOR_DISS: &[u8] = include_bytes!("../assets/color_diss.bmp");
static ROUND_DISS: &[u8] = include_bytes!("../assets/round_diss.bmp");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    MonoWeezer = 0,
    ColorWeezer = 1,
    RoundWeezer = 2,
    MonoDiss = 3,
    ColorDiss = 4,
    RoundDiss = 5,
}

impl ResourceId {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::MonoWeezer,
        Self::ColorWeezer,
        Self::RoundWeezer,
        Self::MonoDiss,
        Self::ColorDiss,
        Self::RoundDiss,
    ];

    /// Background for a platform, depending on whether the companion is connected
    pub const fn background(platform: Platform, connected: bool) -> Self {
        match (platform, connected) {
            (Platform::Monochrome, true) => Self::MonoWeezer,
            (Platform::Color, true) => Self::ColorWeezer,
            (Platform::Round, true) => Self::RoundWeezer,
            (Platform::Monochrome, false) => Self::MonoDiss,
            (Platform::Color, false) => Self::ColorDiss,
            (Platform::Round, false) => Self::RoundDiss,
        }
    }

    /// Slot of this resource in a [`crate::BitmapCache`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Encoded image data
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Self::MonoWeezer => MONO_WEEZER,
            Self::ColorWeezer => COLOR_WEEZER,
            Self::RoundWeezer => ROUND_WEEZER,
            Self::MonoDiss => MONO_DISS,
            Self::ColorDiss => COLOR_DISS,
            Self::RoundDiss => ROUND_DISS,
        }
    }
}
