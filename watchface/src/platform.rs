//! Hardware platform variants

/// Screen variant the images are drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Platform {
    /// Monochrome, rectangular screen
    Monochrome,
    /// Color, rectangular screen
    Color,
    /// Color, round screen
    Round,
}

impl Platform {
    /// Platform selected at build time
    #[cfg(feature = "platform-mono")]
    pub const CURRENT: Self = Self::Monochrome;
    /// Platform selected at build time
    #[cfg(all(feature = "platform-round", not(feature = "platform-mono")))]
    pub const CURRENT: Self = Self::Round;
    /// Platform selected at build time
    #[cfg(not(any(feature = "platform-mono", feature = "platform-round")))]
    pub const CURRENT: Self = Self::Color;

    pub const fn is_round(self) -> bool {
        matches!(self, Self::Round)
    }

    /// Distance of the clock text from the top of the screen in pixels
    pub const fn time_offset(self) -> i32 {
        if self.is_round() {
            20
        } else {
            16
        }
    }
}
