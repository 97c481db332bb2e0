//! Weezer watch face
//!
//! Hardware independent part of the watch face: background image
//! selection per platform and connection state, lazily decoded bitmaps,
//! the time text layer and the window that ties them together. Rendering
//! goes to any `embedded-graphics` draw target with `Rgb565` pixels, the
//! firmware hands in the LCD.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod cache;
mod clock;
mod error;
mod face;
mod layer;
mod platform;
mod resources;

#[cfg(test)]
mod testing;

pub use cache::BitmapCache;
pub use clock::{from_cts_bytes, to_cts_bytes, until_next_minute, Clock, ClockStyle, TimeText};
pub use error::Error;
pub use face::{Alert, WatchFace};
pub use layer::{BitmapLayer, TextLayer};
pub use platform::Platform;
pub use resources::ResourceId;
