//! Lazily decoded bitmaps
//!
//! Each image resource is decoded the first time it is shown and kept
//! until the cache is cleared on window unload.

use embedded_graphics::pixelcolor::Rgb565;
use tinybmp::Bmp;

use crate::{error::Error, resources::ResourceId};

pub struct BitmapCache {
    /// One slot per resource, indexed by [`ResourceId::index`]
    slots: [Option<Bmp<'static, Rgb565>>; ResourceId::COUNT],
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmapCache {
    pub const fn new() -> Self {
        Self {
            slots: [None, None, None, None, None, None],
        }
    }

    /// Return the decoded bitmap, decoding it first if it isn't cached yet.
    pub fn get_or_load(&mut self, id: ResourceId) -> Result<&Bmp<'static, Rgb565>, Error> {
        self.load(id, id.bytes())
    }

    fn load(&mut self, id: ResourceId, data: &'static [u8]) -> Result<&Bmp<'static, Rgb565>, Error> {
        let slot = &mut self.slots[id.index()];
        if slot.is_none() {
            let bmp = Bmp::from_slice(data).map_err(|_| Error::InvalidBitmap(id))?;
            debug!("Decoded bitmap {}", id);
            *slot = Some(bmp);
        }
        slot.as_ref().ok_or(Error::InvalidBitmap(id))
    }

    pub fn is_loaded(&self, id: ResourceId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Number of decoded bitmaps currently held
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Release all decoded bitmaps
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }
}
