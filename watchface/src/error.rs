use crate::resources::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Image resource could not be decoded
    InvalidBitmap(ResourceId),
    /// Date or time fields out of range
    InvalidTime,
    /// Unknown value for a watch setting
    InvalidSetting(u8),
}
