//! Time keeping and time formatting

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::error::Error;

/// Enough for "HH:MM" with room to spare
const TIME_TEXT_LEN: usize = 8;

/// Hour display convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    /// "%H:%M"
    TwentyFourHour,
    /// "%I:%M", no AM/PM marker
    TwelveHour,
}

impl ClockStyle {
    /// Decode the companion's setting byte: 0 for 24 hour, 1 for 12 hour.
    pub fn from_setting(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::TwentyFourHour),
            1 => Ok(Self::TwelveHour),
            other => Err(Error::InvalidSetting(other)),
        }
    }

    pub fn setting(self) -> u8 {
        match self {
            Self::TwentyFourHour => 0,
            Self::TwelveHour => 1,
        }
    }
}

/// Formatted clock text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeText {
    buf: [u8; TIME_TEXT_LEN],
    len: usize,
}

impl TimeText {
    /// Text shown before the first tick
    pub fn placeholder() -> Self {
        Self::from_hm(0, 0)
    }

    pub fn new(time: &impl Timelike, style: ClockStyle) -> Self {
        let hour = match style {
            ClockStyle::TwentyFourHour => time.hour(),
            ClockStyle::TwelveHour => time.hour12().1,
        };
        Self::from_hm(hour, time.minute())
    }

    fn from_hm(hour: u32, minute: u32) -> Self {
        let mut buf = [0; TIME_TEXT_LEN];
        let len = format_no_std::show(&mut buf, format_args!("{:02}:{:02}", hour, minute))
            .map_or(0, str::len);
        Self { buf, len }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

/// Wall clock derived from a reference time and the monotonic uptime
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    /// Local time at the reference point
    reference: NaiveDateTime,
    /// Uptime at the reference point in microseconds
    reference_us: u64,
}

impl Clock {
    pub fn new(reference: NaiveDateTime, uptime_us: u64) -> Self {
        Self {
            reference,
            reference_us: uptime_us,
        }
    }

    /// Create a clock from a UTC unix timestamp and a fixed offset to local time.
    pub fn from_utc_timestamp(secs: i64, utc_offset_secs: i32, uptime_us: u64) -> Result<Self, Error> {
        let local = DateTime::from_timestamp(secs, 0)
            .ok_or(Error::InvalidTime)?
            .naive_utc()
            .checked_add_signed(TimeDelta::seconds(utc_offset_secs.into()))
            .ok_or(Error::InvalidTime)?;
        Ok(Self::new(local, uptime_us))
    }

    /// Replace the reference time
    pub fn set(&mut self, reference: NaiveDateTime, uptime_us: u64) {
        self.reference = reference;
        self.reference_us = uptime_us;
    }

    /// Current local time
    pub fn now(&self, uptime_us: u64) -> NaiveDateTime {
        let elapsed = uptime_us.saturating_sub(self.reference_us);
        i64::try_from(elapsed)
            .ok()
            .and_then(|us| self.reference.checked_add_signed(TimeDelta::microseconds(us)))
            .unwrap_or(self.reference)
    }
}

/// Microseconds until the next full minute, rounded up.
///
/// Exactly on a minute boundary this is a full minute.
pub fn until_next_minute(now: &NaiveDateTime) -> u64 {
    let into_minute_ns =
        now.second() as u64 * 1_000_000_000 + (now.nanosecond() % 1_000_000_000) as u64;
    (60_000_000_000 - into_minute_ns).div_ceil(1_000)
}

/// Decode a Current Time Service "Exact Time 256" payload.
///
/// Layout: year (u16 LE), month, day, hours, minutes, seconds,
/// day of week, fractions of 1/256 s, adjust reason.
pub fn from_cts_bytes(bytes: &[u8; 10]) -> Result<NaiveDateTime, Error> {
    let year = u16::from_le_bytes([bytes[0], bytes[1]]);
    // Year 0 means unknown
    if year == 0 {
        return Err(Error::InvalidTime);
    }
    let month = bytes[2] as u32;
    let day = bytes[3] as u32;
    let hour = bytes[4] as u32;
    let min = bytes[5] as u32;
    let sec = bytes[6] as u32;
    let milli = bytes[8] as u32 * 1000 / 256;

    NaiveDate::from_ymd_opt(year.into(), month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
        .ok_or(Error::InvalidTime)
}

/// Encode a time as a Current Time Service "Exact Time 256" payload.
pub fn to_cts_bytes(time: &NaiveDateTime) -> [u8; 10] {
    let year = u16::try_from(time.year()).unwrap_or(0).to_le_bytes();
    let fractions = ((time.nanosecond() % 1_000_000_000) as u64 * 256 / 1_000_000_000) as u8;
    [
        year[0],
        year[1],
        time.month() as u8,
        time.day() as u8,
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
        time.weekday().number_from_monday() as u8,
        fractions,
        // No adjustment
        0,
    ]
}
