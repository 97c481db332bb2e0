//! Time keeping module for PineTime

use chrono::NaiveDateTime;
use embassy_time::{Duration, Instant};
use watchface::{until_next_minute, Clock, Error};

/// Local wall clock running off the monotonic embassy timer
pub struct TimeManager {
    clock: Clock,
}

impl TimeManager {
    /// Initialize time keeping on boot from a UTC unix timestamp
    pub fn init(utc_epoch: i64, utc_offset_secs: i32) -> Result<Self, Error> {
        Ok(Self {
            clock: Clock::from_utc_timestamp(utc_epoch, utc_offset_secs, uptime_us())?,
        })
    }

    /// Get current local time
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now(uptime_us())
    }

    /// Update time reference to the given local time
    pub fn set_time(&mut self, time: NaiveDateTime) {
        self.clock.set(time, uptime_us());
    }

    /// Time left until the minute changes
    pub fn until_next_minute(&self) -> Duration {
        Duration::from_micros(until_next_minute(&self.now()))
    }
}

fn uptime_us() -> u64 {
    Instant::now().as_micros()
}
