//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::Priority,
};
use watchface::{ClockStyle, Platform};

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // Set high-frequency and low-frequency clock sources to external
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Configure interrupt priorities to exclude 0 (default), 1, and 4,
        // which are reserved for the nrf SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }
}

/// Watch face settings applied on boot
pub struct WatchConfig {
    /// Screen variant the background images are picked for
    pub platform: Platform,
    /// 12 or 24 hour time until the companion picks one
    pub clock_style: ClockStyle,
    /// Offset of local time to UTC
    pub utc_offset_secs: i32,
    /// Backlight level after boot (0–7)
    pub backlight_level: u8,
    /// Length of one vibration pulse
    pub alert_pulse_ms: u64,
}

pub const WATCH_CONFIG: WatchConfig = WatchConfig {
    platform: Platform::CURRENT,
    clock_style: if cfg!(feature = "clock-12h") {
        ClockStyle::TwelveHour
    } else {
        ClockStyle::TwentyFourHour
    },
    utc_offset_secs: 3_600,
    backlight_level: 2,
    alert_pulse_ms: 200,
};
