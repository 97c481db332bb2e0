#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, button::Button, display::Display, vibrator::Vibrator};
use system::{
    bluetooth::{self, Server, Update},
    config::{SystemConfig, WATCH_CONFIG},
    time::TimeManager,
};

// Others
use chrono::NaiveDateTime;
use watchface::{ClockStyle, WatchFace};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static BUTTON_PRESSED: Signal<ThreadModeRawMutex, ()> = Signal::new();
static CLOCK_STYLE: Signal<ThreadModeRawMutex, ClockStyle> = Signal::new();
static CONNECTION: Signal<ThreadModeRawMutex, bool> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, u8> = Signal::new();
static TICK: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();
static TIME_SYNC: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();

static SERVER: StaticCell<Server> = StaticCell::new();

/// Run the SoftDevice event loop
#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve the companion while connected, and report connection changes.
#[embassy_executor::task]
async fn companion_link(sd: &'static Softdevice, server: &'static Server) {
    loop {
        let conn = match bluetooth::advertise(sd).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::error!("Advertising failed: {}", e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };
        CONNECTION.signal(true);

        let reason = bluetooth::serve(&conn, server, |update| match update {
            Update::Time(time) => {
                defmt::info!("Time synchronized by companion");
                TIME_SYNC.signal(time);
            }
            Update::ClockStyle(style) => CLOCK_STYLE.signal(style),
        })
        .await;
        defmt::info!("Companion link closed: {}", reason);
        CONNECTION.signal(false);
    }
}

/// Signal every change of the minute and keep the readable time current.
#[embassy_executor::task]
async fn tick(mut time: TimeManager, server: &'static Server) {
    loop {
        match select(Timer::after(time.until_next_minute()), TIME_SYNC.wait()).await {
            Either::First(()) => {}
            Either::Second(synced) => time.set_time(synced),
        }
        let now = time.now();
        server.publish_time(&now);
        TICK.signal(now);
    }
}

/// Apply tick, settings and connection events to the watch face and redraw it.
#[embassy_executor::task]
async fn update_lcd(mut display: Display<'static, SPI2>, mut face: WatchFace) {
    loop {
        match select3(TICK.wait(), CLOCK_STYLE.wait(), CONNECTION.wait()).await {
            Either3::First(now) => {
                face.update_time(&now);
                if let Err(e) = display.draw_time(&mut face) {
                    defmt::error!("Failed to draw time: {}", e);
                }
            }
            Either3::Second(style) => {
                face.set_style(style);
                if let Err(e) = display.draw_time(&mut face) {
                    defmt::error!("Failed to draw time: {}", e);
                }
            }
            Either3::Third(connected) => {
                if let Some(alert) = face.on_connection(connected) {
                    NOTIFY.signal(alert.pulses());
                }
                if let Err(e) = display.draw_face(&mut face) {
                    defmt::error!("Failed to draw watch face: {}", e);
                }
            }
        }
    }
}

/// Play vibration alerts
#[embassy_executor::task]
async fn notify(mut vibrator: Vibrator<'static>) {
    let length = Duration::from_millis(WATCH_CONFIG.alert_pulse_ms);
    loop {
        let count = NOTIFY.wait().await;
        vibrator.pulse(length, count).await;
    }
}

/// Polls the button state every 10ms
#[embassy_executor::task]
async fn poll_button(mut button: Button<'static>) {
    loop {
        if button.pressed().await {
            BUTTON_PRESSED.signal(());
        }

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

/// Step the backlight brightness on every button press
#[embassy_executor::task]
async fn update_brightness(mut backlight: Backlight<'static>) {
    loop {
        BUTTON_PRESSED.wait().await;
        if let Err(e) = backlight.cycle() {
            defmt::warn!("Failed to change brightness: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Priorities 0, 1 and 4 belong to the SoftDevice
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize backlight, dark until the first frame is drawn
    let mut backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        0,
    ));

    // Initialize button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Start the clock from the build time
    let time = unwrap!(TimeManager::init(UTC_EPOCH, WATCH_CONFIG.utc_offset_secs));

    // Push the watch face
    let mut face = WatchFace::new(
        WATCH_CONFIG.platform,
        WATCH_CONFIG.clock_style,
        Display::<SPI2>::bounds(),
    );
    face.load();
    face.update_time(&time.now());
    if let Err(e) = display.draw_face(&mut face) {
        defmt::error!("Failed to draw watch face: {}", e);
    }
    unwrap!(backlight.set(WATCH_CONFIG.backlight_level));

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::softdevice_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    server.publish_time(&time.now());
    server.publish_clock_style(WATCH_CONFIG.clock_style);
    let sd: &'static Softdevice = sd;

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(companion_link(sd, server)));
    unwrap!(spawner.spawn(tick(time, server)));
    unwrap!(spawner.spawn(update_lcd(display, face)));
    unwrap!(spawner.spawn(notify(vibrator)));
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(update_brightness(backlight)));
}
