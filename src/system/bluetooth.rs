//! Bluetooth module
//!
//! The watch advertises until the companion connects and then serves a
//! Current Time Service the companion reads and writes the local time
//! through, plus a settings service for the clock style.

// Core
use core::mem;

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection, DisconnectedError,
    },
    raw, Config, Softdevice,
};

// Others
use chrono::NaiveDateTime;
use watchface::{from_cts_bytes, to_cts_bytes, ClockStyle};

const DEVICE_NAME: &str = "Weezeface";
const CURRENT_TIME_SERVICE: ServiceUuid16 = ServiceUuid16::from_u16(0x1805);

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[CURRENT_TIME_SERVICE])
    .full_name(DEVICE_NAME)
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[CURRENT_TIME_SERVICE])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub cts: CurrentTimeService,
    pub settings: SettingsService,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    /// Exact Time 256 payload
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; 10],
}

#[nrf_softdevice::gatt_service(uuid = "8b1e0f00-5a2c-4d3e-9f41-7765657a6572")]
pub struct SettingsService {
    /// 0 for 24 hour, 1 for 12 hour time
    #[characteristic(uuid = "8b1e0f01-5a2c-4d3e-9f41-7765657a6572", read, write)]
    pub clock_style: u8,
}

/// Changes the companion pushes to the watch
pub enum Update {
    Time(NaiveDateTime),
    ClockStyle(ClockStyle),
}

impl Server {
    /// Publish the watch's current time for companion reads
    pub fn publish_time(&self, now: &NaiveDateTime) {
        if let Err(e) = self.cts.current_time_set(&to_cts_bytes(now)) {
            defmt::warn!("Failed to publish time: {}", e);
        }
    }

    /// Publish the active clock style for companion reads
    pub fn publish_clock_style(&self, style: ClockStyle) {
        if let Err(e) = self.settings.clock_style_set(&style.setting()) {
            defmt::warn!("Failed to publish clock style: {}", e);
        }
    }
}

/// SoftDevice configuration for a single companion connection
pub fn softdevice_config() -> Config {
    Config {
        // The PineTime has a 32.768 kHz crystal
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Advertise until a companion connects
pub async fn advertise(sd: &Softdevice) -> Result<Connection, peripheral::AdvertiseError> {
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &ADV_DATA,
        scan_data: &SCAN_DATA,
    };
    peripheral::advertise_connectable(sd, adv, &peripheral::Config::default()).await
}

/// Serve GATT requests until the connection drops.
///
/// `on_update` gets every valid time or setting the companion writes.
pub async fn serve<F>(conn: &Connection, server: &Server, mut on_update: F) -> DisconnectedError
where
    F: FnMut(Update),
{
    gatt_server::run(conn, server, |event| match event {
        ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
            match from_cts_bytes(&bytes) {
                Ok(time) => on_update(Update::Time(time)),
                Err(e) => defmt::warn!("Ignoring time written by companion: {}", e),
            }
        }
        ServerEvent::Settings(SettingsServiceEvent::ClockStyleWrite(value)) => {
            match ClockStyle::from_setting(value) {
                Ok(style) => on_update(Update::ClockStyle(style)),
                Err(e) => defmt::warn!("Ignoring clock style written by companion: {}", e),
            }
        }
    })
    .await
}
