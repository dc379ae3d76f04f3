//! Configuration persistence
//!
//! Loads the appliance record from flash at boot and writes it back when
//! the controller signals a change. Falls back to factory defaults when
//! nothing (or a different record version) is stored. Uses
//! sequential-storage for wear-leveled key-value storage in the last
//! 64 KB of flash.

use defmt::*;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use larum_core::config::ApplianceConfig;

use crate::channels::SAVE_SIGNAL;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB on the Pico
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the config partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Storage key of the one appliance record
const CONFIG_KEY: u8 = 1;

/// Largest serialized record we expect
const MAX_RECORD_SIZE: usize = 1024;

pub type ConfigFlash = Flash<'static, FLASH, Async, FLASH_SIZE>;

/// Load the stored configuration, or factory defaults
pub async fn load(flash: &mut ConfigFlash) -> ApplianceConfig {
    let mut data_buffer = [0u8; MAX_RECORD_SIZE];

    let fetched = map::fetch_item::<u8, &[u8], _>(
        flash,
        CONFIG_RANGE,
        &mut NoCache::new(),
        &mut data_buffer,
        &CONFIG_KEY,
    )
    .await;

    match fetched {
        Ok(Some(bytes)) => match ApplianceConfig::decode(bytes) {
            Some(config) => {
                info!("Configuration loaded from flash");
                config
            }
            None => {
                warn!("Stored configuration unreadable or wrong version, using defaults");
                ApplianceConfig::factory()
            }
        },
        Ok(None) => {
            info!("No stored configuration, using defaults");
            ApplianceConfig::factory()
        }
        Err(_) => {
            warn!("Flash read failed, using defaults");
            ApplianceConfig::factory()
        }
    }
}

/// Write a configuration record
pub async fn save(flash: &mut ConfigFlash, config: &ApplianceConfig) -> bool {
    let mut encode_buffer = [0u8; MAX_RECORD_SIZE];
    let Ok(bytes) = config.encode(&mut encode_buffer) else {
        warn!("Configuration did not serialize");
        return false;
    };

    let mut data_buffer = [0u8; MAX_RECORD_SIZE];
    let stored = map::store_item(
        flash,
        CONFIG_RANGE,
        &mut NoCache::new(),
        &mut data_buffer,
        &CONFIG_KEY,
        &bytes,
    )
    .await;

    match stored {
        Ok(()) => {
            debug!("Configuration saved ({} bytes)", bytes.len());
            true
        }
        Err(_) => {
            warn!("Flash write failed");
            false
        }
    }
}

/// Storage task - persists configuration snapshots from the controller
///
/// Flash writes stall the core they run on, so they happen here, never
/// on the tick path.
#[embassy_executor::task]
pub async fn storage_task(mut flash: ConfigFlash) {
    info!("Storage task started");

    loop {
        let config = SAVE_SIGNAL.wait().await;
        save(&mut flash, &config).await;
    }
}
