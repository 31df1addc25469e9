//! Configuration for the simulation timings, device catalog, and reply pool
//!
//! Every delay the state machine uses comes from this configuration, and the
//! mock device catalog and auto-reply pool are plain data, so tests (and any
//! embedding) can substitute deterministic values.

use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::device::Distance;
use crate::errors::{BridgeError, Result};

// ----------------------------------------------------------------------------
// Catalog Entry
// ----------------------------------------------------------------------------

/// One candidate device the discovery simulation can reveal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub distance: Distance,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, distance: Distance) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance,
        }
    }
}

// ----------------------------------------------------------------------------
// Simulator Configuration
// ----------------------------------------------------------------------------

/// Timing, catalog, and reply-pool configuration for the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Delay between selecting a device and the connection becoming ready
    pub connect_delay: Duration,
    /// Stagger between successive device reveals during a scan
    pub reveal_interval: Duration,
    /// Fixed deadline at which scanning stops
    pub scan_duration: Duration,
    /// Delay before an outbound message is marked delivered
    pub delivered_delay: Duration,
    /// Lower bound (inclusive) of the simulated reply delay
    pub reply_delay_min: Duration,
    /// Upper bound (exclusive) of the simulated reply delay
    pub reply_delay_max: Duration,
    /// Candidate devices revealed by a scan, in reveal order
    pub device_catalog: Vec<CatalogEntry>,
    /// Texts a simulated peer replies with
    pub reply_pool: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            connect_delay: Duration::from_millis(2_000),
            reveal_interval: Duration::from_millis(1_500),
            scan_duration: Duration::from_millis(6_000),
            delivered_delay: Duration::from_millis(1_000),
            reply_delay_min: Duration::from_millis(2_000),
            reply_delay_max: Duration::from_millis(4_000),
            device_catalog: vec![
                CatalogEntry::new("1", "Alex's iPhone", Distance::Close),
                CatalogEntry::new("2", "Samsung Galaxy S23", Distance::Medium),
                CatalogEntry::new("3", "OnePlus 11", Distance::Far),
            ],
            reply_pool: vec![
                "Hey! Got your message 👋".to_string(),
                "That's awesome!".to_string(),
                "Thanks for reaching out".to_string(),
                "How's everything going?".to_string(),
                "Nice to connect via BlueBridge!".to_string(),
            ],
        }
    }
}

impl SimulatorConfig {
    /// Validate internal consistency of the configuration
    pub fn validate(&self) -> Result<()> {
        if self.device_catalog.is_empty() {
            return Err(BridgeError::invalid_config("device catalog is empty"));
        }
        if self.reply_pool.is_empty() {
            return Err(BridgeError::invalid_config("reply pool is empty"));
        }
        if self.reveal_interval.is_zero() {
            return Err(BridgeError::invalid_config("reveal interval is zero"));
        }
        if self.reply_delay_min >= self.reply_delay_max {
            return Err(BridgeError::invalid_config(
                "reply delay range is empty or inverted",
            ));
        }
        let last_reveal = self.reveal_interval * self.device_catalog.len() as u32;
        if self.scan_duration < last_reveal {
            return Err(BridgeError::invalid_config(
                "scan duration ends before the last device reveal",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
