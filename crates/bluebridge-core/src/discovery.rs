//! Simulated device discovery
//!
//! A scan reveals a fixed catalog of devices one at a time on a staggered
//! schedule and stops at a fixed deadline. Starting a new scan discards all
//! prior results and bumps the scan epoch, so reveals still in flight from an
//! earlier scan discard themselves when they fire.

use tracing::debug;

use crate::config::CatalogEntry;
use crate::device::Device;
use crate::timer::{TimerEvent, TimerRequest};
use crate::types::{Epoch, Timestamp};

use core::time::Duration;

// ----------------------------------------------------------------------------
// Discovery Engine
// ----------------------------------------------------------------------------

/// Owns the scanning flag and the ordered list of discovered devices
#[derive(Debug)]
pub struct DiscoveryEngine {
    catalog: Vec<CatalogEntry>,
    reveal_interval: Duration,
    scan_duration: Duration,
    scanning: bool,
    devices: Vec<Device>,
    scan_epoch: Epoch,
}

impl DiscoveryEngine {
    pub fn new(catalog: Vec<CatalogEntry>, reveal_interval: Duration, scan_duration: Duration) -> Self {
        Self {
            catalog,
            reveal_interval,
            scan_duration,
            scanning: false,
            devices: Vec::new(),
            scan_epoch: Epoch::ZERO,
        }
    }

    /// Whether a scan window is currently open
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Devices revealed so far, in reveal order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a discovered device by id
    pub fn find_device(&self, id: &crate::types::DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| &d.id == id)
    }

    /// Start a new scan
    ///
    /// Clears prior results, opens the scan window, and returns one reveal
    /// timer per catalog entry (at `reveal_interval * (k + 1)`) plus the
    /// fixed-deadline finish timer. Bumping the scan epoch first invalidates
    /// any reveals still pending from a previous scan.
    pub fn start_scan(&mut self) -> Vec<TimerRequest> {
        self.scan_epoch = self.scan_epoch.next();
        self.devices.clear();
        self.scanning = true;
        debug!(epoch = %self.scan_epoch, "scan started");

        let mut timers = Vec::with_capacity(self.catalog.len() + 1);
        for index in 0..self.catalog.len() {
            timers.push(TimerRequest::new(
                self.reveal_interval * (index as u32 + 1),
                TimerEvent::RevealDevice {
                    index,
                    epoch: self.scan_epoch,
                },
            ));
        }
        timers.push(TimerRequest::new(
            self.scan_duration,
            TimerEvent::ScanFinished {
                epoch: self.scan_epoch,
            },
        ));
        timers
    }

    /// Handle a reveal timer firing
    pub fn handle_reveal(&mut self, index: usize, epoch: Epoch, now: Timestamp) {
        if epoch != self.scan_epoch {
            debug!(%epoch, current = %self.scan_epoch, "discarding stale reveal");
            return;
        }
        let Some(entry) = self.catalog.get(index) else {
            debug!(index, "reveal index out of catalog range");
            return;
        };
        debug!(device = %entry.name, "device revealed");
        self.devices.push(Device::new(
            entry.id.clone(),
            entry.name.clone(),
            entry.distance,
            now,
        ));
    }

    /// Handle the scan deadline firing
    ///
    /// Closes the window unconditionally, whether or not every reveal has
    /// landed yet.
    pub fn handle_finished(&mut self, epoch: Epoch) {
        if epoch != self.scan_epoch {
            debug!(%epoch, current = %self.scan_epoch, "discarding stale scan deadline");
            return;
        }
        self.scanning = false;
        debug!(found = self.devices.len(), "scan finished");
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
