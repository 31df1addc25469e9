//! Discoverable devices and signal-strength mapping

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::types::{DeviceId, Timestamp};

// ----------------------------------------------------------------------------
// Distance
// ----------------------------------------------------------------------------

/// Coarse distance tier standing in for signal strength
///
/// The simulation only distinguishes three discrete tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Close,
    Medium,
    Far,
}

impl Distance {
    /// Map distance to the signal-strength label shown to the user
    pub fn signal_strength(&self) -> SignalStrength {
        match self {
            Distance::Close => SignalStrength::Strong,
            Distance::Medium => SignalStrength::Medium,
            Distance::Far => SignalStrength::Weak,
        }
    }

    /// Map distance to a bar count out of three
    pub fn signal_bars(&self) -> u8 {
        match self {
            Distance::Close => 3,
            Distance::Medium => 2,
            Distance::Far => 1,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Close => write!(f, "close"),
            Distance::Medium => write!(f, "medium"),
            Distance::Far => write!(f, "far"),
        }
    }
}

/// Signal-strength label derived from [`Distance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStrength {
    Strong,
    Medium,
    Weak,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::Strong => write!(f, "Strong"),
            SignalStrength::Medium => write!(f, "Medium"),
            SignalStrength::Weak => write!(f, "Weak"),
        }
    }
}

// ----------------------------------------------------------------------------
// Device
// ----------------------------------------------------------------------------

/// A device revealed by a scan
///
/// Devices are immutable once revealed; the discovered list they live in is
/// discarded wholesale when a new scan starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque unique identifier
    pub id: DeviceId,
    /// Display name
    pub name: String,
    /// Distance tier standing in for signal strength
    pub distance: Distance,
    /// When the scan revealed this device
    pub last_seen: Timestamp,
}

impl Device {
    pub fn new(
        id: impl Into<DeviceId>,
        name: impl Into<String>,
        distance: Distance,
        last_seen: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance,
            last_seen,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
