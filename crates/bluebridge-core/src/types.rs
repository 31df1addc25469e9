//! Core identifier and time types for the BlueBridge simulation
//!
//! Newtype patterns are used throughout for semantic validation and type
//! safety: device and message identifiers, millisecond timestamps, and the
//! epoch tokens that scope scheduled work to one session or scan attempt.

use core::fmt;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Device Identifier
// ----------------------------------------------------------------------------

/// Opaque unique identifier for a discoverable device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a new device identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ----------------------------------------------------------------------------
// Message Identifier
// ----------------------------------------------------------------------------

/// Unique identifier for a message, derived from its creation time
///
/// Identifiers are allocated from the millisecond clock and bumped past the
/// previous allocation when two messages land within the same millisecond, so
/// they are strictly monotonic per log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Create a message identifier from a raw value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get duration since another timestamp (saturating)
    pub fn duration_since(&self, other: Self) -> core::time::Duration {
        core::time::Duration::from_millis(self.0.saturating_sub(other.0))
    }
}

// ----------------------------------------------------------------------------
// Epoch
// ----------------------------------------------------------------------------

/// Generation token scoping scheduled work to one session or scan attempt
///
/// Every timer carries the epoch that was current when it was scheduled.
/// Disconnecting (or starting a new scan) bumps the relevant counter, so a
/// timer firing afterwards compares unequal and is discarded instead of
/// mutating state that has since been reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    /// The initial epoch
    pub const ZERO: Self = Self(0);

    /// Return the next epoch
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Time Source Trait
// ----------------------------------------------------------------------------

/// Trait for providing timestamps to the state machine
///
/// All time enters the core through this trait, so tests can substitute a
/// controllable clock and make time-dependent behavior deterministic.
pub trait TimeSource {
    /// Get the current timestamp
    fn now(&self) -> Timestamp;
}

/// Standard library implementation of TimeSource
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::new(duration.as_millis() as u64)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
