//! Boundary types between the core and its embedding
//!
//! The core's only external surface is the intents it accepts and the
//! read-only snapshot it exposes after every state change. There is no wire
//! protocol; these types cross an in-process channel.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::message::Message;
use crate::session::AppState;
use crate::types::DeviceId;

// ----------------------------------------------------------------------------
// Command: UI/External → Core
// ----------------------------------------------------------------------------

/// User intents forwarded into the state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Reset discovered devices and begin the staggered reveal window
    StartScan,
    /// Begin connecting to a previously discovered device
    SelectDevice { device_id: DeviceId },
    /// Append an outbound message and schedule its delivery simulation
    SendMessage { text: String },
    /// Reset to discovery, clearing the device and message log
    Disconnect,
    /// Stop the owning event loop
    Shutdown,
}

// ----------------------------------------------------------------------------
// Snapshot: Core → UI
// ----------------------------------------------------------------------------

/// Read-only view of the full application state
///
/// Re-published after every mutation; the rendering collaborator never
/// observes anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub app_state: AppState,
    pub connected_device: Option<Device>,
    pub messages: Vec<Message>,
    pub discovered_devices: Vec<Device>,
    pub scanning: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            app_state: AppState::Discovery,
            connected_device: None,
            messages: Vec::new(),
            discovered_devices: Vec::new(),
            scanning: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
