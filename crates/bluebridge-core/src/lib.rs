//! BlueBridge core state machine
//!
//! A simulated peer-to-peer chat: discovery → connection → chat session,
//! with delivery status progression and auto-replies faked via timers and
//! seeded randomization. This crate is the pure, sans-IO core: it never
//! sleeps and never spawns; every wait is returned as an epoch-scoped
//! [`TimerRequest`] for the embedding layer to schedule, and stale timers
//! discard themselves at fire time.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod channel;
pub mod config;
pub mod delivery;
pub mod device;
pub mod discovery;
pub mod errors;
pub mod message;
pub mod session;
pub mod timer;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{Command, Snapshot};
pub use config::{CatalogEntry, SimulatorConfig};
pub use delivery::DeliverySimulator;
pub use device::{Device, Distance, SignalStrength};
pub use discovery::DiscoveryEngine;
pub use errors::{BridgeError, Result};
pub use message::{Message, MessageStatus, Sender};
pub use session::{AppState, SessionController};
pub use timer::{TimerEvent, TimerRequest};
pub use types::{DeviceId, Epoch, MessageId, SystemTimeSource, TimeSource, Timestamp};
