//! BlueBridge runtime engine
//!
//! Embeds the pure core state machine in a tokio event loop: one owning task
//! processes intents, fulfills the core's epoch-scoped timer requests with
//! real sleeps, and publishes read-only snapshots after every state change.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod error;
pub mod runtime;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use error::{Result, RuntimeError};
pub use runtime::{BridgeHandle, BridgeRuntime};

// Re-export the core surface embedders need
pub use bluebridge_core::{
    AppState, Command, Device, DeviceId, Distance, Message, MessageStatus, Sender,
    SimulatorConfig, Snapshot,
};
