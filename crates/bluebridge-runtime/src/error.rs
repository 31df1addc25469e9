//! Runtime error types

use bluebridge_core::BridgeError;

/// Errors surfaced by the runtime layer
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Core(#[from] BridgeError),

    #[error("runtime channel closed")]
    ChannelClosed,
}

pub type Result<T> = core::result::Result<T, RuntimeError>;
