//! Error types for the BlueBridge core
//!
//! The simulation has no recoverable failure modes: connections never fail,
//! scans never error, and invalid intents are logged no-ops. The only
//! error-shaped conditions are configuration problems caught up front.

/// Core error type for the BlueBridge simulation
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("invalid simulator configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl BridgeError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, BridgeError>;
