//! Epoch-scoped timer requests
//!
//! The core never sleeps. Every "wait" — connecting, the staggered device
//! reveals, the scan deadline, delivered-status updates, simulated replies —
//! is expressed as a [`TimerRequest`] returned to the embedding layer, which
//! schedules it however it likes (tokio sleeps in the runtime, a binary heap
//! in tests) and feeds the [`TimerEvent`] back when due.
//!
//! Each event carries the epoch that was current when it was scheduled. The
//! state machine compares that epoch at fire time and silently discards
//! stale events, which is the entire cancellation mechanism: disconnecting
//! or rescanning bumps an epoch instead of tracking timer handles.

use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::types::{Epoch, MessageId};

// ----------------------------------------------------------------------------
// Timer Event
// ----------------------------------------------------------------------------

/// A scheduled callback, fed back into the state machine when its delay ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// The simulated connection handshake completed
    ConnectionReady { epoch: Epoch },
    /// A scan should reveal catalog device `index`
    RevealDevice { index: usize, epoch: Epoch },
    /// The scan window deadline elapsed
    ScanFinished { epoch: Epoch },
    /// An outbound message should move from sent to delivered
    MarkDelivered { message_id: MessageId, epoch: Epoch },
    /// The simulated peer replies with `text`
    InboundReply { text: String, epoch: Epoch },
}

impl TimerEvent {
    /// The epoch this event was scheduled under
    pub fn epoch(&self) -> Epoch {
        match self {
            TimerEvent::ConnectionReady { epoch }
            | TimerEvent::RevealDevice { epoch, .. }
            | TimerEvent::ScanFinished { epoch }
            | TimerEvent::MarkDelivered { epoch, .. }
            | TimerEvent::InboundReply { epoch, .. } => *epoch,
        }
    }
}

// ----------------------------------------------------------------------------
// Timer Request
// ----------------------------------------------------------------------------

/// A request to deliver `event` back to the state machine after `delay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRequest {
    pub delay: Duration,
    pub event: TimerEvent,
}

impl TimerRequest {
    pub fn new(delay: Duration, event: TimerEvent) -> Self {
        Self { delay, event }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
