//! Chat messages and the forward-only delivery status lifecycle

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, Timestamp};

// ----------------------------------------------------------------------------
// Sender
// ----------------------------------------------------------------------------

/// Which side of the conversation produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Them,
}

// ----------------------------------------------------------------------------
// Message Status
// ----------------------------------------------------------------------------

/// Delivery status of an outbound message
///
/// Status only ever moves forward along Sent → Delivered → Read. `Read` is a
/// defined terminal status that current logic never assigns; it exists so the
/// representation does not have to change if read receipts are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Whether a transition to `next` respects the forward-only ordering
    pub fn can_advance_to(&self, next: MessageStatus) -> bool {
        next > *self
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Delivered => write!(f, "delivered"),
            MessageStatus::Read => write!(f, "read"),
        }
    }
}

// ----------------------------------------------------------------------------
// Message
// ----------------------------------------------------------------------------

/// A single entry in the session's insertion-ordered message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, monotonically allocated identifier
    pub id: MessageId,
    /// Non-empty message text
    pub text: String,
    /// Creation time
    pub timestamp: Timestamp,
    /// Which side produced the message
    pub sender: Sender,
    /// Current delivery status
    pub status: MessageStatus,
}

impl Message {
    /// Create an outbound message, starting in `Sent`
    pub fn outbound(id: MessageId, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp,
            sender: Sender::Me,
            status: MessageStatus::Sent,
        }
    }

    /// Create a simulated inbound message
    ///
    /// Inbound messages have no sent/delivered distinction; they arrive
    /// already `Delivered`.
    pub fn inbound(id: MessageId, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp,
            sender: Sender::Them,
            status: MessageStatus::Delivered,
        }
    }

    /// Advance the delivery status, rejecting regressions
    ///
    /// Returns true if the status changed.
    pub fn advance_status(&mut self, next: MessageStatus) -> bool {
        if self.status.can_advance_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_forward_only() {
        assert!(MessageStatus::Sent.can_advance_to(MessageStatus::Delivered));
        assert!(MessageStatus::Sent.can_advance_to(MessageStatus::Read));
        assert!(MessageStatus::Delivered.can_advance_to(MessageStatus::Read));

        assert!(!MessageStatus::Delivered.can_advance_to(MessageStatus::Sent));
        assert!(!MessageStatus::Read.can_advance_to(MessageStatus::Delivered));
        assert!(!MessageStatus::Sent.can_advance_to(MessageStatus::Sent));
    }

    #[test]
    fn test_advance_status() {
        let mut msg = Message::outbound(MessageId::new(1), "hi", Timestamp::new(0));
        assert_eq!(msg.status, MessageStatus::Sent);

        assert!(msg.advance_status(MessageStatus::Delivered));
        assert_eq!(msg.status, MessageStatus::Delivered);

        // Regression is rejected
        assert!(!msg.advance_status(MessageStatus::Sent));
        assert_eq!(msg.status, MessageStatus::Delivered);

        // Repeat advance to the same status is a no-op
        assert!(!msg.advance_status(MessageStatus::Delivered));
    }

    #[test]
    fn test_inbound_arrives_delivered() {
        let msg = Message::inbound(MessageId::new(2), "hey", Timestamp::new(5));
        assert_eq!(msg.sender, Sender::Them);
        assert_eq!(msg.status, MessageStatus::Delivered);
    }
}
