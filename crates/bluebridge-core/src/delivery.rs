//! Delivery simulation for outbound messages
//!
//! Stands in for a real transport acknowledgment protocol: every outbound
//! message gets a fixed-delay delivered-status update and a randomly delayed
//! auto-reply drawn from a fixed pool. Randomness is injected so tests can
//! seed it.

use core::time::Duration;
use rand::Rng;

use crate::timer::{TimerEvent, TimerRequest};
use crate::types::{Epoch, MessageId};

// ----------------------------------------------------------------------------
// Delivery Simulator
// ----------------------------------------------------------------------------

/// Schedules the status progression and simulated reply for outbound messages
#[derive(Debug)]
pub struct DeliverySimulator<R: Rng> {
    delivered_delay: Duration,
    reply_delay_min: Duration,
    reply_delay_max: Duration,
    reply_pool: Vec<String>,
    rng: R,
}

impl<R: Rng> DeliverySimulator<R> {
    pub fn new(
        delivered_delay: Duration,
        reply_delay_min: Duration,
        reply_delay_max: Duration,
        reply_pool: Vec<String>,
        rng: R,
    ) -> Self {
        Self {
            delivered_delay,
            reply_delay_min,
            reply_delay_max,
            reply_pool,
            rng,
        }
    }

    /// React to an outbound message being appended to the log
    ///
    /// Returns two timers scoped to the current session epoch: the fixed
    /// sent → delivered update for `message_id`, and an inbound reply at a
    /// uniformly random delay in `[reply_delay_min, reply_delay_max)` with
    /// text picked uniformly from the reply pool.
    pub fn on_outbound(&mut self, message_id: MessageId, epoch: Epoch) -> Vec<TimerRequest> {
        let reply_millis = self.rng.gen_range(
            self.reply_delay_min.as_millis() as u64..self.reply_delay_max.as_millis() as u64,
        );
        let reply_index = self.rng.gen_range(0..self.reply_pool.len());

        vec![
            TimerRequest::new(
                self.delivered_delay,
                TimerEvent::MarkDelivered { message_id, epoch },
            ),
            TimerRequest::new(
                Duration::from_millis(reply_millis),
                TimerEvent::InboundReply {
                    text: self.reply_pool[reply_index].clone(),
                    epoch,
                },
            ),
        ]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
