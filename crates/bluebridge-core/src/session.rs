//! Top-level session state machine
//!
//! The [`SessionController`] owns the application state (discovery →
//! connecting → connected), the connected device, and the message log, and
//! composes the [`DiscoveryEngine`] and [`DeliverySimulator`]. It is pure
//! with respect to time: intents and timer firings mutate it, and every wait
//! comes back to the caller as a [`TimerRequest`].
//!
//! Invalid intents (selecting a device while already connecting, sending
//! while not connected, sending whitespace) are logged no-ops, never errors.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::channel::{Command, Snapshot};
use crate::config::SimulatorConfig;
use crate::delivery::DeliverySimulator;
use crate::device::Device;
use crate::discovery::DiscoveryEngine;
use crate::errors::Result;
use crate::message::{Message, MessageStatus};
use crate::timer::{TimerEvent, TimerRequest};
use crate::types::{DeviceId, Epoch, MessageId, TimeSource};

use core::fmt;
use core::time::Duration;

// ----------------------------------------------------------------------------
// Application State
// ----------------------------------------------------------------------------

/// Top-level application state; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Discovery,
    Connecting,
    Connected,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppState::Discovery => write!(f, "discovery"),
            AppState::Connecting => write!(f, "connecting"),
            AppState::Connected => write!(f, "connected"),
        }
    }
}

// ----------------------------------------------------------------------------
// Session Controller
// ----------------------------------------------------------------------------

/// Owns the session lifecycle, the connected device, and the message log
pub struct SessionController<T: TimeSource, R: Rng> {
    time_source: T,
    discovery: DiscoveryEngine,
    delivery: DeliverySimulator<R>,
    connect_delay: Duration,
    app_state: AppState,
    connected_device: Option<Device>,
    messages: Vec<Message>,
    session_epoch: Epoch,
    last_message_id: u64,
}

impl<T: TimeSource, R: Rng> SessionController<T, R> {
    /// Create a controller from a validated configuration
    pub fn new(config: SimulatorConfig, time_source: T, rng: R) -> Result<Self> {
        config.validate()?;
        let discovery = DiscoveryEngine::new(
            config.device_catalog,
            config.reveal_interval,
            config.scan_duration,
        );
        let delivery = DeliverySimulator::new(
            config.delivered_delay,
            config.reply_delay_min,
            config.reply_delay_max,
            config.reply_pool,
            rng,
        );
        Ok(Self {
            time_source,
            discovery,
            delivery,
            connect_delay: config.connect_delay,
            app_state: AppState::Discovery,
            connected_device: None,
            messages: Vec::new(),
            session_epoch: Epoch::ZERO,
            last_message_id: 0,
        })
    }

    // ------------------------------------------------------------------
    // Read-only surface
    // ------------------------------------------------------------------

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn connected_device(&self) -> Option<&Device> {
        self.connected_device.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn discovered_devices(&self) -> &[Device] {
        self.discovery.devices()
    }

    pub fn is_scanning(&self) -> bool {
        self.discovery.is_scanning()
    }

    /// Owned snapshot of the full state, for the rendering collaborator
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            app_state: self.app_state,
            connected_device: self.connected_device.clone(),
            messages: self.messages.clone(),
            discovered_devices: self.discovery.devices().to_vec(),
            scanning: self.discovery.is_scanning(),
        }
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Dispatch a command from the embedding layer
    ///
    /// `Shutdown` is handled by the owning loop, not here; it falls through
    /// as a no-op.
    pub fn handle_command(&mut self, command: Command) -> Vec<TimerRequest> {
        match command {
            Command::StartScan => self.start_scan(),
            Command::SelectDevice { device_id } => self.select_device(&device_id),
            Command::SendMessage { text } => self.send_message(&text),
            Command::Disconnect => {
                self.disconnect();
                Vec::new()
            }
            Command::Shutdown => Vec::new(),
        }
    }

    /// Start a new scan; valid in any state
    pub fn start_scan(&mut self) -> Vec<TimerRequest> {
        self.discovery.start_scan()
    }

    /// Begin connecting to a discovered device
    ///
    /// Only valid from discovery; a select while connecting or connected is
    /// rejected as a logged no-op. Unknown device ids are ignored the same
    /// way.
    pub fn select_device(&mut self, device_id: &DeviceId) -> Vec<TimerRequest> {
        if self.app_state != AppState::Discovery {
            debug!(state = %self.app_state, %device_id, "ignoring select while not in discovery");
            return Vec::new();
        }
        let Some(device) = self.discovery.find_device(device_id).cloned() else {
            debug!(%device_id, "ignoring select of unknown device");
            return Vec::new();
        };

        self.session_epoch = self.session_epoch.next();
        info!(device = %device.name, "connecting");
        self.connected_device = Some(device);
        self.app_state = AppState::Connecting;

        vec![TimerRequest::new(
            self.connect_delay,
            TimerEvent::ConnectionReady {
                epoch: self.session_epoch,
            },
        )]
    }

    /// Append an outbound message and schedule its delivery simulation
    ///
    /// A no-op unless connected and the text is non-empty after trimming.
    pub fn send_message(&mut self, text: &str) -> Vec<TimerRequest> {
        if self.app_state != AppState::Connected {
            debug!(state = %self.app_state, "ignoring send while not connected");
            return Vec::new();
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("ignoring whitespace-only message");
            return Vec::new();
        }

        let id = self.next_message_id();
        let now = self.time_source.now();
        self.messages.push(Message::outbound(id, trimmed, now));
        debug!(message_id = %id, "outbound message appended");

        self.delivery.on_outbound(id, self.session_epoch)
    }

    /// Reset to discovery; valid from any state
    ///
    /// Bumps the session epoch so every pending session-scoped timer (the
    /// connect handshake, delivered updates, replies) discards itself on
    /// fire instead of mutating the cleared state.
    pub fn disconnect(&mut self) {
        info!(state = %self.app_state, "disconnecting");
        self.session_epoch = self.session_epoch.next();
        self.connected_device = None;
        self.app_state = AppState::Discovery;
        self.messages.clear();
    }

    // ------------------------------------------------------------------
    // Timer firings
    // ------------------------------------------------------------------

    /// Apply a fired timer, discarding it if its epoch is stale
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::RevealDevice { index, epoch } => {
                let now = self.time_source.now();
                self.discovery.handle_reveal(index, epoch, now);
            }
            TimerEvent::ScanFinished { epoch } => {
                self.discovery.handle_finished(epoch);
            }
            TimerEvent::ConnectionReady { epoch } => self.on_connection_ready(epoch),
            TimerEvent::MarkDelivered { message_id, epoch } => {
                self.on_mark_delivered(message_id, epoch)
            }
            TimerEvent::InboundReply { text, epoch } => self.on_inbound_reply(text, epoch),
        }
    }

    fn on_connection_ready(&mut self, epoch: Epoch) {
        if epoch != self.session_epoch {
            debug!(%epoch, current = %self.session_epoch, "discarding stale connection timer");
            return;
        }
        if self.app_state != AppState::Connecting {
            debug!(state = %self.app_state, "connection timer fired outside connecting");
            return;
        }
        self.app_state = AppState::Connected;
        if let Some(device) = &self.connected_device {
            info!(device = %device.name, "connected");
        }
    }

    fn on_mark_delivered(&mut self, message_id: MessageId, epoch: Epoch) {
        if epoch != self.session_epoch {
            debug!(%epoch, current = %self.session_epoch, "discarding stale delivery update");
            return;
        }
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                if message.advance_status(MessageStatus::Delivered) {
                    debug!(%message_id, "message delivered");
                }
            }
            None => debug!(%message_id, "delivery update for unknown message"),
        }
    }

    fn on_inbound_reply(&mut self, text: String, epoch: Epoch) {
        if epoch != self.session_epoch {
            debug!(%epoch, current = %self.session_epoch, "discarding stale reply");
            return;
        }
        if self.app_state != AppState::Connected {
            debug!(state = %self.app_state, "discarding reply outside connected state");
            return;
        }
        let id = self.next_message_id();
        let now = self.time_source.now();
        self.messages.push(Message::inbound(id, text, now));
        debug!(message_id = %id, "inbound reply appended");
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Allocate a message id from the clock, strictly monotonic even when
    /// two allocations land in the same millisecond
    fn next_message_id(&mut self) -> MessageId {
        let millis = self.time_source.now().as_millis();
        self.last_message_id = millis.max(self.last_message_id + 1);
        MessageId::new(self.last_message_id)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Mock clock with a shared handle, same shape as the integration suite's
    #[derive(Debug, Clone, Default)]
    struct MockClock(Arc<AtomicU64>);

    impl MockClock {
        fn advance(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl TimeSource for MockClock {
        fn now(&self) -> crate::types::Timestamp {
            crate::types::Timestamp::new(self.0.load(Ordering::SeqCst))
        }
    }

    fn controller() -> (SessionController<MockClock, ChaCha8Rng>, MockClock) {
        let clock = MockClock::default();
        let controller = SessionController::new(
            SimulatorConfig::default(),
            clock.clone(),
            ChaCha8Rng::from_seed([42u8; 32]),
        )
        .unwrap();
        (controller, clock)
    }

    /// Scan and reveal the full catalog so selects have something to target
    fn populate_devices(controller: &mut SessionController<MockClock, ChaCha8Rng>) -> Vec<Device> {
        let timers = controller.start_scan();
        for request in &timers {
            controller.handle_timer(request.event.clone());
        }
        controller.discovered_devices().to_vec()
    }

    fn connect_first_device(
        controller: &mut SessionController<MockClock, ChaCha8Rng>,
    ) -> Device {
        let devices = populate_devices(controller);
        let device = devices[0].clone();
        let timers = controller.select_device(&device.id);
        controller.handle_timer(timers[0].event.clone());
        assert_eq!(controller.app_state(), AppState::Connected);
        device
    }

    #[test]
    fn test_initial_state() {
        let (controller, _) = controller();
        assert_eq!(controller.app_state(), AppState::Discovery);
        assert!(controller.connected_device().is_none());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_select_then_timer_connects() {
        let (mut controller, _) = controller();
        let devices = populate_devices(&mut controller);
        let device = devices[0].clone();

        let timers = controller.select_device(&device.id);
        assert_eq!(controller.app_state(), AppState::Connecting);
        assert_eq!(controller.connected_device().unwrap().id, device.id);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].delay, Duration::from_millis(2_000));

        controller.handle_timer(timers[0].event.clone());
        assert_eq!(controller.app_state(), AppState::Connected);
    }

    #[test]
    fn test_select_rejected_outside_discovery() {
        let (mut controller, _) = controller();
        let devices = populate_devices(&mut controller);

        controller.select_device(&devices[0].id);
        assert_eq!(controller.app_state(), AppState::Connecting);

        // Re-entrant select while connecting is a no-op
        let timers = controller.select_device(&devices[1].id);
        assert!(timers.is_empty());
        assert_eq!(controller.connected_device().unwrap().id, devices[0].id);
    }

    #[test]
    fn test_select_unknown_device_ignored() {
        let (mut controller, _) = controller();
        populate_devices(&mut controller);
        let timers = controller.select_device(&DeviceId::new("nope"));
        assert!(timers.is_empty());
        assert_eq!(controller.app_state(), AppState::Discovery);
    }

    #[test]
    fn test_send_message_appends_and_schedules() {
        let (mut controller, _) = controller();
        connect_first_device(&mut controller);

        let timers = controller.send_message("  hi there  ");
        assert_eq!(controller.messages().len(), 1);
        let message = &controller.messages()[0];
        assert_eq!(message.text, "hi there");
        assert_eq!(message.sender, crate::message::Sender::Me);
        assert_eq!(message.status, MessageStatus::Sent);

        // Delivered update plus reply
        assert_eq!(timers.len(), 2);
        controller.handle_timer(timers[0].event.clone());
        assert_eq!(controller.messages()[0].status, MessageStatus::Delivered);
    }

    #[test]
    fn test_send_rejected_when_not_connected() {
        let (mut controller, _) = controller();
        assert!(controller.send_message("hello").is_empty());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_whitespace_send_is_noop() {
        let (mut controller, _) = controller();
        connect_first_device(&mut controller);
        assert!(controller.send_message("   \t\n").is_empty());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_disconnect_resets_and_invalidates_timers() {
        let (mut controller, _) = controller();
        connect_first_device(&mut controller);
        let timers = controller.send_message("hi");

        controller.disconnect();
        assert_eq!(controller.app_state(), AppState::Discovery);
        assert!(controller.connected_device().is_none());
        assert!(controller.messages().is_empty());

        // Pending delivery and reply timers fire into the new epoch and are
        // discarded without mutating the cleared log.
        for request in timers {
            controller.handle_timer(request.event);
        }
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_stale_connect_timer_after_disconnect() {
        let (mut controller, _) = controller();
        let devices = populate_devices(&mut controller);
        let timers = controller.select_device(&devices[0].id);

        controller.disconnect();
        controller.handle_timer(timers[0].event.clone());
        assert_eq!(controller.app_state(), AppState::Discovery);
        assert!(controller.connected_device().is_none());
    }

    #[test]
    fn test_inbound_reply_appends_when_connected() {
        let (mut controller, _) = controller();
        connect_first_device(&mut controller);
        let timers = controller.send_message("hi");

        // Fire delivered then reply
        controller.handle_timer(timers[0].event.clone());
        controller.handle_timer(timers[1].event.clone());

        assert_eq!(controller.messages().len(), 2);
        let reply = &controller.messages()[1];
        assert_eq!(reply.sender, crate::message::Sender::Them);
        assert_eq!(reply.status, MessageStatus::Delivered);
        assert!(!reply.text.is_empty());
    }

    #[test]
    fn test_message_ids_monotonic_within_one_millisecond() {
        let (mut controller, clock) = controller();
        connect_first_device(&mut controller);

        // Clock does not move between sends
        controller.send_message("one");
        controller.send_message("two");
        clock.advance(1);
        controller.send_message("three");

        let ids: Vec<_> = controller.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_device_presence_matches_state() {
        let (mut controller, _) = controller();
        assert!(controller.connected_device().is_none());

        let devices = populate_devices(&mut controller);
        let timers = controller.select_device(&devices[0].id);
        assert!(controller.connected_device().is_some());

        controller.handle_timer(timers[0].event.clone());
        assert!(controller.connected_device().is_some());

        controller.disconnect();
        assert!(controller.connected_device().is_none());
    }
}
