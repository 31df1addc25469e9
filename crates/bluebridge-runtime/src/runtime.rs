//! Tokio event loop owning the session state machine
//!
//! All mutation happens inside one task: commands arrive over an mpsc
//! channel, timer requests are fulfilled by spawned sleeps that send their
//! event back into the same loop, and a fresh snapshot is published over a
//! watch channel after every mutation. Timer/command interleaving is
//! arbitrary; staleness is decided by epoch inside the core at fire time, so
//! the loop never tracks or cancels timer handles.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use bluebridge_core::{
    Command, SessionController, SimulatorConfig, Snapshot, SystemTimeSource, TimerEvent,
    TimerRequest,
};

use crate::error::{Result, RuntimeError};

const COMMAND_CHANNEL_CAPACITY: usize = 64;

// ----------------------------------------------------------------------------
// Bridge Runtime
// ----------------------------------------------------------------------------

/// Spawns and owns the event loop task
pub struct BridgeRuntime {
    task: JoinHandle<()>,
    handle: BridgeHandle,
}

impl BridgeRuntime {
    /// Spawn the event loop with the given configuration
    ///
    /// Fails only if the configuration does not validate.
    pub fn spawn(config: SimulatorConfig) -> Result<Self> {
        let controller =
            SessionController::new(config, SystemTimeSource::new(), StdRng::from_entropy())?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let task = tokio::spawn(run_loop(controller, command_rx, snapshot_tx));
        info!("bridge runtime started");

        Ok(Self {
            task,
            handle: BridgeHandle {
                commands: command_tx,
                snapshots: snapshot_rx,
            },
        })
    }

    /// Get a client handle for sending intents and watching snapshots
    pub fn handle(&self) -> BridgeHandle {
        self.handle.clone()
    }

    /// Request shutdown and wait for the loop to drain
    pub async fn shutdown(self) -> Result<()> {
        // The loop exits on Shutdown or when every sender is gone; either
        // way the join below observes it.
        let _ = self.handle.commands.send(Command::Shutdown).await;
        self.task.await.map_err(|_| RuntimeError::ChannelClosed)?;
        info!("bridge runtime stopped");
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Bridge Handle
// ----------------------------------------------------------------------------

/// Client handle: async intent methods plus snapshot subscription
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl BridgeHandle {
    /// Begin a new scan
    pub async fn start_scan(&self) -> Result<()> {
        self.send(Command::StartScan).await
    }

    /// Begin connecting to a discovered device
    pub async fn select_device(&self, device_id: bluebridge_core::DeviceId) -> Result<()> {
        self.send(Command::SelectDevice { device_id }).await
    }

    /// Send an outbound chat message
    pub async fn send_message(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::SendMessage { text: text.into() }).await
    }

    /// Reset to discovery
    pub async fn disconnect(&self) -> Result<()> {
        self.send(Command::Disconnect).await
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

// ----------------------------------------------------------------------------
// Event Loop
// ----------------------------------------------------------------------------

async fn run_loop(
    mut controller: SessionController<SystemTimeSource, StdRng>,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
) {
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    None | Some(Command::Shutdown) => {
                        debug!("event loop shutting down");
                        break;
                    }
                    Some(command) => {
                        let timers = controller.handle_command(command);
                        schedule_timers(timers, &timer_tx);
                        let _ = snapshots.send(controller.snapshot());
                    }
                }
            }
            Some(event) = timer_rx.recv() => {
                controller.handle_timer(event);
                let _ = snapshots.send(controller.snapshot());
            }
        }
    }
}

/// Fulfill timer requests with spawned sleeps feeding back into the loop
fn schedule_timers(timers: Vec<TimerRequest>, timer_tx: &mpsc::UnboundedSender<TimerEvent>) {
    for request in timers {
        let timer_tx = timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(request.delay).await;
            // The loop may already be gone on shutdown; nothing to deliver to.
            let _ = timer_tx.send(request.event);
        });
    }
}
