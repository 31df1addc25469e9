//! Snapshot diffing and terminal output
//!
//! The CLI is a passive rendering collaborator: it watches snapshots and
//! prints what changed. No state machine logic lives here.

use bluebridge_core::{AppState, Device, Message, Sender, Snapshot};

/// Print the user-visible difference between two consecutive snapshots
pub fn render_transition(previous: &Snapshot, current: &Snapshot) {
    if current.scanning && !previous.scanning {
        println!("Scanning for nearby devices...");
    }

    for device in newly_revealed(previous, current) {
        println!(
            "  found {} (signal: {}, {})",
            device.name,
            device.distance.signal_strength(),
            bars(device)
        );
    }

    if !current.scanning && previous.scanning {
        println!(
            "Scan finished: {} device(s) found",
            current.discovered_devices.len()
        );
    }

    if current.app_state != previous.app_state {
        match current.app_state {
            AppState::Connecting => {
                if let Some(device) = &current.connected_device {
                    println!("Connecting to {}...", device.name);
                }
            }
            AppState::Connected => {
                if let Some(device) = &current.connected_device {
                    println!("Connected to {}", device.name);
                }
            }
            AppState::Discovery => println!("Disconnected"),
        }
    }

    for message in new_or_updated_messages(previous, current) {
        render_message(message);
    }
}

/// List the devices for a `devices` command
pub fn render_device_list(snapshot: &Snapshot) {
    if snapshot.discovered_devices.is_empty() {
        println!("No devices found yet. Try `scan`.");
        return;
    }
    for device in &snapshot.discovered_devices {
        println!(
            "  [{}] {} — signal {} {}",
            device.id,
            device.name,
            device.distance.signal_strength(),
            bars(device)
        );
    }
}

fn render_message(message: &Message) {
    match message.sender {
        Sender::Me => println!("  you: {} ({})", message.text, message.status),
        Sender::Them => println!("  them: {}", message.text),
    }
}

fn bars(device: &Device) -> String {
    let filled = device.distance.signal_bars() as usize;
    format!("{}{}", "▮".repeat(filled), "▯".repeat(3 - filled))
}

/// Devices present now that were not in the previous snapshot
///
/// A rescan clears the list, so matching by id alone would miss a device
/// re-revealed in a new scan; `last_seen` disambiguates.
fn newly_revealed<'a>(previous: &Snapshot, current: &'a Snapshot) -> Vec<&'a Device> {
    current
        .discovered_devices
        .iter()
        .filter(|device| {
            !previous
                .discovered_devices
                .iter()
                .any(|d| d.id == device.id && d.last_seen == device.last_seen)
        })
        .collect()
}

/// Messages that are new or whose status changed since the last snapshot
fn new_or_updated_messages<'a>(previous: &Snapshot, current: &'a Snapshot) -> Vec<&'a Message> {
    current
        .messages
        .iter()
        .filter(|message| {
            match previous.messages.iter().find(|m| m.id == message.id) {
                None => true,
                Some(old) => old.status != message.status,
            }
        })
        .collect()
}
