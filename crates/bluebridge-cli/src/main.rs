//! BlueBridge CLI — interactive front end for the simulated chat

mod render;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use bluebridge_core::{DeviceId, SimulatorConfig, Snapshot};
use bluebridge_runtime::BridgeRuntime;

#[derive(Parser)]
#[command(name = "bluebridge", version, about = "Simulated peer-to-peer chat")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Start a scan immediately on launch
    #[arg(long)]
    scan: bool,
}

#[tokio::main]
async fn main() -> bluebridge_runtime::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let runtime = BridgeRuntime::spawn(SimulatorConfig::default())?;
    let handle = runtime.handle();

    // Render snapshot changes in the background.
    let mut snapshots = handle.subscribe();
    let renderer = tokio::spawn(async move {
        let mut previous = snapshots.borrow().clone();
        while snapshots.changed().await.is_ok() {
            let current = snapshots.borrow().clone();
            render::render_transition(&previous, &current);
            previous = current;
        }
    });

    if cli.scan {
        handle.start_scan().await?;
    }

    println!("BlueBridge ready. Commands: scan, devices, connect <id>, send <text>, disconnect, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if !dispatch(&handle, line.trim()).await? {
            break;
        }
    }

    runtime.shutdown().await?;
    renderer.abort();
    Ok(())
}

/// Apply one input line; returns false when the user quits
async fn dispatch(
    handle: &bluebridge_runtime::BridgeHandle,
    line: &str,
) -> bluebridge_runtime::Result<bool> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "scan" => handle.start_scan().await?,
        "devices" => render::render_device_list(&handle.snapshot()),
        "connect" => {
            if rest.is_empty() {
                println!("usage: connect <device-id>");
            } else {
                handle.select_device(DeviceId::new(rest)).await?;
            }
        }
        "send" => {
            if rest.is_empty() {
                println!("usage: send <text>");
            } else {
                handle.send_message(rest).await?;
            }
        }
        "disconnect" => handle.disconnect().await?,
        "status" => render_status(&handle.snapshot()),
        "quit" | "exit" => return Ok(false),
        other => {
            debug!(command = other, "unknown command");
            println!("unknown command: {}", other);
        }
    }
    Ok(true)
}

fn render_status(snapshot: &Snapshot) {
    match &snapshot.connected_device {
        Some(device) => println!(
            "{} — {} ({} message(s))",
            snapshot.app_state,
            device.name,
            snapshot.messages.len()
        ),
        None => println!(
            "{} — {} device(s) discovered{}",
            snapshot.app_state,
            snapshot.discovered_devices.len(),
            if snapshot.scanning { ", scanning" } else { "" }
        ),
    }
}

fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
