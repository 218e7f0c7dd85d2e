use std::{io, time::Duration};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use powercore_link::{
    connection::READ_TIMEOUT, list_ports, open_port, run_monitor, send_and_confirm, MonitorEvent, MonitorSettings,
    Setpoint, DEFAULT_BAUD_RATE,
};
use tokio::{io::{stdin, AsyncBufReadExt, BufReader}, sync::mpsc};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Talk to a Powercore EDM pulse board over serial.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the serial ports on this machine.
    ListPorts,
    /// Print telemetry as it arrives. Setpoints typed on stdin (`pwm_frequency=1500`) are sent to the board.
    Monitor {
        #[arg(short, long)]
        port: String,
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
        poll_ms: u64,
        /// One JSON object per event instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Send one setpoint and wait for the board to confirm it.
    Send {
        #[arg(short, long)]
        port: String,
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
        /// Pulse frequency in Hz.
        #[arg(long, conflicts_with = "max_charge", required_unless_present = "max_charge")]
        pulse_frequency: Option<u32>,
        /// Maximum charge per pulse in uC.
        #[arg(long)]
        max_charge: Option<u32>,
    },
}

fn print_event(event: &MonitorEvent, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event).context("Failed to serialize event")?);
        return Ok(());
    }
    match event {
        MonitorEvent::Status(status) => println!("[{}] {}", Local::now().format("%H:%M:%S"), status),
        MonitorEvent::Message { at, text } => println!("[{}] {}", at.format("%H:%M:%S"), text),
    }
    Ok(())
}

async fn forward_stdin(setpoints: mpsc::Sender<Setpoint>) {
    let mut lines = BufReader::new(stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Setpoint>() {
            Ok(setpoint) => {
                if setpoints.send(setpoint).await.is_err() {
                    return;
                }
            }
            Err(err) => warn!(%err, "ignoring input line"),
        }
    }
}

async fn monitor(port: &str, baud: u32, poll_ms: u64, json: bool) -> anyhow::Result<()> {
    let (reader, writer) = open_port(port, baud)?;
    info!(port, baud, "monitoring");
    let settings = MonitorSettings { poll_interval: Duration::from_millis(poll_ms), ..Default::default() };
    let (setpoint_tx, setpoint_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(64);
    tokio::spawn(forward_stdin(setpoint_tx));
    let monitor = tokio::spawn(run_monitor(reader, writer, settings, setpoint_rx, event_tx));
    while let Some(event) = event_rx.recv().await {
        print_event(&event, json)?;
    }
    monitor.await.context("Monitor task failed")??;
    Ok(())
}

async fn send(port: &str, baud: u32, setpoint: Setpoint) -> anyhow::Result<()> {
    let (reader, writer) = open_port(port, baud)?;
    match send_and_confirm(reader, writer, setpoint, READ_TIMEOUT).await? {
        Some(reply) => println!("{}", reply),
        None => warn!(%setpoint, "no confirmation from the board"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match args.command {
        Command::ListPorts => {
            for port in list_ports()? {
                println!("{}", port);
            }
            Ok(())
        }
        Command::Monitor { port, baud, poll_ms, json } => monitor(&port, baud, poll_ms, json).await,
        Command::Send { port, baud, pulse_frequency, max_charge } => {
            let setpoint = match (pulse_frequency, max_charge) {
                (Some(frequency), _) => Setpoint::PulseFrequency(frequency),
                (None, Some(charge)) => Setpoint::MaxChargePerPulse(charge),
                (None, None) => anyhow::bail!("Nothing to send"),
            };
            send(&port, baud, setpoint).await
        }
    }
}
