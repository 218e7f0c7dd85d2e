use std::{io, time::Duration};

use anyhow::Context;
use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines},
    select,
    sync::mpsc,
    time::{interval, timeout, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    command::Setpoint,
    connection::READ_TIMEOUT,
    telemetry::{parse_telemetry_line, PowercoreStatus},
};

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    /// How long one poll waits for a line.
    pub read_timeout: Duration,
}
impl Default for MonitorSettings {
    fn default() -> Self {
        MonitorSettings {
            poll_interval: Duration::from_millis(100),
            read_timeout: READ_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MonitorEvent {
    /// The readouts after a line that carried any.
    Status(PowercoreStatus),
    Message { at: DateTime<Local>, text: String },
}

enum ReadOutcome {
    Line(String),
    Idle,
    Closed,
}

async fn read_line<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, wait: Duration) -> anyhow::Result<ReadOutcome> {
    match timeout(wait, lines.next_line()).await {
        Err(_) => Ok(ReadOutcome::Idle),
        Ok(Ok(Some(line))) => Ok(ReadOutcome::Line(line)),
        Ok(Ok(None)) => Ok(ReadOutcome::Closed),
        Ok(Err(err)) if matches!(err.kind(), io::ErrorKind::InvalidData | io::ErrorKind::TimedOut) => {
            warn!(%err, "unreadable data from device");
            Ok(ReadOutcome::Idle)
        }
        Ok(Err(err)) => Err(err).context("Failed to read from device"),
    }
}

/// Folds one received line into `status`, returning what should be reported.
pub fn interpret_line(status: &mut PowercoreStatus, line: &str) -> Vec<MonitorEvent> {
    let frame = match parse_telemetry_line(line) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(line, %err, "skipping telemetry line");
            return Vec::new();
        }
    };
    let mut events = Vec::new();
    if status.apply(&frame) {
        events.push(MonitorEvent::Status(status.clone()));
    }
    if let Some(text) = frame.message().filter(|text| !text.is_empty()) {
        events.push(MonitorEvent::Message { at: Local::now(), text: text.to_string() });
    }
    events
}

pub async fn send_setpoint<W: AsyncWrite + Unpin>(writer: &mut W, setpoint: Setpoint) -> anyhow::Result<()> {
    writer.write_all(&setpoint.to_wire()).await.with_context(|| format!("Failed to send {}", setpoint))?;
    writer.flush().await.with_context(|| format!("Failed to send {}", setpoint))?;
    info!(%setpoint, "sent setpoint");
    Ok(())
}

/// Polls the device for telemetry and forwards setpoints until the stream ends or
/// nobody listens to `events` anymore. Returns the last known status.
pub async fn run_monitor<R, W>(
    reader: R,
    mut writer: W,
    settings: MonitorSettings,
    mut setpoints: mpsc::Receiver<Setpoint>,
    events: mpsc::Sender<MonitorEvent>,
) -> anyhow::Result<PowercoreStatus>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if settings.poll_interval.is_zero() {
        anyhow::bail!("Poll interval must be non-zero");
    }
    let mut lines = BufReader::new(reader).lines();
    let mut status = PowercoreStatus::default();
    let mut poll = interval(settings.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut setpoints_open = true;
    loop {
        select! {
            setpoint = setpoints.recv(), if setpoints_open => match setpoint {
                Some(setpoint) => send_setpoint(&mut writer, setpoint).await?,
                None => {
                    debug!("setpoint channel closed");
                    setpoints_open = false;
                }
            },
            _ = poll.tick() => {
                let line = match read_line(&mut lines, settings.read_timeout).await? {
                    ReadOutcome::Line(line) => line,
                    ReadOutcome::Idle => continue,
                    ReadOutcome::Closed => {
                        info!("device closed the connection");
                        return Ok(status);
                    }
                };
                debug!(line = %line, "received");
                for event in interpret_line(&mut status, &line) {
                    if events.send(event).await.is_err() {
                        return Ok(status);
                    }
                }
            }
        }
    }
}

/// Writes `setpoint` and waits up to `wait` for the firmware's confirmation message.
/// Other messages arriving meanwhile are logged and passed over.
pub async fn send_and_confirm<R, W>(reader: R, mut writer: W, setpoint: Setpoint, wait: Duration) -> anyhow::Result<Option<String>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut status = PowercoreStatus::default();
    send_setpoint(&mut writer, setpoint).await?;
    let deadline = Instant::now() + wait;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        let line = match read_line(&mut lines, remaining).await? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Idle => continue,
            ReadOutcome::Closed => return Ok(None),
        };
        for event in interpret_line(&mut status, &line) {
            if let MonitorEvent::Message { text, .. } = event {
                if text.starts_with(setpoint.confirmation_prefix()) {
                    return Ok(Some(text));
                }
                warn!(text = %text, "board message while waiting for confirmation");
            }
        }
    }
}
