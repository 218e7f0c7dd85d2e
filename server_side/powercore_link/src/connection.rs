use std::time::Duration;

use anyhow::Context;
use tokio::io::{split, ReadHalf, WriteHalf};
use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::debug;

pub const DEFAULT_BAUD_RATE: u32 = 115200;
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Device names of the serial ports present on this machine.
pub fn list_ports() -> anyhow::Result<Vec<String>> {
    let ports = tokio_serial::available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports.into_iter().map(|port| port.port_name).collect())
}

pub fn open_port(path: &str, baud_rate: u32) -> anyhow::Result<(ReadHalf<SerialStream>, WriteHalf<SerialStream>)> {
    let mut port = tokio_serial::new(path, baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .open_native_async()
        .with_context(|| format!("Cannot connect to {}", path))?;
    port.write_data_terminal_ready(true).with_context(|| format!("Cannot connect to {}", path))?;
    debug!(path, baud_rate, "opened serial port");
    Ok(split(port))
}
