//! Serial link to a Powercore EDM pulse generator: telemetry parsing, setpoint
//! commands and the poll loop that ties them to a port.

pub mod command;
pub mod connection;
pub mod error;
pub mod monitor;
pub mod telemetry;

pub use command::Setpoint;
pub use connection::{list_ports, open_port, DEFAULT_BAUD_RATE};
pub use error::TelemetryError;
pub use monitor::{run_monitor, send_and_confirm, MonitorEvent, MonitorSettings};
pub use telemetry::{parse_telemetry_line, PowercoreStatus, TelemetryField, TelemetryFrame};
