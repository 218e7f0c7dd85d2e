use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("unknown setpoint {0:?}")]
    UnknownSetpoint(String),
    #[error("setpoint {0:?} has no value")]
    MissingValue(String),
}
