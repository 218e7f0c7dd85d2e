use std::{fmt::{self, Display, Formatter}, str::FromStr};

use crate::error::TelemetryError;

const PULSE_FREQUENCY_KEY: &str = "pwm_frequency";
const MAX_CHARGE_KEY: &str = "micro_c_per_pulse";

/// A value the board accepts over the link. Displays as its wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setpoint {
    /// Target pulse frequency in hertz.
    PulseFrequency(u32),
    /// Micro-coulombs per pulse before the board cuts power.
    MaxChargePerPulse(u32),
}

impl Setpoint {
    pub fn key(&self) -> &'static str {
        match self {
            Setpoint::PulseFrequency(_) => PULSE_FREQUENCY_KEY,
            Setpoint::MaxChargePerPulse(_) => MAX_CHARGE_KEY,
        }
    }
    pub fn value(&self) -> u32 {
        match self {
            Setpoint::PulseFrequency(value) | Setpoint::MaxChargePerPulse(value) => *value,
        }
    }
    /// Start of the message the firmware sends back once it applied the value.
    pub fn confirmation_prefix(&self) -> &'static str {
        match self {
            Setpoint::PulseFrequency(_) => "PWM frequency set to:",
            Setpoint::MaxChargePerPulse(_) => "Max uC per Pulse set to:",
        }
    }
    /// Bytes to write; the firmware takes them without a terminator.
    pub fn to_wire(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl Display for Setpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

impl FromStr for Setpoint {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (key, value) = s.split_once('=').ok_or_else(|| TelemetryError::MissingValue(s.to_string()))?;
        let (key, value) = (key.trim(), value.trim());
        let parse = |value: &str| value.parse::<u32>().map_err(|_| TelemetryError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
        match key {
            PULSE_FREQUENCY_KEY => Ok(Setpoint::PulseFrequency(parse(value)?)),
            MAX_CHARGE_KEY => Ok(Setpoint::MaxChargePerPulse(parse(value)?)),
            _ => Err(TelemetryError::UnknownSetpoint(key.to_string())),
        }
    }
}
