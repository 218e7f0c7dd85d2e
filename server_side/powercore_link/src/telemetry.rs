use std::fmt::{self, Display, Formatter};

use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::char,
    combinator::{all_consuming, map, map_parser, rest},
    multi::separated_list0,
    sequence::separated_pair,
    IResult,
};
use serde::Serialize;

use crate::error::TelemetryError;

pub const SPARK_PERCENT: &str = "spark%";
pub const SHORT_PERCENT: &str = "short%";
pub const AVERAGE_POWER: &str = "avgPower";
pub const AVERAGE_CHARGE: &str = "avgCharge";
pub const PULSE_FREQUENCY: &str = "pulseFreq";
pub const MAX_CHARGE: &str = "maxCoulomb";
pub const MOSFET_TEMPERATURE: &str = "mosfetTemp";
pub const RESISTOR_TEMPERATURE: &str = "resistorTemp";
pub const MESSAGE: &str = "message";

#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryField {
    SparkPercent(u32),
    ShortPercent(u32),
    /// Watts.
    AveragePower(f64),
    /// Micro-coulombs per spark.
    AverageCharge(f64),
    /// Hertz.
    PulseFrequency(u32),
    /// Micro-coulombs per pulse before the board drops to low power.
    MaxCharge(f64),
    /// Degrees Celsius.
    MosfetTemperature(f64),
    ResistorTemperature(f64),
    Message(String),
}
impl TelemetryField {
    fn is_readout(&self) -> bool {
        !matches!(self, TelemetryField::Message(_))
    }
}

/// Everything recognised on one telemetry line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetryFrame {
    pub fields: Vec<TelemetryField>,
}
impl TelemetryFrame {
    pub fn has_readouts(&self) -> bool {
        self.fields.iter().any(TelemetryField::is_readout)
    }
    pub fn message(&self) -> Option<&str> {
        self.fields.iter().rev().find_map(|field| match field {
            TelemetryField::Message(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

// An item without '=' is kept as None and ignored later.
fn item(input: &str) -> IResult<&str, Option<(&str, &str)>> {
    alt((
        map(separated_pair(take_till(|c: char| c == '='), char('='), rest), Some),
        map(rest, |_| None),
    ))(input)
}
fn items(input: &str) -> IResult<&str, Vec<Option<(&str, &str)>>> {
    all_consuming(separated_list0(char(','), map_parser(take_till(|c: char| c == ','), item)))(input)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, TelemetryError> {
    value.parse::<T>().map_err(|_| TelemetryError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
fn parse_field(key: &str, value: &str) -> Result<Option<TelemetryField>, TelemetryError> {
    let field = match key {
        SPARK_PERCENT => TelemetryField::SparkPercent(parse_value(key, value)?),
        SHORT_PERCENT => TelemetryField::ShortPercent(parse_value(key, value)?),
        AVERAGE_POWER => TelemetryField::AveragePower(parse_value(key, value)?),
        AVERAGE_CHARGE => TelemetryField::AverageCharge(parse_value(key, value)?),
        PULSE_FREQUENCY => TelemetryField::PulseFrequency(parse_value(key, value)?),
        MAX_CHARGE => TelemetryField::MaxCharge(parse_value(key, value)?),
        MOSFET_TEMPERATURE => TelemetryField::MosfetTemperature(parse_value(key, value)?),
        RESISTOR_TEMPERATURE => TelemetryField::ResistorTemperature(parse_value(key, value)?),
        MESSAGE => TelemetryField::Message(value.to_string()),
        _ => return Ok(None),
    };
    Ok(Some(field))
}

/// Parses one `key=value,key=value` line. Any bad value rejects the whole line.
pub fn parse_telemetry_line(line: &str) -> Result<TelemetryFrame, TelemetryError> {
    // `items` accepts any input; a bare line is a single item without '='.
    let pairs = items(line.trim()).map(|(_, pairs)| pairs).unwrap_or_default();
    let mut fields = Vec::new();
    for (key, value) in pairs.into_iter().flatten() {
        if let Some(field) = parse_field(key.trim(), value.trim())? {
            fields.push(field);
        }
    }
    Ok(TelemetryFrame { fields })
}

/// Last known readouts of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowercoreStatus {
    pub spark_percent: Option<u32>,
    pub short_percent: Option<u32>,
    pub average_power: Option<f64>,
    pub average_charge: Option<f64>,
    pub pulse_frequency: Option<u32>,
    pub max_charge: Option<f64>,
    pub mosfet_temperature: Option<f64>,
    pub resistor_temperature: Option<f64>,
}
impl Default for PowercoreStatus {
    // Nominal board settings until the first report arrives.
    fn default() -> Self {
        PowercoreStatus {
            spark_percent: None,
            short_percent: None,
            average_power: None,
            average_charge: None,
            pulse_frequency: Some(1500),
            max_charge: Some(1600.0),
            mosfet_temperature: None,
            resistor_temperature: None,
        }
    }
}
impl PowercoreStatus {
    /// Merges the readouts of `frame`; returns whether it carried any.
    pub fn apply(&mut self, frame: &TelemetryFrame) -> bool {
        for field in &frame.fields {
            match field {
                TelemetryField::SparkPercent(value) => self.spark_percent = Some(*value),
                TelemetryField::ShortPercent(value) => self.short_percent = Some(*value),
                TelemetryField::AveragePower(value) => self.average_power = Some(*value),
                TelemetryField::AverageCharge(value) => self.average_charge = Some(*value),
                TelemetryField::PulseFrequency(value) => self.pulse_frequency = Some(*value),
                TelemetryField::MaxCharge(value) => self.max_charge = Some(*value),
                TelemetryField::MosfetTemperature(value) => self.mosfet_temperature = Some(*value),
                TelemetryField::ResistorTemperature(value) => self.resistor_temperature = Some(*value),
                TelemetryField::Message(_) => (),
            }
        }
        frame.has_readouts()
    }
}

struct Reading<T>(Option<T>);
impl<T: Display> Display for Reading<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => {
                // Forward the precision, if any, to the value.
                match f.precision() {
                    Some(precision) => write!(f, "{:.*}", precision, value),
                    None => write!(f, "{}", value),
                }
            }
            None => write!(f, "-"),
        }
    }
}

impl Display for PowercoreStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spark {}% short {}% | power {:.2} W charge {:.2} uC | freq {} Hz max {:.0} uC | MOSFET {:.0} C resistor {:.0} C",
            Reading(self.spark_percent),
            Reading(self.short_percent),
            Reading(self.average_power),
            Reading(self.average_charge),
            Reading(self.pulse_frequency),
            Reading(self.max_charge),
            Reading(self.mosfet_temperature),
            Reading(self.resistor_temperature),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const STATUS_LINE: &str = "spark%=82,short%=4,avgPower=4.32,avgCharge=1200.00,pulseFreq=2000,maxCoulomb=2500,resistorTemp=41,mosfetTemp=36";

    #[test]
    fn test_items() {
        let result = items("a=1,b,c= 2 ,");
        assert_eq!(result, Ok(("", vec![Some(("a", "1")), None, Some(("c", " 2 ")), None])));
    }
    #[test]
    fn test_items_empty() {
        assert_eq!(items(""), Ok(("", vec![None])));
    }
    #[test]
    fn test_item_splits_at_first_equals() {
        assert_eq!(item("message=a=b"), Ok(("", Some(("message", "a=b")))));
    }
    #[test]
    fn test_status_line() {
        let frame = parse_telemetry_line(STATUS_LINE).unwrap();
        assert_eq!(frame.fields, vec![
            TelemetryField::SparkPercent(82),
            TelemetryField::ShortPercent(4),
            TelemetryField::AveragePower(4.32),
            TelemetryField::AverageCharge(1200.0),
            TelemetryField::PulseFrequency(2000),
            TelemetryField::MaxCharge(2500.0),
            TelemetryField::ResistorTemperature(41.0),
            TelemetryField::MosfetTemperature(36.0),
        ]);
        assert!(frame.has_readouts());
        assert_eq!(frame.message(), None);
    }
    #[test]
    fn test_message_line() {
        let frame = parse_telemetry_line("message=Temperature Safety Shutdown!!\r\n").unwrap();
        assert_eq!(frame.message(), Some("Temperature Safety Shutdown!!"));
        assert!(!frame.has_readouts());
    }
    #[test]
    fn test_whitespace_is_trimmed() {
        let frame = parse_telemetry_line(" spark% = 10 , short%=2").unwrap();
        assert_eq!(frame.fields, vec![TelemetryField::SparkPercent(10), TelemetryField::ShortPercent(2)]);
    }
    #[test]
    fn test_unknown_and_bare_items_are_ignored() {
        let frame = parse_telemetry_line("foo=1,bar,,pulseFreq=1500").unwrap();
        assert_eq!(frame.fields, vec![TelemetryField::PulseFrequency(1500)]);
        assert_eq!(parse_telemetry_line("").unwrap(), TelemetryFrame::default());
    }
    #[test]
    fn test_bad_value_rejects_line() {
        let result = parse_telemetry_line("spark%=10,short%=abc");
        assert!(matches!(
            result,
            Err(TelemetryError::InvalidValue { ref key, ref value }) if key == "short%" && value == "abc"
        ));
    }
    #[test]
    fn test_status_merges_frames() {
        let mut status = PowercoreStatus::default();
        assert_eq!(status.pulse_frequency, Some(1500));
        assert!(status.apply(&parse_telemetry_line(STATUS_LINE).unwrap()));
        assert!(status.apply(&parse_telemetry_line("spark%=50").unwrap()));
        assert!(!status.apply(&parse_telemetry_line("message=hi").unwrap()));
        assert_eq!(status.spark_percent, Some(50));
        assert_eq!(status.short_percent, Some(4));
        assert_eq!(status.pulse_frequency, Some(2000));
    }
    #[test]
    fn test_display() {
        let mut status = PowercoreStatus::default();
        assert_eq!(
            status.to_string(),
            "spark -% short -% | power - W charge - uC | freq 1500 Hz max 1600 uC | MOSFET - C resistor - C"
        );
        status.apply(&parse_telemetry_line(STATUS_LINE).unwrap());
        assert_eq!(
            status.to_string(),
            "spark 82% short 4% | power 4.32 W charge 1200.00 uC | freq 2000 Hz max 2500 uC | MOSFET 36 C resistor 41 C"
        );
    }
}
