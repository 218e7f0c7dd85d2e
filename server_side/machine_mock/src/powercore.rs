use std::{future::Future, pin::pin, time::Duration};

use tokio::{io::{AsyncRead, AsyncWrite, AsyncReadExt, AsyncWriteExt}, select, time::{interval, MissedTickBehavior}};
use tracing::debug;

const PULSE_FREQUENCY_PREFIX: &str = "pwm_frequency=";
const MAX_CHARGE_PREFIX: &str = "micro_c_per_pulse=";
// The firmware reads at most this many bytes per poll.
const RECEIVE_BUFFER: usize = 255;

#[derive(Debug, Clone, Copy)]
pub struct FirmwareSettings {
    pub report_interval: Duration,
    pub pulse_frequency: u32,
    pub max_charge: f64,
}
impl Default for FirmwareSettings {
    fn default() -> Self {
        FirmwareSettings {
            report_interval: Duration::from_millis(200),
            pulse_frequency: 2000,
            max_charge: 2500.0,
        }
    }
}

/// What the board would report; the cut readings are fixed.
#[derive(Debug, Clone)]
pub struct FirmwareState {
    pub pulse_frequency: u32,
    pub max_charge: f64,
    pub spark_percent: u32,
    pub short_percent: u32,
    pub average_charge: f64,
    pub resistor_temperature: f64,
    pub mosfet_temperature: f64,
}
impl FirmwareState {
    pub fn new(settings: &FirmwareSettings) -> Self {
        FirmwareState {
            pulse_frequency: settings.pulse_frequency,
            max_charge: settings.max_charge,
            spark_percent: 82,
            short_percent: 4,
            average_charge: 1200.0,
            resistor_temperature: 41.0,
            mosfet_temperature: 36.0,
        }
    }
    fn average_power(&self) -> f64 {
        ((self.average_charge / 20.0) * 72.0) / 1000.0
    }
    pub fn status_line(&self) -> String {
        format!(
            "spark%={},short%={},avgPower={:.2},avgCharge={:.2},pulseFreq={},maxCoulomb={:.0},resistorTemp={:.0},mosfetTemp={:.0}\n",
            self.spark_percent,
            self.short_percent,
            self.average_power(),
            self.average_charge,
            self.pulse_frequency,
            self.max_charge,
            self.resistor_temperature,
            self.mosfet_temperature,
        )
    }
    /// Applies every recognised token of one received chunk and returns the replies.
    pub fn handle_received(&mut self, data: &str) -> Vec<String> {
        let mut replies = Vec::new();
        for token in data.split(',') {
            if let Some(value) = token.strip_prefix(PULSE_FREQUENCY_PREFIX) {
                self.pulse_frequency = leading_integer(value).clamp(0, u32::MAX as i64) as u32;
                replies.push(message(&format!("PWM frequency set to: {}\n", self.pulse_frequency)));
            } else if let Some(value) = token.strip_prefix(MAX_CHARGE_PREFIX) {
                self.max_charge = leading_integer(value) as f64;
                replies.push(message(&format!("Max uC per Pulse set to: {:.0}\n", self.max_charge)));
            }
        }
        replies
    }
}

fn message(text: &str) -> String {
    format!("message={}\n", text)
}

/// Integer prefix of `input` the way C's `atoi` reads it; 0 when there is none.
pub fn leading_integer(input: &str) -> i64 {
    let input = input.trim_start();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add((digit - b'0') as i64));
    if negative { -value } else { value }
}

/// Plays the board's side of the serial link until either half closes.
pub fn fake_powercore(input: impl AsyncRead, output: impl AsyncWrite, settings: FirmwareSettings) -> impl Future<Output=()> {
    async move {
        let mut input = pin!(input);
        let mut output = pin!(output);
        let mut state = FirmwareState::new(&settings);
        let mut report = interval(settings.report_interval);
        report.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut buffer = [0u8; RECEIVE_BUFFER];
        loop {
            select! {
                read = input.read(&mut buffer) => {
                    let count = match read {
                        Ok(0) | Err(_) => return,
                        Ok(count) => count,
                    };
                    let data = String::from_utf8_lossy(&buffer[..count]).into_owned();
                    debug!(data = %data, "fake powercore received");
                    for reply in state.handle_received(&data) {
                        if output.write_all(reply.as_bytes()).await.is_err() {
                            return;
                        }
                    }
                }
                _ = report.tick() => {
                    if output.write_all(state.status_line().as_bytes()).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
