use std::{fmt::{Display, Formatter, self}, cell::Cell};

use itertools::Itertools;

use crate::{config::{MachineConfiguration, WordLayout}, gcode::{Line, CommandContent, MotionMode, LinearMove, ModalUpdates, CoordinateMode}, coordinates::PartialPosition};

pub struct MachineFormatter<'a, T>(pub &'a MachineConfiguration, pub T);

fn word_separator(config: &MachineConfiguration) -> &'static str {
    match config.layout {
        WordLayout::Spaced => " ",
        WordLayout::Compact => "",
    }
}
// -0.0 would otherwise print as "-0"
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl<'a, 'b> Display for MachineFormatter<'a, &'b PartialPosition> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let separator = word_separator(self.0);
        let needs_preceding_space = Cell::new(false);
        for (index, value) in self.1.0.iter().enumerate() {
            if let Some(value) = value {
                if needs_preceding_space.replace(true) {
                    write!(f, "{}", separator)?;
                }
                write!(f, "{}{:.*}", self.0.axis_characters[index], self.0.precision as usize, positive_zero(*value))?;
            }
        }
        Ok(())
    }
}
impl<'a, 'b> Display for MachineFormatter<'a, &'b Line> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let separator = word_separator(self.0);
        let needs_preceding_space = Cell::new(false);
        macro_rules! write_new_term {
            ($separator:expr, $($tokens:tt)*) => {
                {
                    if needs_preceding_space.replace(true) {
                        write!(f, "{}", $separator)?;
                    }
                    write!(f, $($tokens)*)?
                }
            }
        }
        let ModalUpdates {
            feedrate,
            motion_mode,
            coordinate_mode,
        } = &self.1.modal_updates;
        match coordinate_mode {
            Some(CoordinateMode::Absolute) => write_new_term!(separator, "G90"),
            None => (),
        }
        match motion_mode {
            Some(MotionMode::Controlled) => write_new_term!(separator, "G1"),
            Some(MotionMode::Rapid) => write_new_term!(separator, "G0"),
            None => (),
        }
        match &self.1.command {
            Some(CommandContent::LinearMove(LinearMove(target))) if !target.is_empty() => {
                write_new_term!(separator, "{}", MachineFormatter(self.0, target));
            },
            _ => (),
        }
        // The feed word is always set apart, even in the compact layout.
        if let Some(feedrate) = feedrate {
            write_new_term!(" ", "F{:.*}", self.0.precision as usize, positive_zero(*feedrate));
        }
        Ok(())
    }
}

/// Formats every line, newline terminated.
pub fn format_program<'a>(config: &MachineConfiguration, lines: impl IntoIterator<Item = &'a Line>) -> String {
    let mut result = lines.into_iter().map(|line| MachineFormatter(config, line)).join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}
