pub mod gcode;
pub mod coordinates;
pub mod config;
pub mod output;
pub mod parse;

pub use config::{MachineConfiguration, WordLayout};
pub use coordinates::PartialPosition;
pub use gcode::{Line, MotionMode, CoordinateMode, ModalUpdates, CommandContent, LinearMove};
pub use output::{MachineFormatter, format_program};
pub use parse::parse_line;
