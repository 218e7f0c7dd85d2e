//! Hilbert curve toolpaths as plotter G-code.
//!
//! The curve is walked by a turtle whose heading turns one quarter at a time;
//! every forward step becomes one absolute rapid move.

pub mod error;
pub mod heading;
pub mod hilbert;
pub mod program;
pub mod turtle;

pub use error::{GeneratorError, GeneratorResult};
pub use heading::{Heading, Rotation, Sign};
pub use hilbert::{step_count, HilbertSteps};
pub use program::{plot_program, render_program, write_program, Bounds, PlotOptions, PlotSummary, Program, MAX_DEPTH};
pub use turtle::{Point, Turtle};
