use std::io::Write;

use gcode::{format_program, Line, MachineConfiguration, MachineFormatter, PartialPosition};
use itertools::{chain, Itertools};
use tracing::{debug, info};

use crate::{
    error::{GeneratorError, GeneratorResult},
    heading::{Heading, Sign},
    hilbert::{step_count, HilbertSteps},
    turtle::{Point, Turtle},
};

/// Beyond this the output runs to billions of lines.
pub const MAX_DEPTH: u32 = 15;
/// Largest coordinate magnitude; every integer up to here is exact as an `f64`.
pub const MAX_COORDINATE: u64 = 1 << 53;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Order of the curve; the path has 4^depth - 1 steps.
    pub depth: u32,
    /// Turning angle in degrees. Only the sign matters: it picks which way the curve winds.
    pub angle: i32,
    /// Grid unit length.
    pub step: i64,
    /// Where the traversal starts; the first emitted move is one step away from here.
    pub start: Point,
    pub planar_feed: u32,
    pub pen_feed: u32,
    /// Height of the pen axis while travelling.
    pub pen_raise: i64,
}
impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            depth: 5,
            angle: 90,
            step: 1,
            start: Point::new(3, 0),
            planar_feed: 10,
            pen_feed: 100,
            pen_raise: 5,
        }
    }
}
impl PlotOptions {
    pub fn validate(&self) -> GeneratorResult<Sign> {
        if self.depth > MAX_DEPTH {
            return Err(GeneratorError::DepthTooLarge { depth: self.depth, max: MAX_DEPTH });
        }
        if self.step == 0 {
            return Err(GeneratorError::ZeroStep);
        }
        // The curve stays within 2^depth steps of the start on each axis.
        let extent = (self.step.unsigned_abs() as u128) << self.depth;
        let reach = |value: i64| value.unsigned_abs() as u128 + extent;
        if reach(self.start.x) > MAX_COORDINATE as u128
            || reach(self.start.y) > MAX_COORDINATE as u128
            || self.pen_raise.unsigned_abs() > MAX_COORDINATE
        {
            return Err(GeneratorError::CoordinateOutOfRange { max: MAX_COORDINATE });
        }
        Sign::of(self.angle).ok_or(GeneratorError::ZeroAngle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}
impl Bounds {
    fn around(point: Point) -> Self {
        Bounds { min: point, max: point }
    }
    fn include(&mut self, point: Point) {
        self.min = Point::new(self.min.x.min(point.x), self.min.y.min(point.y));
        self.max = Point::new(self.max.x.max(point.x), self.max.y.max(point.y));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSummary {
    pub lines: u64,
    pub steps: u64,
    /// Extent of the traversal moves; `None` when there are none.
    pub bounds: Option<Bounds>,
}

/// A validated plot, split into the fixed preamble, the traversal and the
/// closing moves.
#[derive(Debug, Clone)]
pub struct Program {
    options: PlotOptions,
    sign: Sign,
}
impl Program {
    pub fn new(options: PlotOptions) -> GeneratorResult<Self> {
        let sign = options.validate()?;
        Ok(Program { options, sign })
    }
    fn home(&self) -> [Line; 2] {
        [
            Line::rapid(PartialPosition::z(self.options.pen_raise as f64), self.options.pen_feed as f64),
            Line::rapid(PartialPosition::xy(0.0, 0.0), self.options.planar_feed as f64),
        ]
    }
    pub fn header(&self) -> Vec<Line> {
        chain!(
            [Line::absolute_mode()],
            self.home(),
            [Line::rapid(PartialPosition::z(0.0), self.options.pen_feed as f64)],
        ).collect()
    }
    pub fn steps(&self) -> HilbertSteps {
        HilbertSteps::new(
            self.options.depth,
            self.sign,
            Turtle::new(self.options.start, Heading::Right, self.options.step),
        )
    }
    pub fn footer(&self) -> Vec<Line> {
        self.home().to_vec()
    }
    fn step_line(&self, point: Point) -> Line {
        Line::rapid(PartialPosition::xy(point.x as f64, point.y as f64), self.options.planar_feed as f64)
    }
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        chain!(
            self.header(),
            self.steps().map(|point| self.step_line(point)),
            self.footer(),
        )
    }
}

pub fn plot_program(options: &PlotOptions) -> GeneratorResult<Vec<Line>> {
    let program = Program::new(options.clone())?;
    let lines = program.lines().collect_vec();
    Ok(lines)
}

pub fn render_program(options: &PlotOptions, config: &MachineConfiguration) -> GeneratorResult<String> {
    Ok(format_program(config, &plot_program(options)?))
}

/// Streams the program to `writer`, one directive per line.
pub fn write_program(options: &PlotOptions, config: &MachineConfiguration, mut writer: impl Write) -> GeneratorResult<PlotSummary> {
    let program = Program::new(options.clone())?;
    info!(depth = options.depth, angle = options.angle, steps = step_count(options.depth), "generating hilbert curve");
    let mut lines = 0u64;
    let mut steps = 0u64;
    let mut bounds: Option<Bounds> = None;
    for line in program.header() {
        writeln!(writer, "{}", MachineFormatter(config, &line))?;
        lines += 1;
    }
    for point in program.steps() {
        match bounds.as_mut() {
            Some(bounds) => bounds.include(point),
            None => bounds = Some(Bounds::around(point)),
        }
        writeln!(writer, "{}", MachineFormatter(config, &program.step_line(point)))?;
        lines += 1;
        steps += 1;
    }
    for line in program.footer() {
        writeln!(writer, "{}", MachineFormatter(config, &line))?;
        lines += 1;
    }
    writer.flush()?;
    debug!(lines, steps, ?bounds, "program written");
    Ok(PlotSummary { lines, steps, bounds })
}
