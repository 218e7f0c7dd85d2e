use std::{fs::File, io::{self, BufWriter}, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use gcode::MachineConfiguration;
use hilbert_gcode::{write_program, PlotOptions, Point};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print a Hilbert curve as plotter G-code.", long_about = None)]
struct Args {
    /// Order of the curve; the path has 4^depth - 1 moves.
    #[arg(short, long, default_value_t = 5)]
    depth: u32,
    /// Turning angle in degrees; a negative angle mirrors the curve.
    #[arg(short, long, default_value_t = 90, allow_negative_numbers = true)]
    angle: i32,
    /// Grid unit length.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    step: i64,
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    start_x: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_y: i64,
    /// Feed rate for X/Y moves.
    #[arg(long, default_value_t = 10)]
    planar_feed: u32,
    /// Feed rate for pen (Z) moves.
    #[arg(long, default_value_t = 100)]
    pen_feed: u32,
    /// Z height used while the pen is lifted.
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pen_raise: i64,
    /// Write space-separated words with three decimals instead of the compact integer form.
    #[arg(long)]
    spaced: bool,
    /// Output file; standard output when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            depth: self.depth,
            angle: self.angle,
            step: self.step,
            start: Point::new(self.start_x, self.start_y),
            planar_feed: self.planar_feed,
            pen_feed: self.pen_feed,
            pen_raise: self.pen_raise,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // G-code goes to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let options = args.plot_options();
    let config = if args.spaced {
        MachineConfiguration::standard_3_axis()
    } else {
        MachineConfiguration::compact_integer()
    };
    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            write_program(&options, &config, BufWriter::new(file))
        }
        None => write_program(&options, &config, BufWriter::new(io::stdout().lock())),
    }.context("Failed to generate program")?;
    info!(lines = summary.lines, steps = summary.steps, "done");
    Ok(())
}
