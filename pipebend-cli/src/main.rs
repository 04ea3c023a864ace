//! pipebend - CLI tool to bend, join and stack G-code toolpaths.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pipebend_core::{
    analyze_layers, bend_gcode, join_gcode, parse_gcode_file, schedule_bend_angles, stack_gcode,
    BendConfig, Extents, JointConfig, JointGeometry, StackConfig,
};

/// Bend, join and stack G-code toolpaths for pipe-like multi-part prints.
#[derive(Parser, Debug)]
#[command(name = "pipebend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the analysis pass as JSON instead of writing output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp a straight toolpath into a curved shape
    Bend {
        /// Input G-code file path
        input: PathBuf,

        /// Output file path (default: input with a `_bent` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total bend angle in degrees, distributed across layers
        #[arg(short, long)]
        angle: f64,

        /// Pipe radius override in mm (default: half the larger XY span)
        #[arg(long)]
        pipe_radius: Option<f64>,
    },

    /// Weld a second toolpath onto the top of a first at a tilt
    Join {
        /// First (bottom) part G-code file path
        first: PathBuf,

        /// Second (top) part G-code file path
        second: PathBuf,

        /// Output file path (default: first input with a `_joined` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tilt angle in degrees applied to the second part
        #[arg(short, long, default_value = "0")]
        tilt: f64,

        /// Z clearance in mm for the travel move between the parts
        #[arg(long, default_value_t = pipebend_core::config::Z_LIFT_CLEARANCE_MM)]
        clearance: f64,

        /// Retraction length in mm for the transition block
        #[arg(long, default_value_t = pipebend_core::config::DEFAULT_RETRACT_LENGTH_MM)]
        retract_length: f64,

        /// Joint overlap offset override in mm (default: half the pipe diameter)
        #[arg(long)]
        connection_offset: Option<f64>,
    },

    /// Concatenate parts with rotary-axis reset headers between them
    Stack {
        /// Input G-code file paths, in print order
        #[arg(num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file path (default: first input with a `_stacked` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-section tilt angles in degrees, comma separated
        #[arg(long, value_delimiter = ',')]
        tilts: Option<Vec<f64>>,
    },
}

/// Derive a default output path next to an input: `part.gcode` with suffix
/// `_bent` becomes `part_bent.gcode`.
fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("gcode");
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Generated: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Bend {
            input,
            output,
            angle,
            pipe_radius,
        } => {
            let mut config = BendConfig::from_degrees(angle);
            config.pipe_radius = pipe_radius;

            info!("Bending: {} ({} degrees)", input.display(), angle);

            if cli.debug {
                let lines = parse_gcode_file(&input)
                    .with_context(|| format!("Failed to parse {}", input.display()))?;
                let mut table = analyze_layers(&lines)?;
                schedule_bend_angles(&mut table, config.total_bend_angle)?;
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }

            let transformed = bend_gcode(&input, &config)
                .with_context(|| format!("Failed to bend {}", input.display()))?;
            let output_path = output.unwrap_or_else(|| default_output(&input, "_bent"));
            write_output(&output_path, &transformed)
        }

        Command::Join {
            first,
            second,
            output,
            tilt,
            clearance,
            retract_length,
            connection_offset,
        } => {
            let mut config = JointConfig::from_degrees(tilt);
            config.z_lift_clearance = clearance;
            config.retract_length = retract_length;
            config.connection_offset = connection_offset;

            info!(
                "Joining: {} + {} ({} degrees)",
                first.display(),
                second.display(),
                tilt
            );

            if cli.debug {
                let part1 = parse_gcode_file(&first)
                    .with_context(|| format!("Failed to parse {}", first.display()))?;
                let part2 = parse_gcode_file(&second)
                    .with_context(|| format!("Failed to parse {}", second.display()))?;
                let geometry =
                    JointGeometry::derive(&Extents::scan(&part1), &Extents::scan(&part2), &config)?;
                println!("{}", serde_json::to_string_pretty(&geometry)?);
                return Ok(());
            }

            let merged = join_gcode(&first, &second, &config).with_context(|| {
                format!("Failed to join {} + {}", first.display(), second.display())
            })?;
            let output_path = output.unwrap_or_else(|| default_output(&first, "_joined"));
            write_output(&output_path, &merged)
        }

        Command::Stack {
            inputs,
            output,
            tilts,
        } => {
            let config = match tilts {
                Some(tilts) => StackConfig::new(tilts),
                None => StackConfig::default(),
            };

            info!("Stacking {} part(s)", inputs.len());

            let merged = stack_gcode(&inputs, &config).context("Failed to stack inputs")?;
            let output_path = output
                .or_else(|| inputs.first().map(|p| default_output(p, "_stacked")))
                .context("No input files given")?;
            write_output(&output_path, &merged)
        }
    }
}
