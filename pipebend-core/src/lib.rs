//! pipebend-core - Bend, join and stack G-code toolpaths.
//!
//! This library transforms G-code toolpaths for multi-part printing of
//! bent or joined pipe-like structures: it warps a flat, straight-axis
//! layer-by-layer toolpath into a curved shape (distributing a total bend
//! angle across layers and compensating extrusion for the stretch between
//! inner and outer radius), welds a second toolpath onto the top of a
//! first at an arbitrary tilt, or concatenates parts with rotary-axis
//! reset headers for a tilting-bed controller.
//!
//! # Example
//!
//! ```no_run
//! use pipebend_core::{bend_gcode, BendConfig};
//! use std::path::Path;
//!
//! let config = BendConfig::from_degrees(90.0);
//! let output = bend_gcode(Path::new("straight_pipe.gcode"), &config).unwrap();
//! std::fs::write("bent_pipe.gcode", output).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use config::{BendConfig, JointConfig, StackConfig};
pub use error::{ErrorClass, PipebendError, Result};
pub use model::{
    Axis, AxisWord, CommandKind, Extents, GcodeLine, LayerRecord, LayerTable, MotionCommand,
    PipeGeometry, RotationFrame,
};
pub use parser::{parse_gcode, parse_gcode_file};
pub use transform::{analyze_layers, schedule_bend_angles, BendTransformer, JointGeometry, JointTransformer};
pub use validation::{validate_toolpath, ValidationResult};

use std::path::Path;

use generator::GcodeBuffer;

fn log_warnings(result: &ValidationResult) {
    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
}

/// Pipe radius for the bend: configured override, or half the larger XY
/// bounding-box span of the toolpath.
fn bend_pipe_radius(extents: &Extents, config: &BendConfig) -> Result<f64> {
    match config.pipe_radius {
        Some(radius) => Ok(radius),
        None => {
            let diameter = extents.larger_xy_span();
            if config::float_cmp::approx_zero(diameter) {
                return Err(PipebendError::ZeroBoundingBox);
            }
            Ok(diameter / 2.0)
        }
    }
}

/// Bend a toolpath file and return the transformed G-code.
///
/// Full pipeline: parse, analyze layers, schedule angles, derive the pipe
/// radius, then run the write pass. All global quantities are frozen
/// before the first output line is produced, so a geometry failure
/// surfaces before anything is written.
pub fn bend_gcode(input: &Path, config: &BendConfig) -> Result<String> {
    let lines = parser::parse_gcode_file(input)?;
    log_warnings(&validate_toolpath(&lines));

    let mut table = transform::analyze_layers(&lines)?;
    transform::schedule_bend_angles(&mut table, config.total_bend_angle)?;

    let extents = Extents::scan(&lines);
    let pipe_radius = bend_pipe_radius(&extents, config)?;

    let transformer = BendTransformer::new(table, pipe_radius);
    transformer.transform_toolpath(&lines)
}

/// Weld a second toolpath onto the top of a first and return the merged
/// G-code: first part verbatim, transition block, transformed second part.
pub fn join_gcode(first: &Path, second: &Path, config: &JointConfig) -> Result<String> {
    let part1 = parser::parse_gcode_file(first)?;
    let part2 = parser::parse_gcode_file(second)?;
    log_warnings(&validate_toolpath(&part1));
    log_warnings(&validate_toolpath(&part2));

    let geometry = JointGeometry::derive(&Extents::scan(&part1), &Extents::scan(&part2), config)?;

    let mut out = GcodeBuffer::new();
    for line in &part1 {
        out.push_line(line.raw());
    }
    for line in geometry.transition_block(config) {
        out.push_line(&line);
    }

    let mut transformer = JointTransformer::new(&geometry);
    for line in &part2 {
        match line.as_move() {
            Some(cmd) if cmd.has_any_position() => {
                out.push_line(&transformer.transform_command(cmd))
            }
            _ => out.push_line(line.raw()),
        }
    }

    Ok(out.into_string())
}

/// Concatenate toolpath files with rotary-axis reset headers between them
/// and return the merged G-code.
pub fn stack_gcode(inputs: &[std::path::PathBuf], config: &StackConfig) -> Result<String> {
    let mut sections = Vec::with_capacity(inputs.len());
    for input in inputs {
        let lines = parser::parse_gcode_file(input)?;
        log_warnings(&validate_toolpath(&lines));
        sections.push(lines);
    }

    Ok(generator::stack_sections(&sections, config))
}
