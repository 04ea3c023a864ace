//! Bend transform: per-layer coordinate rotation with flow compensation.

use crate::error::{PipebendError, Result};
use crate::generator::{rebuild_motion_line, AxisOverrides, GcodeBuffer};
use crate::model::{Axis, GcodeLine, LayerTable, MotionCommand};

/// Rotate a point in the XZ plane about the Y axis.
pub fn rotate_about_y(x: f64, z: f64, theta: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (x * cos - z * sin, x * sin + z * cos)
}

/// Flow compensation ratio for a point at offset `x` from the bend axis.
///
/// Material on the outer radius is stretched, material on the inner radius
/// compressed; extrusion scales by the ratio of the two. Fails when the
/// rotation axis sits at or beyond the extrusion point.
pub fn flow_ratio(x: f64, pipe_radius: f64) -> Result<f64> {
    let outer = pipe_radius + x;
    let inner = pipe_radius - x;
    if inner <= 0.0 {
        return Err(PipebendError::NonPositiveInnerRadius {
            x,
            pipe_radius,
            inner,
        });
    }
    Ok(outer / inner)
}

/// Applies the scheduled per-layer rotation to a parsed toolpath.
///
/// A command qualifies only when it carries X, Y and Z simultaneously; a
/// command missing any one of the three passes through unmodified rather
/// than being bent against remembered state. This transform keeps no
/// position model between commands (the joint transform does).
#[derive(Debug)]
pub struct BendTransformer {
    table: LayerTable,
    pipe_radius: f64,
}

impl BendTransformer {
    pub fn new(table: LayerTable, pipe_radius: f64) -> Self {
        Self { table, pipe_radius }
    }

    /// Transform one qualifying command under a bend angle.
    fn transform_command(&self, cmd: &MotionCommand, x: f64, y: f64, z: f64, theta: f64) -> Result<String> {
        let (new_x, new_z) = rotate_about_y(x, z, theta);

        let new_e = match cmd.axis(Axis::E) {
            Some(e) => Some(e * flow_ratio(x, self.pipe_radius)?),
            None => None,
        };

        let overrides = AxisOverrides {
            x: Some(new_x),
            y: Some(y),
            z: Some(new_z),
            e: new_e,
        };
        Ok(rebuild_motion_line(cmd, &overrides))
    }

    /// Run the write pass over the whole toolpath.
    ///
    /// Commands before the first layer marker are transformed with angle 0:
    /// the schedule is height-proportional and the prologue sits at height
    /// zero.
    pub fn transform_toolpath(&self, lines: &[GcodeLine]) -> Result<String> {
        let mut out = GcodeBuffer::new();
        let mut markers_seen = 0usize;
        let mut theta = 0.0;

        for line in lines {
            match line {
                GcodeLine::LayerMarker { .. } => {
                    theta = self.table.angle_for_marker(markers_seen);
                    markers_seen += 1;
                    out.push_line(line.raw());
                }
                GcodeLine::Motion(cmd) if cmd.is_move() => {
                    match (cmd.axis(Axis::X), cmd.axis(Axis::Y), cmd.axis(Axis::Z)) {
                        (Some(x), Some(y), Some(z)) => {
                            out.push_line(&self.transform_command(cmd, x, y, z, theta)?)
                        }
                        // Missing any of X, Y, Z: not transformable, pass through.
                        _ => out.push_line(line.raw()),
                    }
                }
                _ => out.push_line(line.raw()),
            }
        }

        Ok(out.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp;
    use crate::model::LayerRecord;
    use crate::parser::parse_gcode;
    use pretty_assertions::assert_eq;

    fn table(angles: &[f64]) -> LayerTable {
        LayerTable {
            records: angles
                .iter()
                .enumerate()
                .map(|(i, &a)| LayerRecord {
                    index: i as i32,
                    base_height: 0.2 * i as f64,
                    bend_angle: a,
                })
                .collect(),
            layer_height: 0.2,
        }
    }

    #[test]
    fn test_quarter_turn_projection() {
        let (x, z) = rotate_about_y(10.0, 0.0, std::f64::consts::FRAC_PI_2);
        assert!(x.abs() < 0.001);
        assert!((z - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_flow_ratio_asymmetry() {
        // Outer radius stretches, inner radius compresses.
        assert!(flow_ratio(2.0, 10.0).unwrap() > 1.0);
        assert!(flow_ratio(-2.0, 10.0).unwrap() < 1.0);
        assert!(float_cmp::approx_eq(flow_ratio(0.0, 10.0).unwrap(), 1.0));
    }

    #[test]
    fn test_flow_fails_at_or_beyond_axis() {
        for x in [10.0, 12.0] {
            match flow_ratio(x, 10.0) {
                Err(PipebendError::NonPositiveInnerRadius { inner, .. }) => {
                    assert!(inner <= 0.0);
                }
                other => panic!("expected NonPositiveInnerRadius, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let transformer = BendTransformer::new(table(&[0.0, 0.0]), 50.0);
        // On the bend axis (x = 0) the flow ratio is exactly 1, so the
        // whole command round-trips unchanged.
        let lines = parse_gcode(";LAYER:0\nG1 X0.0 Y2.0 Z0.2 E1.0\n;LAYER:1\nG1 X0.0 Y2.0 Z0.4 E2.0");
        let out = transformer.transform_toolpath(&lines).unwrap();
        assert_eq!(
            out,
            ";LAYER:0\nG1 X0.000 Y2.000 Z0.200 E1.00000\n;LAYER:1\nG1 X0.000 Y2.000 Z0.400 E2.00000\n"
        );
    }

    #[test]
    fn test_zero_angle_keeps_coordinates_off_axis() {
        let transformer = BendTransformer::new(table(&[0.0, 0.0]), 50.0);
        let lines = parse_gcode(";LAYER:0\nG1 X10.0 Y2.0 Z0.2");
        let out = transformer.transform_toolpath(&lines).unwrap();
        assert_eq!(out, ";LAYER:0\nG1 X10.000 Y2.000 Z0.200\n");
    }

    #[test]
    fn test_partial_commands_pass_through() {
        let transformer = BendTransformer::new(table(&[0.5, 1.0]), 50.0);
        let lines = parse_gcode(";LAYER:0\nG1 X5.0 E0.1\nG0 Z10.0\nG92 E0");
        let out = transformer.transform_toolpath(&lines).unwrap();
        // Missing Y or Z: unmodified. Non-move commands: unmodified.
        assert_eq!(out, ";LAYER:0\nG1 X5.0 E0.1\nG0 Z10.0\nG92 E0\n");
    }

    #[test]
    fn test_layer_angle_advances_at_markers() {
        let transformer = BendTransformer::new(table(&[0.0, std::f64::consts::FRAC_PI_2]), 50.0);
        let lines = parse_gcode(";LAYER:0\nG1 X10.0 Y0.0 Z0.0\n;LAYER:1\nG1 X10.0 Y0.0 Z0.0");
        let out = transformer.transform_toolpath(&lines).unwrap();
        let rendered: Vec<&str> = out.lines().collect();
        assert_eq!(rendered[1], "G1 X10.000 Y0.000 Z0.000");
        assert_eq!(rendered[3], "G1 X0.000 Y0.000 Z10.000");
    }
}
