//! Joint transform: weld a second toolpath onto the top of a first at an
//! arbitrary tilt.

use serde::{Deserialize, Serialize};

use crate::config::{float_cmp, JointConfig};
use crate::error::{PipebendError, Result};
use crate::generator::{format_coord, format_flow, format_number, rebuild_motion_line, AxisOverrides};
use crate::model::{Axis, Extents, MotionCommand, PipeGeometry, RotationFrame};

/// Frozen geometry of the weld: pipe dimensions, pivot, rotation frame.
///
/// Derived once from the two parts' coordinate extents and the tilt angle;
/// immutable for the rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointGeometry {
    pub pipe: PipeGeometry,
    pub frame: RotationFrame,
    /// Tilt angle in radians.
    pub tilt_angle: f64,
    /// Joint overlap: the second part starts this far below the first
    /// part's top so the weld has material on both sides.
    pub connection_offset: f64,
}

impl JointGeometry {
    /// Derive the weld geometry from the first part's extents, the second
    /// part's extents and the configured tilt.
    pub fn derive(first: &Extents, second: &Extents, config: &JointConfig) -> Result<Self> {
        let diameter = first.larger_xy_span();
        if float_cmp::approx_zero(diameter) {
            return Err(PipebendError::ZeroBoundingBox);
        }

        let pipe = PipeGeometry {
            diameter,
            wall_thickness: config.wall_thickness_ratio * diameter,
            pivot_x: first.center_x(),
            pivot_y: first.center_y(),
            max_height: first.highest_z(),
            min_height_of_joined_part: second.lowest_z(),
        };

        let connection_offset = config.connection_offset.unwrap_or(diameter / 2.0);

        // Full mapping: re-base the second part's Z to 0, rotate the
        // pivot-relative point about the Y axis, then translate onto the
        // first part's top minus the joint overlap. The re-base and pivot
        // fold into the frame's translation term, so a zero tilt is a
        // pure Z translation.
        let matrix = RotationFrame::rotation_about_y(config.tilt_angle);
        let base = [
            pipe.pivot_x,
            pipe.pivot_y,
            pipe.min_height_of_joined_part,
        ];
        let target = [
            pipe.pivot_x,
            pipe.pivot_y,
            pipe.max_height - connection_offset,
        ];
        let rotated_base = RotationFrame::new(matrix, [0.0; 3]).apply(base);
        let translation = [
            target[0] - rotated_base[0],
            target[1] - rotated_base[1],
            target[2] - rotated_base[2],
        ];

        Ok(Self {
            pipe,
            frame: RotationFrame::new(matrix, translation),
            tilt_angle: config.tilt_angle,
            connection_offset,
        })
    }

    /// The fixed transition block emitted between the two parts: extruder
    /// reset, retraction, and a Z-lift rapid clearing the first part.
    pub fn transition_block(&self, config: &JointConfig) -> Vec<String> {
        vec![
            "G92 E0".to_string(),
            format!(
                "G1 E{} F{}",
                format_flow(-config.retract_length),
                format_number(config.retract_feedrate)
            ),
            format!(
                "G0 Z{}",
                format_coord(self.pipe.max_height + config.z_lift_clearance)
            ),
        ]
    }
}

/// Applies [`JointGeometry`] to the second part, command by command.
///
/// Carries the last-seen X, Y, Z so a partly specified move still maps
/// through the full rigid transform; only the axes the source line carried
/// are emitted. E and F pass through completely unchanged: unlike the bend
/// transform, this transform never compensates flow.
#[derive(Debug)]
pub struct JointTransformer {
    frame: RotationFrame,
    carried: [f64; 3],
}

impl JointTransformer {
    pub fn new(geometry: &JointGeometry) -> Self {
        Self {
            frame: geometry.frame,
            carried: [
                geometry.pipe.pivot_x,
                geometry.pipe.pivot_y,
                geometry.pipe.min_height_of_joined_part,
            ],
        }
    }

    /// Transform one movement command of the second part.
    pub fn transform_command(&mut self, cmd: &MotionCommand) -> String {
        if let Some(x) = cmd.axis(Axis::X) {
            self.carried[0] = x;
        }
        if let Some(y) = cmd.axis(Axis::Y) {
            self.carried[1] = y;
        }
        if let Some(z) = cmd.axis(Axis::Z) {
            self.carried[2] = z;
        }

        let out = self.frame.apply(self.carried);

        let overrides = AxisOverrides {
            x: cmd.axis(Axis::X).map(|_| out[0]),
            y: cmd.axis(Axis::Y).map(|_| out[1]),
            z: cmd.axis(Axis::Z).map(|_| out[2]),
            e: None,
        };
        rebuild_motion_line(cmd, &overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp;
    use crate::parser::{parse_gcode, parse_line};
    use pretty_assertions::assert_eq;

    fn extents(gcode: &str) -> Extents {
        Extents::scan(&parse_gcode(gcode))
    }

    /// 20x20 footprint centered on (10, 10), 5 tall.
    fn first_part() -> Extents {
        extents("G1 X0 Y0 Z0.2\nG1 X20 Y20 Z5.0")
    }

    fn second_part() -> Extents {
        extents("G1 X5 Y5 Z0.0\nG1 X15 Y15 Z3.0")
    }

    #[test]
    fn test_derived_pipe_geometry() {
        let geometry =
            JointGeometry::derive(&first_part(), &second_part(), &JointConfig::new(0.5)).unwrap();
        assert_eq!(geometry.pipe.diameter, 20.0);
        assert!(float_cmp::approx_eq(geometry.pipe.wall_thickness, 2.0));
        assert_eq!(geometry.pipe.pivot_x, 10.0);
        assert_eq!(geometry.pipe.pivot_y, 10.0);
        assert_eq!(geometry.pipe.max_height, 5.0);
        assert_eq!(geometry.connection_offset, 10.0);
    }

    #[test]
    fn test_zero_tilt_is_pure_translation() {
        let geometry =
            JointGeometry::derive(&first_part(), &second_part(), &JointConfig::new(0.0)).unwrap();
        assert!(geometry.frame.is_pure_translation());

        // Z offset: re-base by min_z2 (0), then land on max_z1 - offset.
        let p = geometry.frame.apply([12.0, 13.0, 1.0]);
        assert!(float_cmp::approx_eq(p[0], 12.0));
        assert!(float_cmp::approx_eq(p[1], 13.0));
        assert!(float_cmp::approx_eq(p[2], 1.0 + 5.0 - 10.0));
    }

    #[test]
    fn test_degenerate_bounding_box() {
        let flat = extents("G1 X5 Y5 Z1.0\nG1 X5 Y5 Z2.0");
        match JointGeometry::derive(&flat, &second_part(), &JointConfig::default()) {
            Err(PipebendError::ZeroBoundingBox) => {}
            other => panic!("expected ZeroBoundingBox, got {:?}", other),
        }
    }

    #[test]
    fn test_carried_state_fills_missing_axes() {
        let geometry =
            JointGeometry::derive(&first_part(), &second_part(), &JointConfig::new(0.0)).unwrap();
        let mut transformer = JointTransformer::new(&geometry);

        // Carried state starts at the pivot and the second part's floor.
        let full = parse_line("G1 X12.0 Y13.0 Z1.0 E4.2");
        let out = transformer.transform_command(full.as_motion().unwrap());
        assert_eq!(out, "G1 X12.000 Y13.000 Z-4.000 E4.2");

        // X-only move: Y and Z carried from the previous command, only X
        // emitted, E and F untouched.
        let partial = parse_line("G1 X14.0 E5.0 F1200");
        let out = transformer.transform_command(partial.as_motion().unwrap());
        assert_eq!(out, "G1 X14.000 E5.0 F1200");
    }

    #[test]
    fn test_transition_block_shape() {
        let geometry =
            JointGeometry::derive(&first_part(), &second_part(), &JointConfig::new(0.0)).unwrap();
        let block = geometry.transition_block(&JointConfig::default());
        assert_eq!(
            block,
            vec![
                "G92 E0".to_string(),
                "G1 E-5.00000 F2400".to_string(),
                // First-part max height 5.0 plus the 5 mm clearance.
                "G0 Z10.000".to_string(),
            ]
        );
    }
}
