//! Configuration constants and settings for the transformers.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Wall thickness as a fraction of the pipe diameter.
///
/// The wall is not measured from the toolpath; 10% of the outer diameter
/// is the heuristic the joint geometry assumes.
pub const WALL_THICKNESS_RATIO: f64 = 0.10;

/// Z clearance in mm added above the first part's max height for the
/// travel move between joined parts.
pub const Z_LIFT_CLEARANCE_MM: f64 = 5.0;

/// Default retraction length in mm for the joint transition block.
pub const DEFAULT_RETRACT_LENGTH_MM: f64 = 5.0;

/// Default retraction feedrate in mm/min for the joint transition block.
pub const DEFAULT_RETRACT_FEEDRATE: f64 = 2400.0;

/// Default per-section tilt schedule in degrees for the stacking merge.
pub const DEFAULT_STACK_TILTS: [f64; 3] = [0.0, 30.0, -15.0];

/// Settings for the bend transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BendConfig {
    /// Total bend angle in radians, distributed across layers.
    pub total_bend_angle: f64,
    /// Pipe radius override in mm. When `None`, half the larger XY
    /// bounding-box span of the toolpath is used.
    pub pipe_radius: Option<f64>,
}

impl BendConfig {
    /// Create a bend configuration for a total angle in radians.
    pub fn new(total_bend_angle: f64) -> Self {
        Self {
            total_bend_angle,
            pipe_radius: None,
        }
    }

    /// Create a bend configuration for a total angle in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(angle::to_radians(degrees))
    }
}

/// Settings for the joint transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointConfig {
    /// Tilt angle in radians applied to the second part.
    pub tilt_angle: f64,
    /// Wall thickness as a fraction of the pipe diameter.
    pub wall_thickness_ratio: f64,
    /// Z clearance in mm for the travel move between the parts.
    pub z_lift_clearance: f64,
    /// Retraction length in mm emitted in the transition block.
    pub retract_length: f64,
    /// Retraction feedrate in mm/min emitted in the transition block.
    pub retract_feedrate: f64,
    /// Joint overlap offset override in mm. When `None`, half the pipe
    /// diameter is used.
    pub connection_offset: Option<f64>,
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            tilt_angle: 0.0,
            wall_thickness_ratio: WALL_THICKNESS_RATIO,
            z_lift_clearance: Z_LIFT_CLEARANCE_MM,
            retract_length: DEFAULT_RETRACT_LENGTH_MM,
            retract_feedrate: DEFAULT_RETRACT_FEEDRATE,
            connection_offset: None,
        }
    }
}

impl JointConfig {
    /// Create a joint configuration for a tilt angle in radians.
    pub fn new(tilt_angle: f64) -> Self {
        Self {
            tilt_angle,
            ..Default::default()
        }
    }

    /// Create a joint configuration for a tilt angle in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(angle::to_radians(degrees))
    }
}

/// Settings for the stacking merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Per-section tilt angles in degrees, stamped into the `G87` headers.
    /// Sections beyond the list get a tilt of 0.
    pub tilts: Vec<f64>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            tilts: DEFAULT_STACK_TILTS.to_vec(),
        }
    }
}

impl StackConfig {
    /// Create a stack configuration with an explicit tilt schedule.
    pub fn new(tilts: Vec<f64>) -> Self {
        Self { tilts }
    }

    /// Tilt in degrees for a section index.
    pub fn tilt_for(&self, section: usize) -> f64 {
        self.tilts.get(section).copied().unwrap_or(0.0)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}

/// Utility functions for angle operations.
pub mod angle {
    /// Convert degrees to radians.
    #[inline]
    pub fn to_radians(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn to_degrees(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_roundtrip() {
        assert!(float_cmp::approx_eq(
            angle::to_radians(90.0),
            std::f64::consts::FRAC_PI_2
        ));
        assert!(float_cmp::approx_eq(angle::to_degrees(std::f64::consts::PI), 180.0));
    }

    #[test]
    fn test_stack_tilt_schedule() {
        let config = StackConfig::default();
        assert_eq!(config.tilt_for(0), 0.0);
        assert_eq!(config.tilt_for(1), 30.0);
        assert_eq!(config.tilt_for(2), -15.0);
        // Sections beyond the schedule fall back to no tilt
        assert_eq!(config.tilt_for(3), 0.0);
    }
}
