//! Derived geometry: coordinate extents, pipe dimensions, joint frame.

use serde::{Deserialize, Serialize};

use super::command::{Axis, GcodeLine};

/// Coordinate extents of a toolpath, from a full scan of its rapid and
/// linear moves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Extents {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Scan a parsed toolpath. Axes never seen report zero spans and zero
    /// min/max heights.
    pub fn scan(lines: &[GcodeLine]) -> Self {
        let mut extents = Self::empty();
        for cmd in lines.iter().filter_map(GcodeLine::as_move) {
            if let Some(x) = cmd.axis(Axis::X) {
                extents.min_x = extents.min_x.min(x);
                extents.max_x = extents.max_x.max(x);
            }
            if let Some(y) = cmd.axis(Axis::Y) {
                extents.min_y = extents.min_y.min(y);
                extents.max_y = extents.max_y.max(y);
            }
            if let Some(z) = cmd.axis(Axis::Z) {
                extents.min_z = extents.min_z.min(z);
                extents.max_z = extents.max_z.max(z);
            }
        }
        extents
    }

    fn span(min: f64, max: f64) -> f64 {
        if min > max {
            0.0
        } else {
            max - min
        }
    }

    pub fn x_span(&self) -> f64 {
        Self::span(self.min_x, self.max_x)
    }

    pub fn y_span(&self) -> f64 {
        Self::span(self.min_y, self.max_y)
    }

    /// The larger of the XY bounding-box spans.
    pub fn larger_xy_span(&self) -> f64 {
        self.x_span().max(self.y_span())
    }

    pub fn center_x(&self) -> f64 {
        if self.min_x > self.max_x {
            0.0
        } else {
            (self.min_x + self.max_x) / 2.0
        }
    }

    pub fn center_y(&self) -> f64 {
        if self.min_y > self.max_y {
            0.0
        } else {
            (self.min_y + self.max_y) / 2.0
        }
    }

    /// Lowest Z seen, or 0 when the toolpath carries no Z words.
    pub fn lowest_z(&self) -> f64 {
        if self.min_z > self.max_z {
            0.0
        } else {
            self.min_z
        }
    }

    /// Highest Z seen, or 0 when the toolpath carries no Z words.
    pub fn highest_z(&self) -> f64 {
        if self.min_z > self.max_z {
            0.0
        } else {
            self.max_z
        }
    }
}

/// Pipe dimensions and joint anchor points, derived once from the
/// coordinate extents and immutable thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipeGeometry {
    /// Outer pipe diameter: the larger XY bounding-box span of the first part.
    pub diameter: f64,
    /// Assumed wall thickness (a ratio of the diameter, not measured).
    pub wall_thickness: f64,
    /// Rotation-axis origin: X of the first part's XY bounding-box center.
    pub pivot_x: f64,
    /// Rotation-axis origin: Y of the first part's XY bounding-box center.
    pub pivot_y: f64,
    /// Maximum Z of the first part.
    pub max_height: f64,
    /// Minimum Z of the joined (second) part, before re-basing.
    pub min_height_of_joined_part: f64,
}

/// Rigid rotation + translation welding a second toolpath onto a first.
///
/// Computed once from the tilt angle and [`PipeGeometry`], immutable.
/// The matrix is orthonormal; apply() maps a raw second-part point to its
/// welded position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RotationFrame {
    pub matrix: [[f64; 3]; 3],
    pub translation: [f64; 3],
}

impl RotationFrame {
    /// Rotation about the Y axis, matching the bend convention
    /// `new_x = x·cosθ − z·sinθ`, `new_z = x·sinθ + z·cosθ`.
    pub fn rotation_about_y(theta: f64) -> [[f64; 3]; 3] {
        let (sin, cos) = theta.sin_cos();
        [[cos, 0.0, -sin], [0.0, 1.0, 0.0], [sin, 0.0, cos]]
    }

    /// Compose a frame from a rotation matrix and a translation offset.
    pub fn new(matrix: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    /// Apply the frame to a point.
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            m[0][0] * point[0] + m[0][1] * point[1] + m[0][2] * point[2] + self.translation[0],
            m[1][0] * point[0] + m[1][1] * point[1] + m[1][2] * point[2] + self.translation[1],
            m[2][0] * point[0] + m[2][1] * point[1] + m[2][2] * point[2] + self.translation[2],
        ]
    }

    /// Whether the rotation part is the identity matrix.
    pub fn is_pure_translation(&self) -> bool {
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let m = &self.matrix;
        (0..3).all(|r| (0..3).all(|c| (m[r][c] - identity[r][c]).abs() < crate::config::EPS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp;

    #[test]
    fn test_rotation_about_y_quarter_turn() {
        let m = RotationFrame::rotation_about_y(std::f64::consts::FRAC_PI_2);
        let frame = RotationFrame::new(m, [0.0, 0.0, 0.0]);
        let p = frame.apply([10.0, 3.0, 0.0]);
        assert!(float_cmp::approx_eq(p[0], 0.0));
        assert!(float_cmp::approx_eq(p[1], 3.0));
        assert!(float_cmp::approx_eq(p[2], 10.0));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let m = RotationFrame::rotation_about_y(0.0);
        let frame = RotationFrame::new(m, [1.0, 2.0, 3.0]);
        assert!(frame.is_pure_translation());
        let p = frame.apply([5.0, 6.0, 7.0]);
        assert_eq!(p, [6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_empty_extents_report_zero() {
        let extents = Extents::scan(&[]);
        assert_eq!(extents.x_span(), 0.0);
        assert_eq!(extents.larger_xy_span(), 0.0);
        assert_eq!(extents.lowest_z(), 0.0);
        assert_eq!(extents.highest_z(), 0.0);
    }
}
