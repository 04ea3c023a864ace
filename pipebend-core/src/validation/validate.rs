//! Toolpath sanity checks run before any output is assembled.
//!
//! Warnings flag inputs that will process but probably not the way the
//! caller expects; they are logged and the run continues. Hard geometry
//! failures are not detected here — the transforms raise those themselves
//! before the write pass starts.

use crate::model::{Axis, GcodeLine};

/// Validation outcome with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }
}

/// Check a parsed toolpath for suspicious shapes.
pub fn validate_toolpath(lines: &[GcodeLine]) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let moves = lines.iter().filter_map(GcodeLine::as_move).count();
    if moves == 0 {
        result.add_warning("toolpath contains no rapid or linear moves; nothing will transform");
    }

    let extrusions = lines
        .iter()
        .filter_map(GcodeLine::as_move)
        .filter(|cmd| cmd.axis(Axis::E).is_some())
        .count();
    if moves > 0 && extrusions == 0 {
        result.add_warning("toolpath contains no extrusion moves");
    }

    let markers: Vec<i32> = lines
        .iter()
        .filter_map(|line| match line {
            GcodeLine::LayerMarker { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    if markers.windows(2).any(|pair| pair[1] <= pair[0]) {
        result.add_warning("layer marker indices are not strictly increasing");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_gcode;

    #[test]
    fn test_clean_toolpath_passes_quietly() {
        let lines = parse_gcode(";LAYER:0\nG1 X1 Y1 Z0.2 E0.5\n;LAYER:1\nG1 X2 Y1 Z0.4 E1.0");
        let result = validate_toolpath(&lines);
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_warnings_for_suspicious_input() {
        let result = validate_toolpath(&parse_gcode("; comments only"));
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 1);

        let result = validate_toolpath(&parse_gcode(";LAYER:3\nG1 X1 Y1 Z0.2\n;LAYER:2"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("not strictly increasing")));
    }
}
