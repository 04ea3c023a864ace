//! Stacking merge: concatenate toolpath sections with rotary-axis headers.
//!
//! Each section is prefixed with a position/rotation-reset command of
//! exact form `G87 X0 Y0 Z<previous-section-max-Z> A0 B<tilt-degrees> C0`.
//! Argument layout and literal token order are a compatibility contract
//! with a downstream rotary-axis controller and must reproduce verbatim;
//! section bodies are emitted byte-for-byte.

use crate::config::StackConfig;
use crate::model::{Axis, GcodeLine};

use super::gcode::GcodeBuffer;

/// Maximum Z per section: the explicit fold consumed by the writer.
///
/// A section with no Z words reports 0.
pub fn section_max_heights(sections: &[Vec<GcodeLine>]) -> Vec<f64> {
    sections
        .iter()
        .map(|lines| {
            lines
                .iter()
                .filter_map(GcodeLine::as_move)
                .filter_map(|cmd| cmd.axis(Axis::Z))
                .fold(0.0, f64::max)
        })
        .collect()
}

/// Format a section height for the `G87` header.
///
/// Whole-number heights keep one decimal (`5.0`), matching the header
/// dialect the downstream controller was built against.
fn format_height(height: f64) -> String {
    if height == 0.0 {
        // A section that never moved in Z reports a bare 0.
        "0".to_string()
    } else if height.fract() == 0.0 {
        format!("{:.1}", height)
    } else {
        format!("{}", height)
    }
}

/// Format a tilt angle in degrees: whole numbers print bare (`30`, `-15`).
fn format_tilt(degrees: f64) -> String {
    if degrees.fract() == 0.0 {
        format!("{}", degrees as i64)
    } else {
        format!("{}", degrees)
    }
}

/// The rotary-axis reset header stamped before a section.
///
/// `previous_height` is the max Z of the section before this one; the
/// first section gets a literal `Z0`.
pub fn g87_header(previous_height: Option<f64>, tilt_degrees: f64) -> String {
    let z = match previous_height {
        None => "0".to_string(),
        Some(height) => format_height(height),
    };
    format!("G87 X0 Y0 Z{} A0 B{} C0", z, format_tilt(tilt_degrees))
}

/// Merge parsed sections into one output, headers between them.
pub fn stack_sections(sections: &[Vec<GcodeLine>], config: &StackConfig) -> String {
    let heights = section_max_heights(sections);

    let mut out = GcodeBuffer::new();
    for (i, section) in sections.iter().enumerate() {
        let previous_height = if i == 0 { None } else { Some(heights[i - 1]) };
        out.push_line(&g87_header(previous_height, config.tilt_for(i)));
        for line in section {
            out.push_line(line.raw());
        }
    }
    out.into_string()
}
