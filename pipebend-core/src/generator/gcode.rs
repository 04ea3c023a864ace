//! G-code serialization utilities.
//!
//! Rewritten motion lines are rebuilt from the command mnemonic and the
//! axis words in their original order; words no transform touched are
//! echoed from their original lexemes. Coordinates are emitted with 3
//! decimal places and flow with 5 — a compatibility contract with
//! downstream consumers, preserved exactly.

use std::fmt::Write;

use crate::model::{Axis, MotionCommand};

/// Format a coordinate value with the 3-decimal output contract.
pub fn format_coord(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

/// Format an extrusion value with the 5-decimal output contract.
pub fn format_flow(value: f64) -> String {
    let formatted = format!("{:.5}", value);
    if formatted == "-0.00000" {
        "0.00000".to_string()
    } else {
        formatted
    }
}

/// Format a number with no fixed precision: whole values print bare
/// (`2400`, `30`), fractional values print their shortest form.
pub fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < crate::config::EPS {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value)
    }
}

/// Replacement values for the axes a transform rewrote.
///
/// `None` means "keep the original lexeme". F has no slot: neither
/// transform ever rewrites feedrate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisOverrides {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
}

impl AxisOverrides {
    fn lookup(&self, axis: Axis) -> Option<String> {
        match axis {
            Axis::X => self.x.map(format_coord),
            Axis::Y => self.y.map(format_coord),
            Axis::Z => self.z.map(format_coord),
            Axis::E => self.e.map(format_flow),
            Axis::F => None,
        }
    }
}

/// Rebuild a motion line, substituting rewritten axis values.
///
/// Only axes present in the original command are emitted; word order and
/// any trailing comment are preserved.
pub fn rebuild_motion_line(cmd: &MotionCommand, overrides: &AxisOverrides) -> String {
    let mut line = cmd.mnemonic.clone();
    for word in &cmd.words {
        line.push(' ');
        match overrides.lookup(word.axis) {
            Some(value) => {
                line.push(word.axis.letter());
                line.push_str(&value);
            }
            None => line.push_str(&word.raw),
        }
    }
    if let Some(comment) = &cmd.comment {
        line.push(' ');
        line.push_str(comment);
    }
    line
}

/// Line-oriented output buffer.
///
/// The whole output is assembled in memory and written in one step by the
/// caller, so a failed transform never leaves a partial file that looks
/// complete.
#[derive(Debug, Default)]
pub struct GcodeBuffer {
    buffer: String,
}

impl GcodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one output line.
    pub fn push_line(&mut self, line: &str) {
        writeln!(self.buffer, "{}", line).unwrap();
    }

    /// Take the assembled output.
    pub fn into_string(self) -> String {
        self.buffer
    }
}
