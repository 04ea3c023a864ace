//! Motion command model: one typed partial-axis record per G-code line.

use serde::{Deserialize, Serialize};

/// Axis letter of a motion word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    /// Extruder position.
    E,
    /// Feedrate.
    F,
}

impl Axis {
    /// Parse an axis from its letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'X' => Some(Axis::X),
            'Y' => Some(Axis::Y),
            'Z' => Some(Axis::Z),
            'E' => Some(Axis::E),
            'F' => Some(Axis::F),
            _ => None,
        }
    }

    /// The axis letter.
    pub fn letter(&self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::E => 'E',
            Axis::F => 'F',
        }
    }
}

/// One axis word as it appeared on a motion line, e.g. `X12.5`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisWord {
    pub axis: Axis,
    pub value: f64,
    /// The original lexeme. Words a transform does not rewrite are
    /// re-emitted from this, byte-for-byte.
    pub raw: String,
}

/// Kind of motion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    /// Rapid positioning (G0).
    Rapid,
    /// Linear interpolation (G1).
    Linear,
    /// Any other G/M command carrying axis words (e.g. G92).
    Other,
}

/// A parsed motion line.
///
/// Axes absent from the source line are absent, not zero; the transforms
/// must distinguish "not present" from "present with value 0".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionCommand {
    pub kind: CommandKind,
    /// Command mnemonic as written, e.g. `G1` or `G01`.
    pub mnemonic: String,
    /// Axis words in source order.
    pub words: Vec<AxisWord>,
    /// Trailing comment (from `;` to end of line), re-attached on output.
    pub comment: Option<String>,
    /// The full original line.
    pub raw: String,
}

impl MotionCommand {
    /// Value of an axis, if the command carries it.
    pub fn axis(&self, axis: Axis) -> Option<f64> {
        self.words.iter().find(|w| w.axis == axis).map(|w| w.value)
    }

    /// Whether the command carries X, Y and Z simultaneously.
    pub fn has_xyz(&self) -> bool {
        self.axis(Axis::X).is_some() && self.axis(Axis::Y).is_some() && self.axis(Axis::Z).is_some()
    }

    /// Whether the command carries any of X, Y, Z.
    pub fn has_any_position(&self) -> bool {
        self.axis(Axis::X).is_some() || self.axis(Axis::Y).is_some() || self.axis(Axis::Z).is_some()
    }

    /// Whether this is a movement command (rapid or linear).
    pub fn is_move(&self) -> bool {
        matches!(self.kind, CommandKind::Rapid | CommandKind::Linear)
    }
}

/// One parsed input line.
///
/// Anything the tokenizer does not interpret — including motion lines with
/// an unparseable axis token — stays [`GcodeLine::Raw`] and passes through
/// byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GcodeLine {
    Motion(MotionCommand),
    /// A `;LAYER:<n>` boundary comment.
    LayerMarker { index: i32, raw: String },
    Raw(String),
}

impl GcodeLine {
    /// The original line text.
    pub fn raw(&self) -> &str {
        match self {
            GcodeLine::Motion(cmd) => &cmd.raw,
            GcodeLine::LayerMarker { raw, .. } => raw,
            GcodeLine::Raw(raw) => raw,
        }
    }

    /// The motion command, if this line is one.
    pub fn as_motion(&self) -> Option<&MotionCommand> {
        match self {
            GcodeLine::Motion(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// The motion command, if this line is a rapid or linear move.
    pub fn as_move(&self) -> Option<&MotionCommand> {
        self.as_motion().filter(|cmd| cmd.is_move())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(axis: Axis, value: f64, raw: &str) -> AxisWord {
        AxisWord {
            axis,
            value,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_axis_lookup_distinguishes_absent_from_zero() {
        let cmd = MotionCommand {
            kind: CommandKind::Linear,
            mnemonic: "G1".to_string(),
            words: vec![word(Axis::X, 0.0, "X0")],
            comment: None,
            raw: "G1 X0".to_string(),
        };
        assert_eq!(cmd.axis(Axis::X), Some(0.0));
        assert_eq!(cmd.axis(Axis::Y), None);
        assert!(!cmd.has_xyz());
    }

    #[test]
    fn test_axis_letters() {
        for c in ['X', 'Y', 'Z', 'E', 'F'] {
            assert_eq!(Axis::from_letter(c).unwrap().letter(), c);
        }
        assert!(Axis::from_letter('S').is_none());
    }
}
