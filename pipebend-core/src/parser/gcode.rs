//! Tokenizer for the G-code motion dialect.
//!
//! Motion commands use rapid positioning (`G0`) and linear interpolation
//! (`G1`) codes; axis letters X, Y, Z, E, F are each immediately followed
//! by a signed decimal number with no separating space. Layer boundaries
//! are `;LAYER:<integer>` comments. All other lines pass through
//! byte-for-byte.
//!
//! Malformed-command policy lives here and nowhere else: an axis token
//! that is present but not parseable keeps the whole line raw and logs a
//! warning; the run is not aborted, since toolpaths intentionally contain
//! many lines this library does not interpret.

use std::path::Path;
use tracing::{debug, warn};

use crate::error::{PipebendError, Result};
use crate::model::{Axis, AxisWord, CommandKind, GcodeLine, MotionCommand};

/// Prefix of a layer-boundary comment.
pub const LAYER_MARKER_PREFIX: &str = ";LAYER:";

enum MotionParseError {
    /// An axis token was present but its number failed to parse.
    MalformedAxis(String),
    /// A word with a letter this dialect does not interpret (S, I, J, ...).
    UnknownWord(String),
}

fn command_kind(mnemonic: &str) -> CommandKind {
    match mnemonic {
        "G0" | "G00" => CommandKind::Rapid,
        "G1" | "G01" => CommandKind::Linear,
        _ => CommandKind::Other,
    }
}

fn is_mnemonic(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('G') | Some('M')) && {
        let rest: Vec<char> = chars.collect();
        !rest.is_empty() && rest.iter().all(|c| c.is_ascii_digit())
    }
}

fn parse_motion(line: &str) -> std::result::Result<Option<MotionCommand>, MotionParseError> {
    // Split off a trailing comment before tokenizing.
    let (code, comment) = match line.find(';') {
        Some(pos) => (&line[..pos], Some(line[pos..].to_string())),
        None => (line, None),
    };

    let mut tokens = code.split_whitespace();
    let mnemonic = match tokens.next() {
        Some(t) if is_mnemonic(t) => t.to_string(),
        _ => return Ok(None),
    };

    let mut words = Vec::new();
    for token in tokens {
        let mut chars = token.chars();
        let letter = chars.next().unwrap();
        match Axis::from_letter(letter) {
            Some(axis) => {
                let value: f64 = chars
                    .as_str()
                    .parse()
                    .map_err(|_| MotionParseError::MalformedAxis(token.to_string()))?;
                words.push(AxisWord {
                    axis,
                    value,
                    raw: token.to_string(),
                });
            }
            None => return Err(MotionParseError::UnknownWord(token.to_string())),
        }
    }

    Ok(Some(MotionCommand {
        kind: command_kind(&mnemonic),
        mnemonic,
        words,
        comment,
        raw: line.to_string(),
    }))
}

/// Parse a single input line.
pub fn parse_line(line: &str) -> GcodeLine {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix(LAYER_MARKER_PREFIX) {
        if let Ok(index) = rest.trim().parse::<i32>() {
            return GcodeLine::LayerMarker {
                index,
                raw: line.to_string(),
            };
        }
        // A layer comment without an integer is just a comment.
        return GcodeLine::Raw(line.to_string());
    }

    match parse_motion(trimmed) {
        Ok(Some(cmd)) => GcodeLine::Motion(cmd),
        Ok(None) => GcodeLine::Raw(line.to_string()),
        Err(MotionParseError::MalformedAxis(token)) => {
            warn!("malformed axis token '{}', passing line through: {}", token, trimmed);
            GcodeLine::Raw(line.to_string())
        }
        Err(MotionParseError::UnknownWord(token)) => {
            debug!("uninterpreted word '{}', passing line through: {}", token, trimmed);
            GcodeLine::Raw(line.to_string())
        }
    }
}

/// Parse full file content into lines.
pub fn parse_gcode(content: &str) -> Vec<GcodeLine> {
    content.lines().map(parse_line).collect()
}

/// Parse a G-code file from a path.
pub fn parse_gcode_file(path: &Path) -> Result<Vec<GcodeLine>> {
    if !path.exists() {
        return Err(PipebendError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(PipebendError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    Ok(parse_gcode(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_linear_move() {
        let line = parse_line("G1 X10.5 Y-2.0 Z0.2 E1.23456 F1500");
        let cmd = line.as_motion().expect("motion");
        assert_eq!(cmd.kind, CommandKind::Linear);
        assert_eq!(cmd.axis(Axis::X), Some(10.5));
        assert_eq!(cmd.axis(Axis::Y), Some(-2.0));
        assert_eq!(cmd.axis(Axis::Z), Some(0.2));
        assert_eq!(cmd.axis(Axis::E), Some(1.23456));
        assert_eq!(cmd.axis(Axis::F), Some(1500.0));
        assert!(cmd.has_xyz());
    }

    #[test]
    fn test_parse_rapid_with_leading_zero_code() {
        let line = parse_line("G00 X1 Y2 Z3");
        let cmd = line.as_motion().expect("motion");
        assert_eq!(cmd.kind, CommandKind::Rapid);
        assert_eq!(cmd.mnemonic, "G00");
    }

    #[test]
    fn test_parse_layer_marker() {
        match parse_line(";LAYER:42") {
            GcodeLine::LayerMarker { index, raw } => {
                assert_eq!(index, 42);
                assert_eq!(raw, ";LAYER:42");
            }
            other => panic!("expected layer marker, got {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_layer_comment_is_raw() {
        assert!(matches!(parse_line(";LAYER:top"), GcodeLine::Raw(_)));
    }

    #[test]
    fn test_malformed_axis_keeps_line_raw() {
        // Present-but-unparseable axis token: tolerated, passed through.
        assert!(matches!(parse_line("G1 X12.a Y3"), GcodeLine::Raw(_)));
    }

    #[test]
    fn test_uninterpreted_word_keeps_line_raw() {
        assert!(matches!(parse_line("M104 S200"), GcodeLine::Raw(_)));
        assert!(matches!(parse_line("G2 X1 Y1 I0.5 J0"), GcodeLine::Raw(_)));
    }

    #[test]
    fn test_extruder_reset_parses_as_other() {
        let cmd = parse_line("G92 E0");
        let cmd = cmd.as_motion().expect("motion");
        assert_eq!(cmd.kind, CommandKind::Other);
        assert_eq!(cmd.axis(Axis::E), Some(0.0));
        assert!(!cmd.is_move());
    }

    #[test]
    fn test_trailing_comment_is_split_off() {
        let line = parse_line("G1 X1 Y2 Z3 ; outer wall");
        let cmd = line.as_motion().expect("motion");
        assert_eq!(cmd.comment.as_deref(), Some("; outer wall"));
        assert_eq!(cmd.words.len(), 3);
    }

    #[test]
    fn test_plain_comment_and_blank_lines_are_raw() {
        assert!(matches!(parse_line("; just a comment"), GcodeLine::Raw(_)));
        assert!(matches!(parse_line(""), GcodeLine::Raw(_)));
        assert!(matches!(parse_line("T0"), GcodeLine::Raw(_)));
    }
}
