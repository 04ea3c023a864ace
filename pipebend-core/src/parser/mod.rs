//! G-code line tokenizer.

pub mod gcode;

pub use gcode::{parse_gcode, parse_gcode_file, parse_line, LAYER_MARKER_PREFIX};
