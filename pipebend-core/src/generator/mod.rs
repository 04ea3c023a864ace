//! Output serialization for transformed toolpaths.

pub mod gcode;
pub mod stack;

pub use gcode::{
    format_coord, format_flow, format_number, rebuild_motion_line, AxisOverrides, GcodeBuffer,
};
pub use stack::{section_max_heights, stack_sections};
