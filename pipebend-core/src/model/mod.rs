//! Data model for toolpath transformation.
//!
//! Everything here is produced by a read-only analysis pass, frozen, then
//! consumed by the write pass. Nothing is mutated after construction.

pub mod command;
pub mod geometry;
pub mod layer;

pub use command::{Axis, AxisWord, CommandKind, GcodeLine, MotionCommand};
pub use geometry::{Extents, PipeGeometry, RotationFrame};
pub use layer::{LayerRecord, LayerTable};
