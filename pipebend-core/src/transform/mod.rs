//! Toolpath transforms: bend scheduling, bend projection, joint welding.

pub mod bend;
pub mod joint;
pub mod layers;

pub use bend::BendTransformer;
pub use joint::{JointGeometry, JointTransformer};
pub use layers::{analyze_layers, schedule_bend_angles};
