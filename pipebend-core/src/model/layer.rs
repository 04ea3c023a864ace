//! Layer table built by the analysis pass.

use serde::{Deserialize, Serialize};

/// One printed layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    /// Marker index as written in the `;LAYER:<n>` comment.
    pub index: i32,
    /// Maximum Z height observed before this layer's marker.
    /// Strictly non-decreasing with `index`.
    pub base_height: f64,
    /// Cumulative bend angle in radians scheduled for this layer.
    /// Monotone non-decreasing with `base_height`, in `[0, total_bend_angle]`.
    pub bend_angle: f64,
}

/// Ordered list of layers with the derived uniform layer height.
///
/// The layer height is the difference between the first two recorded base
/// heights and is assumed uniform across all layers; non-uniform layer
/// heights make the angle schedule only approximate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerTable {
    pub records: Vec<LayerRecord>,
    pub layer_height: f64,
}

impl LayerTable {
    /// Total printed height under the uniform-layer-height assumption.
    pub fn total_height(&self) -> f64 {
        self.records.len() as f64 * self.layer_height
    }

    /// Bend angle for the nth layer marker seen in the stream.
    ///
    /// Markers past the end of the table (impossible when the table was
    /// built from the same stream) keep the last scheduled angle.
    pub fn angle_for_marker(&self, occurrence: usize) -> f64 {
        self.records
            .get(occurrence)
            .or_else(|| self.records.last())
            .map(|r| r.bend_angle)
            .unwrap_or(0.0)
    }
}
