//! Layer analysis and bend-angle scheduling.

use crate::config::float_cmp;
use crate::error::{PipebendError, Result};
use crate::model::{Axis, GcodeLine, LayerRecord, LayerTable};

/// Build the layer table from a parsed toolpath.
///
/// Single sequential pass: each `;LAYER:<n>` marker records the maximum Z
/// observed so far as that layer's base height. The layer height is taken
/// from the difference between the first two base heights and assumed
/// uniform across all layers; toolpaths with non-uniform layer heights get
/// an approximate schedule.
pub fn analyze_layers(lines: &[GcodeLine]) -> Result<LayerTable> {
    let mut records = Vec::new();
    let mut max_z: f64 = 0.0;

    for line in lines {
        match line {
            GcodeLine::Motion(cmd) if cmd.is_move() => {
                if let Some(z) = cmd.axis(Axis::Z) {
                    max_z = max_z.max(z);
                }
            }
            GcodeLine::LayerMarker { index, .. } => {
                records.push(LayerRecord {
                    index: *index,
                    base_height: max_z,
                    bend_angle: 0.0,
                });
            }
            _ => {}
        }
    }

    if records.len() < 2 {
        return Err(PipebendError::InsufficientLayers {
            found: records.len(),
        });
    }

    let layer_height = records[1].base_height - records[0].base_height;
    Ok(LayerTable {
        records,
        layer_height,
    })
}

/// Distribute a total bend angle across the layers, proportional to each
/// layer's height fraction.
pub fn schedule_bend_angles(table: &mut LayerTable, total_bend_angle: f64) -> Result<()> {
    let total_height = table.total_height();
    if float_cmp::approx_zero(total_height) {
        return Err(PipebendError::ZeroTotalHeight);
    }

    for record in &mut table.records {
        record.bend_angle = record.base_height / total_height * total_bend_angle;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_gcode;
    use pretty_assertions::assert_eq;

    const TWO_LAYERS: &str = "\
;LAYER:0
G1 X10.0 Y0.0 Z0.2 E1.0
;LAYER:1
G1 X10.0 Y0.0 Z0.4 E2.0
";

    #[test]
    fn test_base_heights_from_markers() {
        let table = analyze_layers(&parse_gcode(TWO_LAYERS)).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].base_height, 0.0);
        assert_eq!(table.records[1].base_height, 0.2);
        assert_eq!(table.layer_height, 0.2);
        assert_eq!(table.total_height(), 0.4);
    }

    #[test]
    fn test_single_marker_is_insufficient() {
        let lines = parse_gcode(";LAYER:0\nG1 X1 Y1 Z0.2 E1");
        match analyze_layers(&lines) {
            Err(PipebendError::InsufficientLayers { found }) => assert_eq!(found, 1),
            other => panic!("expected InsufficientLayers, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_is_height_proportional() {
        let mut table = analyze_layers(&parse_gcode(TWO_LAYERS)).unwrap();
        schedule_bend_angles(&mut table, 1.0).unwrap();
        assert_eq!(table.records[0].bend_angle, 0.0);
        // base 0.2 of total 0.4
        assert_eq!(table.records[1].bend_angle, 0.5);
    }

    #[test]
    fn test_zero_total_height_is_degenerate() {
        // Two markers with no Z motion in between: layer height 0.
        let mut table = analyze_layers(&parse_gcode(";LAYER:0\n;LAYER:1")).unwrap();
        match schedule_bend_angles(&mut table, 1.0) {
            Err(PipebendError::ZeroTotalHeight) => {}
            other => panic!("expected ZeroTotalHeight, got {:?}", other),
        }
    }
}
