//! Raw-to-display coordinate mapping
//!
//! Each controller family has its own orientation at rotation 0. A
//! [`RemapTable`] lists, per display rotation, which raw axis feeds each
//! display axis and whether that raw axis runs backwards.
//!
//! | rot | analog x | analog y | queued x | queued y |
//! |-----|----------|----------|----------|----------|
//! | 0   | X        | Y rev    | X rev    | Y        |
//! | 1   | Y rev    | X rev    | Y        | X        |
//! | 2   | X rev    | Y        | X        | Y rev    |
//! | 3   | Y        | X        | Y rev    | X rev    |

use tftglue_hal::display::Rotation;
use tftglue_hal::touch::RawPoint;

use crate::config::Calibration;
use crate::renderer::Point;

/// Raw controller axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Raw X
    X,
    /// Raw Y
    Y,
}

/// Source of one display axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMap {
    /// Raw axis read
    pub source: Axis,
    /// Raw max maps to display 0
    pub reversed: bool,
}

const fn axis(source: Axis, reversed: bool) -> AxisMap {
    AxisMap { source, reversed }
}

/// Per-rotation `[x, y]` axis sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapTable {
    rows: [[AxisMap; 2]; 4],
}

/// Analog resistive panels
pub const ANALOG_REMAP: RemapTable = RemapTable {
    rows: [
        [axis(Axis::X, false), axis(Axis::Y, true)],
        [axis(Axis::Y, true), axis(Axis::X, true)],
        [axis(Axis::X, true), axis(Axis::Y, false)],
        [axis(Axis::Y, false), axis(Axis::X, false)],
    ],
};

/// Queued (FIFO) touch controllers
pub const QUEUED_REMAP: RemapTable = RemapTable {
    rows: [
        [axis(Axis::X, true), axis(Axis::Y, false)],
        [axis(Axis::Y, false), axis(Axis::X, false)],
        [axis(Axis::X, false), axis(Axis::Y, true)],
        [axis(Axis::Y, true), axis(Axis::X, true)],
    ],
};

/// Linear map of `value` from `[in_lo, in_hi]` to `[out_lo, out_hi]`
///
/// Either range may run backwards. The result is clamped to the output
/// range; a degenerate input range maps everything to `out_lo`.
pub fn map_range(value: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    if in_lo == in_hi {
        return out_lo;
    }

    // Both spans can reach 2^32, so the product needs 128 bits
    let mapped = (value as i128 - in_lo as i128) * (out_hi as i128 - out_lo as i128)
        / (in_hi as i128 - in_lo as i128)
        + out_lo as i128;
    mapped.clamp(out_lo.min(out_hi) as i128, out_lo.max(out_hi) as i128) as i32
}

impl RemapTable {
    /// Axis sources for a rotation
    pub fn row(&self, rotation: Rotation) -> [AxisMap; 2] {
        self.rows[rotation.index() as usize]
    }

    /// Map a raw sample to display coordinates
    ///
    /// `width` and `height` are the display size in the given rotation.
    pub fn remap(
        &self,
        raw: RawPoint,
        calibration: &Calibration,
        rotation: Rotation,
        width: u16,
        height: u16,
    ) -> Point {
        let [x_map, y_map] = self.row(rotation);
        Point::new(
            map_axis(x_map, raw, calibration, width),
            map_axis(y_map, raw, calibration, height),
        )
    }
}

fn map_axis(map: AxisMap, raw: RawPoint, calibration: &Calibration, extent: u16) -> i16 {
    let (value, lo, hi) = match map.source {
        Axis::X => (raw.x, calibration.x_min, calibration.x_max),
        Axis::Y => (raw.y, calibration.y_min, calibration.y_max),
    };
    let (lo, hi) = if map.reversed { (hi, lo) } else { (lo, hi) };
    // Display coordinates are i16
    let max = (extent.saturating_sub(1) as i32).min(i16::MAX as i32);

    map_range(value as i32, lo as i32, hi as i32, 0, max) as i16
}
