//! Touch calibration data types
//!
//! Raw controller readings are mapped to display coordinates through the
//! min/max readings observed at the panel edges.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw reading range of a touch panel
///
/// `x_*` and `y_*` refer to the controller's own axes, not the display's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// Raw X at the low edge
    pub x_min: i16,
    /// Raw X at the high edge
    pub x_max: i16,
    /// Raw Y at the low edge
    pub y_min: i16,
    /// Raw Y at the high edge
    pub y_max: i16,
}

/// Analog resistive panel read through the ADC
pub const ADC_CALIBRATION: Calibration = Calibration::new(325, 750, 240, 840);

/// FIFO touch controller (STMPE610 style, 12-bit)
pub const QUEUE_CALIBRATION: Calibration = Calibration::new(100, 3800, 100, 3750);

impl Calibration {
    /// Create a calibration from edge readings
    pub const fn new(x_min: i16, x_max: i16, y_min: i16, y_max: i16) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Check that both axes span a non-empty range
    pub const fn is_valid(&self) -> bool {
        self.x_min != self.x_max && self.y_min != self.y_max
    }

    /// Mirror a raw X reading within the calibrated range
    ///
    /// Used for panels whose raw X axis is wired reversed.
    pub fn mirror_x(&self, x: i16) -> i16 {
        let mirrored = self.x_min as i32 + self.x_max as i32 - x as i32;
        mirrored.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}
