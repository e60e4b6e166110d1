//! Touch controller abstractions
//!
//! Two sampling models are supported:
//!
//! - Queued controllers (e.g. STMPE610) buffer points in a FIFO and are
//!   read over the bus shared with the display.
//! - Analog resistive panels are sampled directly through the ADC, one
//!   point per read.

/// Raw controller-space sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    /// Raw X reading
    pub x: i16,
    /// Raw Y reading
    pub y: i16,
    /// Pressure reading
    pub z: i16,
}

impl RawPoint {
    /// Create a new raw sample
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// Touch controller with a sample FIFO
pub trait QueuedTouch {
    /// Number of points waiting in the FIFO
    fn buffer_size(&mut self) -> u8;

    /// Pop one point from the FIFO
    fn get_point(&mut self) -> RawPoint;
}

/// Unbuffered analog resistive touch panel
pub trait AnalogTouch {
    /// Sample the panel once
    fn get_point(&mut self) -> RawPoint;

    /// Pressure below which a sample counts as "not touched"
    fn pressure_threshold(&self) -> i16;
}
