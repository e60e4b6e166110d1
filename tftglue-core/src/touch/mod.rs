//! Touch normalization
//!
//! Converts raw controller samples into display-space pointer events for
//! the renderer. Two controller families are supported:
//!
//! - queued controllers with a sample FIFO, read over the shared bus
//! - analog resistive panels read through the ADC, debounced on release
//!
//! The last pressed position is retained so a release reports where the
//! finger lifted.

mod analog;
mod queued;
pub mod remap;

pub use remap::{map_range, Axis, AxisMap, RemapTable, ANALOG_REMAP, QUEUED_REMAP};

use tftglue_hal::touch::{AnalogTouch, QueuedTouch, RawPoint};

use crate::config::{Calibration, TouchConfig};
use crate::renderer::Point;

/// Attached touch controller
pub enum TouchInput<Q, A> {
    /// No touch panel
    None,
    /// Queued (FIFO) controller
    Queued(Q),
    /// Analog resistive panel
    Analog(A),
}

impl TouchInput<NoTouch, NoTouch> {
    /// No touch panel
    pub const fn none() -> Self {
        TouchInput::None
    }
}

impl<Q, A> TouchInput<Q, A> {
    /// A touch controller is attached
    pub fn is_present(&self) -> bool {
        !matches!(self, TouchInput::None)
    }

    /// Calibration in `config` that applies to this controller
    pub fn calibration<'a>(&self, config: &'a TouchConfig) -> Option<&'a Calibration> {
        match self {
            TouchInput::None => None,
            TouchInput::Queued(_) => Some(&config.queued),
            TouchInput::Analog(_) => Some(&config.analog),
        }
    }
}

/// Placeholder for an absent touch controller type
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTouch;

impl QueuedTouch for NoTouch {
    fn buffer_size(&mut self) -> u8 {
        0
    }

    fn get_point(&mut self) -> RawPoint {
        RawPoint::default()
    }
}

impl AnalogTouch for NoTouch {
    fn get_point(&mut self) -> RawPoint {
        RawPoint::default()
    }

    fn pressure_threshold(&self) -> i16 {
        i16::MAX
    }
}

/// Pointer state carried between reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchState {
    /// Last pressed position
    pub last: Point,
    /// Consecutive low-pressure analog polls, saturating
    pub release_count: u8,
}

/// Turns raw samples into pointer events
#[derive(Debug, Clone)]
pub struct TouchNormalizer {
    config: TouchConfig,
    state: TouchState,
}

impl TouchNormalizer {
    /// Create a normalizer in the released state
    pub fn new(config: TouchConfig) -> Self {
        Self {
            state: TouchState {
                last: Point::default(),
                // Start out released rather than pressed at the origin
                release_count: config.release_polls,
            },
            config,
        }
    }

    /// Carried state
    pub fn state(&self) -> &TouchState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &TouchConfig {
        &self.config
    }
}
