//! Session configuration types
//!
//! Everything here is fixed once a session is started.

use super::calibration::{Calibration, ADC_CALIBRATION, QUEUE_CALIBRATION};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Renderer tick interval in milliseconds
///
/// The renderer recommends 1 to 10 ms.
pub const TICK_INTERVAL_MS: u32 = 10;

/// Staging buffer rows on most parts
pub const DEFAULT_BUFFER_ROWS: u16 = 8;

/// Staging buffer rows on parts short on RAM (SAMD21)
pub const SMALL_RAM_BUFFER_ROWS: u16 = 4;

/// Consecutive low-pressure polls before an analog touch counts as released
pub const RELEASE_DEBOUNCE_POLLS: u8 = 4;

/// Panel dimension whose queued controller reports a reversed raw X axis
pub const WIDE_PANEL_SIZE: u16 = 480;

/// Platform workarounds for queued touch controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchQuirks {
    /// Pause after reading what looks like the last queued point
    ///
    /// Some platforms read the FIFO depth too early and report a false
    /// release. Waiting lets further points accumulate.
    pub drained_settle_ms: Option<u32>,
}

impl TouchQuirks {
    /// No workarounds
    pub const NONE: Self = Self {
        drained_settle_ms: None,
    };

    /// nRF52: FIFO depth is not always polled correctly
    pub const NRF52: Self = Self {
        drained_settle_ms: Some(50),
    };
}

/// Touch normalization configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchConfig {
    /// Calibration for analog resistive panels
    pub analog: Calibration,
    /// Calibration for queued controllers
    pub queued: Calibration,
    /// Low-pressure polls required before reporting release
    pub release_polls: u8,
    /// Panel size (either axis) that triggers the raw X mirror correction
    pub wide_panel_size: u16,
    /// Platform workarounds
    pub quirks: TouchQuirks,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            analog: ADC_CALIBRATION,
            queued: QUEUE_CALIBRATION,
            release_polls: RELEASE_DEBOUNCE_POLLS,
            wide_panel_size: WIDE_PANEL_SIZE,
            quirks: TouchQuirks::NONE,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlueConfig {
    /// Forward renderer log output and emit session traces
    pub debug: bool,
    /// Tick interval in milliseconds
    pub tick_interval_ms: u32,
    /// Rows of pixels per staging buffer
    pub buffer_rows: u16,
    /// Allocate a second staging buffer so rendering overlaps DMA
    pub double_buffer: bool,
    /// Size announced to the renderer instead of the driver's
    ///
    /// Some drivers are rigged to a larger panel than the visible area
    /// (e.g. 240x240 glass on a 240x320 controller).
    pub renderer_size: Option<(u16, u16)>,
    /// Touch normalization settings
    pub touch: TouchConfig,
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self {
            debug: false,
            tick_interval_ms: TICK_INTERVAL_MS,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            double_buffer: true,
            renderer_size: None,
            touch: TouchConfig::default(),
        }
    }
}

impl GlueConfig {
    /// Configuration for parts short on RAM
    pub fn small_ram() -> Self {
        Self {
            buffer_rows: SMALL_RAM_BUFFER_ROWS,
            ..Self::default()
        }
    }

    /// Number of pixels in one staging buffer for a display width
    pub fn buffer_pixels(&self, width: u16) -> usize {
        width as usize * self.buffer_rows as usize
    }

    /// Number of pixels in the whole staging area (both halves if doubled)
    pub fn staging_pixels(&self, width: u16) -> usize {
        let single = self.buffer_pixels(width);
        if self.double_buffer {
            single * 2
        } else {
            single
        }
    }
}
