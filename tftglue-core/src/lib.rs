//! Board-agnostic core of the tftglue renderer bridge
//!
//! Connects an immediate-mode GUI renderer to a TFT display driver and an
//! optional touch controller:
//!
//! - Renderer tick sources (timer/counter, compare timer, RTOS task)
//! - Flush sequencing with DMA overlap and shared-bus arbitration
//! - Touch normalization (calibration, rotation, release debounce)
//! - Session lifecycle and configuration
//!
//! Hardware is reached only through the traits in `tftglue-hal`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod error;
pub mod flush;
pub mod glue;
pub mod renderer;
pub mod tick;
pub mod touch;

pub use error::{GlueError, GlueStatus, TickError};
pub use glue::{BufferIndex, Glue, GlueParts, NoDelay};
pub use renderer::{Area, FlushReady, InputData, MillisClock, Point, PointerState, Renderer, TickSink};
pub use tick::TickBackend;
pub use touch::{NoTouch, TouchInput};
