//! Renderer tick sources
//!
//! A tick backend advances the renderer clock by the configured interval
//! on every timer period. One backend is picked per build by the type
//! parameter of [`Glue`](crate::glue::Glue):
//!
//! - [`CounterTick`]: timer/counter with divider search (SAMD)
//! - [`RtosTick`]: periodic software timer plus a pinned renderer task (ESP32)
//! - [`CompareTick`]: bare compare timer with manual interrupt setup (nRF52)
//!
//! The hardware backends are shared with an interrupt handler, so they are
//! used through a `&'static` reference and implement [`TickBackend`] for it.

mod clock;
mod compare;
mod counter;
mod rtos;
#[cfg(any(test, feature = "std"))]
mod std_rtos;

pub use clock::{TickConfig, TimerClock};
pub use compare::{CompareTick, RADIO_SAFE_PRIORITY};
pub use counter::{CounterTick, TICK_CHANNEL};
pub use rtos::{GuiGuard, GuiLock, RtosTick, GUI_TASK};
#[cfg(any(test, feature = "std"))]
pub use std_rtos::{StdRtos, StdSemaphore, StdTimer};

use crate::error::GlueError;

/// Periodic source of renderer ticks
pub trait TickBackend {
    /// Program the source to tick every `interval_ms` milliseconds
    ///
    /// Ticks begin once this returns `Ok`.
    fn start(&mut self, interval_ms: u32) -> Result<(), GlueError>;

    /// Stop ticking
    fn stop(&mut self);
}

/// Tick source that never fires
///
/// For hosts where the renderer clock is advanced elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualTick;

impl TickBackend for ManualTick {
    fn start(&mut self, _interval_ms: u32) -> Result<(), GlueError> {
        Ok(())
    }

    fn stop(&mut self) {}
}
