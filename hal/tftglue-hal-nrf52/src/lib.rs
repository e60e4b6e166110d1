//! nRF52-specific bindings for the tftglue renderer bridge
//!
//! Implements the `tftglue-hal` timer traits on the nRF52 TIMER peripheral
//! and its NVIC line, so the compare-timer tick backend can drive the
//! renderer clock.
//!
//! TIMER4 is the default: TIMER0 belongs to the SoftDevice and the lower
//! instances are often claimed by board support code.
//!
//! # Usage
//!
//! ```ignore
//! static CLOCK: MillisClock = MillisClock::new();
//! static TICK: Timer4Tick<MillisClock> = unsafe { timer4_tick(&CLOCK) };
//!
//! #[interrupt]
//! fn TIMER4() {
//!     TICK.on_interrupt();
//! }
//!
//! let mut glue = Glue::new(display, touch, &TICK, NoDelay, heapless::Vec::new());
//! glue.begin(&mut renderer, GlueConfig::default())?;
//! ```

#![no_std]

pub mod timer;

pub use timer::{Interrupt, Timer, Timer3, Timer4, TimerIrq};

use tftglue_core::renderer::TickSink;
use tftglue_core::tick::{CompareTick, TimerClock};

/// Compare-timer tick source on TIMER4
pub type Timer4Tick<S> = CompareTick<Timer4, TimerIrq, S>;

/// Tick source on TIMER4 feeding `sink`
///
/// # Safety
///
/// TIMER4 must not be used by anything else. See [`Timer::steal`].
pub const unsafe fn timer4_tick<S: TickSink>(sink: &'static S) -> Timer4Tick<S> {
    CompareTick::new(
        Timer4::steal(),
        TimerIrq::new(Interrupt::Timer4),
        TimerClock::NRF_TIMER,
        sink,
    )
}
