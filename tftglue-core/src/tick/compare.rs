//! Bare compare-timer tick backend
//!
//! Programs a compare timer register by register and sets up its interrupt
//! line manually. The counter clears itself on compare so each event marks
//! exactly one interval. The interrupt handler must call
//! [`CompareTick::on_interrupt`].

use portable_atomic::{AtomicU32, Ordering};
use tftglue_hal::timer::{CompareTimer, InterruptLine};

use super::clock::{TickConfig, TimerClock};
use super::TickBackend;
use crate::error::GlueError;
use crate::renderer::TickSink;

/// Interrupt priority that stays clear of a radio stack's reserved levels
///
/// The nRF52 SoftDevice owns levels 0, 1 and 4.
pub const RADIO_SAFE_PRIORITY: u8 = 2;

/// Tick source on a bare compare timer
pub struct CompareTick<T, I, S: 'static> {
    timer: T,
    irq: I,
    clock: TimerClock,
    priority: u8,
    sink: &'static S,
    /// Active interval, zero while stopped
    interval_ms: AtomicU32,
}

impl<T: CompareTimer, I: InterruptLine, S: TickSink> CompareTick<T, I, S> {
    /// Create a stopped tick source at [`RADIO_SAFE_PRIORITY`]
    pub const fn new(timer: T, irq: I, clock: TimerClock, sink: &'static S) -> Self {
        Self {
            timer,
            irq,
            clock,
            priority: RADIO_SAFE_PRIORITY,
            sink,
            interval_ms: AtomicU32::new(0),
        }
    }

    /// Use a different interrupt priority
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Compare interrupt handler body
    pub fn on_interrupt(&self) {
        if !self.timer.take_compare_event() {
            return;
        }

        let interval_ms = self.interval_ms.load(Ordering::Acquire);
        if interval_ms != 0 {
            self.sink.tick_inc(interval_ms);
        }
    }

    /// Program the timer, unmask its interrupt and start it
    pub fn program(&self, interval_ms: u32) -> Result<TickConfig, GlueError> {
        let config = TickConfig::derive(interval_ms, &self.clock)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tick: prescaler 2^{} compare {} priority {}",
            config.prescaler_shift(),
            config.compare,
            self.priority
        );

        self.timer.stop();
        self.timer.set_timer_mode();
        self.timer.clear();
        self.timer.set_bit_width(self.clock.width);
        self.timer.set_prescaler(config.prescaler_shift());
        self.timer.enable_compare_interrupt();
        self.timer.set_compare(config.compare);
        self.timer.set_clear_on_compare(true);
        self.interval_ms.store(interval_ms, Ordering::Release);

        self.irq.disable();
        self.irq.clear_pending();
        self.irq.set_priority(self.priority);
        self.irq.enable();

        self.timer.start();

        Ok(config)
    }

    /// Stop the timer and mask its interrupt
    pub fn halt(&self) {
        self.timer.stop();
        self.irq.disable();
        self.interval_ms.store(0, Ordering::Release);
    }

    /// Whether the timer is running
    pub fn is_running(&self) -> bool {
        self.interval_ms.load(Ordering::Acquire) != 0
    }

    /// The underlying timer
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The interrupt line
    pub fn irq(&self) -> &I {
        &self.irq
    }
}

impl<T: CompareTimer, I: InterruptLine, S: TickSink> TickBackend for &CompareTick<T, I, S> {
    fn start(&mut self, interval_ms: u32) -> Result<(), GlueError> {
        self.program(interval_ms).map(|_| ())
    }

    fn stop(&mut self) {
        self.halt();
    }
}
