//! Timer/counter tick backend
//!
//! Programs a timer/counter channel in match-frequency mode and forwards
//! each compare match to the tick sink. The interrupt handler must call
//! [`CounterTick::on_interrupt`].

use portable_atomic::{AtomicU32, Ordering};
use tftglue_hal::timer::TimerCounter;

use super::clock::{TickConfig, TimerClock};
use super::TickBackend;
use crate::error::GlueError;
use crate::renderer::TickSink;

/// Compare channel used for the tick
pub const TICK_CHANNEL: u8 = 0;

/// Tick source on a divider-based timer/counter
pub struct CounterTick<T, S: 'static> {
    timer: T,
    clock: TimerClock,
    sink: &'static S,
    /// Active interval, zero while stopped
    interval_ms: AtomicU32,
}

impl<T: TimerCounter, S: TickSink> CounterTick<T, S> {
    /// Create a stopped tick source
    pub const fn new(timer: T, clock: TimerClock, sink: &'static S) -> Self {
        Self {
            timer,
            clock,
            sink,
            interval_ms: AtomicU32::new(0),
        }
    }

    /// Compare-match interrupt handler body
    pub fn on_interrupt(&self) {
        if !self.timer.acknowledge(TICK_CHANNEL) {
            return;
        }

        let interval_ms = self.interval_ms.load(Ordering::Acquire);
        if interval_ms != 0 {
            self.sink.tick_inc(interval_ms);
        }
    }

    /// Program and enable the timer
    pub fn program(&self, interval_ms: u32) -> Result<TickConfig, GlueError> {
        let config = TickConfig::derive(interval_ms, &self.clock)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tick: divider {} compare {}",
            config.divider,
            config.compare
        );

        self.timer.configure(config.divider, self.clock.width);
        self.timer.set_compare(TICK_CHANNEL, config.compare);
        self.timer.enable_compare_interrupt(TICK_CHANNEL);
        self.interval_ms.store(interval_ms, Ordering::Release);
        self.timer.enable(true);

        Ok(config)
    }

    /// Disable the timer
    pub fn halt(&self) {
        self.timer.enable(false);
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
}

impl<T: TimerCounter, S: TickSink> TickBackend for &CounterTick<T, S> {
    fn start(&mut self, interval_ms: u32) -> Result<(), GlueError> {
        self.program(interval_ms).map(|_| ())
    }

    fn stop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TickError;
    use crate::renderer::MillisClock;
    use core::cell::RefCell;
    use std::vec::Vec;
    use tftglue_hal::timer::CounterWidth;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Configure(u16, CounterWidth),
        Compare(u8, u32),
        IrqEnable(u8),
        Enable(bool),
    }

    #[derive(Default)]
    struct MockCounter {
        ops: RefCell<Vec<Op>>,
        flag: RefCell<bool>,
    }

    impl MockCounter {
        fn fire(&self) {
            *self.flag.borrow_mut() = true;
        }
    }

    impl TimerCounter for MockCounter {
        fn configure(&self, divider: u16, width: CounterWidth) {
            self.ops.borrow_mut().push(Op::Configure(divider, width));
        }

        fn set_compare(&self, channel: u8, value: u32) {
            self.ops.borrow_mut().push(Op::Compare(channel, value));
        }

        fn enable_compare_interrupt(&self, channel: u8) {
            self.ops.borrow_mut().push(Op::IrqEnable(channel));
        }

        fn enable(&self, on: bool) {
            self.ops.borrow_mut().push(Op::Enable(on));
        }

        fn acknowledge(&self, _channel: u8) -> bool {
            self.flag.replace(false)
        }
    }

    fn leak_clock() -> &'static MillisClock {
        std::boxed::Box::leak(std::boxed::Box::new(MillisClock::new()))
    }

    #[test]
    fn test_program_sequence() {
        let tick = CounterTick::new(MockCounter::default(), TimerClock::SAMD_TC, leak_clock());
        let mut backend = &tick;
        backend.start(10).unwrap();

        assert_eq!(
            *tick.timer().ops.borrow(),
            [
                Op::Configure(8, CounterWidth::Bits16),
                Op::Compare(0, 60_000),
                Op::IrqEnable(0),
                Op::Enable(true),
            ]
        );
        assert!(tick.is_running());
    }

    #[test]
    fn test_each_match_ticks_once() {
        let clock = leak_clock();
        let tick = CounterTick::new(MockCounter::default(), TimerClock::SAMD_TC, clock);
        tick.program(10).unwrap();

        for _ in 0..5 {
            tick.timer().fire();
            tick.on_interrupt();
        }
        assert_eq!(clock.now_ms(), 50);

        // Spurious entry without a pending match
        tick.on_interrupt();
        assert_eq!(clock.now_ms(), 50);
    }

    #[test]
    fn test_stop_silences_ticks() {
        let clock = leak_clock();
        let tick = CounterTick::new(MockCounter::default(), TimerClock::SAMD_TC, clock);
        let mut backend = &tick;
        backend.start(10).unwrap();
        backend.stop();

        assert!(!tick.is_running());
        assert_eq!(tick.timer().ops.borrow().last(), Some(&Op::Enable(false)));

        tick.timer().fire();
        tick.on_interrupt();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_unreachable_interval_leaves_timer_untouched() {
        let tick = CounterTick::new(MockCounter::default(), TimerClock::SAMD_TC, leak_clock());
        let mut backend = &tick;

        assert_eq!(
            backend.start(1000),
            Err(GlueError::TimerConfig(TickError::NoDivider))
        );
        assert!(tick.timer().ops.borrow().is_empty());
    }
}
