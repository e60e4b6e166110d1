//! Hardware timer abstractions
//!
//! Two timer models back the renderer tick:
//!
//! - [`TimerCounter`]: a timer/counter channel with a selectable clock
//!   divider and a compare-match callback (SAMD TC style).
//! - [`CompareTimer`] + [`InterruptLine`]: a bare compare timer programmed
//!   register by register, with its interrupt line configured by hand
//!   (nRF52 TIMER style).
//!
//! Register-level methods take `&self` so the same handle can be shared
//! with the interrupt handler. Implementations are expected to be thin
//! wrappers over memory-mapped registers.

/// Counter width of a timer peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterWidth {
    /// 8-bit counter
    Bits8,
    /// 16-bit counter
    Bits16,
    /// 24-bit counter
    Bits24,
    /// 32-bit counter
    Bits32,
}

impl CounterWidth {
    /// Largest value the counter can hold
    pub const fn max_count(self) -> u32 {
        match self {
            CounterWidth::Bits8 => 0xFF,
            CounterWidth::Bits16 => 0xFFFF,
            CounterWidth::Bits24 => 0x00FF_FFFF,
            CounterWidth::Bits32 => 0xFFFF_FFFF,
        }
    }
}

/// Timer/counter channel with a clock divider and compare match
///
/// The counter restarts from zero on compare match (match-frequency
/// waveform), so the compare value sets the period.
pub trait TimerCounter {
    /// Configure divider and counter width, leaving the counter disabled
    ///
    /// `divider` is one of the divisors supported by the peripheral.
    fn configure(&self, divider: u16, width: CounterWidth);

    /// Set the compare value for a channel
    fn set_compare(&self, channel: u8, value: u32);

    /// Enable the compare-match interrupt for a channel
    fn enable_compare_interrupt(&self, channel: u8);

    /// Start or stop counting
    fn enable(&self, on: bool);

    /// Clear the compare-match flag for a channel
    ///
    /// Returns true if the flag was set.
    fn acknowledge(&self, channel: u8) -> bool;
}

/// Bare compare timer (nRF52 TIMER peripheral layout)
pub trait CompareTimer {
    /// Stop the timer
    fn stop(&self);

    /// Clear the counter
    fn clear(&self);

    /// Start the timer
    fn start(&self);

    /// Select timer mode (count clock ticks rather than external events)
    fn set_timer_mode(&self);

    /// Select the counter width
    fn set_bit_width(&self, width: CounterWidth);

    /// Set the prescaler exponent (clock divided by 2^`shift`)
    fn set_prescaler(&self, shift: u8);

    /// Set the compare 0 value
    fn set_compare(&self, value: u32);

    /// Clear the counter automatically on compare 0
    fn set_clear_on_compare(&self, enable: bool);

    /// Enable the compare 0 interrupt
    fn enable_compare_interrupt(&self);

    /// Clear the compare 0 event
    ///
    /// Returns true if the event was pending.
    fn take_compare_event(&self) -> bool;
}

/// Interrupt controller line for a timer
pub trait InterruptLine {
    /// Mask the interrupt
    fn disable(&self);

    /// Clear any pending request
    fn clear_pending(&self);

    /// Set the logical priority level (0 = highest)
    fn set_priority(&self, level: u8);

    /// Unmask the interrupt
    fn enable(&self);
}
