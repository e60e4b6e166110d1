//! Timer divider and compare selection
//!
//! Given a tick interval and the clock feeding a timer, pick the smallest
//! supported divider whose compare value fits the counter.

use tftglue_hal::timer::CounterWidth;

use crate::error::TickError;

/// Clock and counter characteristics of a hardware timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerClock {
    /// Timer input clock in Hz
    pub base_hz: u32,
    /// Counter width
    pub width: CounterWidth,
    /// Supported clock divisors, ascending
    pub divisors: &'static [u16],
}

impl TimerClock {
    /// SAMD TC channel on the 48 MHz generic clock, 16-bit mode
    pub const SAMD_TC: Self = Self {
        base_hz: 48_000_000,
        width: CounterWidth::Bits16,
        divisors: &[1, 2, 4, 8, 16, 64, 256],
    };

    /// nRF52 TIMER on the 16 MHz high-frequency clock, 16-bit mode
    pub const NRF_TIMER: Self = Self {
        base_hz: 16_000_000,
        width: CounterWidth::Bits16,
        divisors: &[1, 2, 4, 8, 16, 32, 64, 128, 256, 512],
    };
}

/// Derived timer programming for a tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    /// Tick interval in milliseconds
    pub interval_ms: u32,
    /// Selected clock divisor
    pub divider: u16,
    /// Compare-match value (counts per interval)
    pub compare: u32,
}

impl TickConfig {
    /// Select divider and compare value for `interval_ms` on `clock`
    ///
    /// Divisors are tried in ascending order so the finest resolution
    /// that fits the counter wins.
    pub fn derive(interval_ms: u32, clock: &TimerClock) -> Result<Self, TickError> {
        if interval_ms == 0 {
            return Err(TickError::ZeroInterval);
        }

        let max_count = clock.width.max_count() as u64;

        for &divider in clock.divisors {
            let counts = clock.base_hz as u64 / divider as u64 * interval_ms as u64 / 1000;

            if counts == 0 {
                // Larger divisors only shrink the count further
                return Err(TickError::IntervalTooShort);
            }

            if counts <= max_count {
                return Ok(Self {
                    interval_ms,
                    divider,
                    compare: counts as u32,
                });
            }
        }

        Err(TickError::NoDivider)
    }

    /// Prescaler exponent for timers that divide by powers of two
    pub fn prescaler_shift(&self) -> u8 {
        self.divider.trailing_zeros() as u8
    }

    /// Resulting tick rate in Hz
    pub fn tick_hz(&self, clock: &TimerClock) -> u32 {
        clock.base_hz / self.divider as u32 / self.compare
    }
}
