//! TIMER peripheral and NVIC line bindings
//!
//! Register-level access to the nRF52 TIMER block, enough to run it as a
//! periodic compare timer. Only compare channel 0 is used.

use core::ptr;

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use portable_atomic::{AtomicBool, Ordering};
use tftglue_hal::timer::{CompareTimer, CounterWidth, InterruptLine};

/// TIMER3 base address
pub const TIMER3_BASE: usize = 0x4001_A000;
/// TIMER4 base address
pub const TIMER4_BASE: usize = 0x4001_B000;

// Register offsets
const TASKS_START: usize = 0x000;
const TASKS_STOP: usize = 0x004;
const TASKS_CLEAR: usize = 0x00C;
const EVENTS_COMPARE0: usize = 0x140;
const SHORTS: usize = 0x200;
const INTENSET: usize = 0x304;
const MODE: usize = 0x504;
const BITMODE: usize = 0x508;
const PRESCALER: usize = 0x510;
const CC0: usize = 0x540;

const SHORTS_COMPARE0_CLEAR: u32 = 1 << 0;
const INTEN_COMPARE0: u32 = 1 << 16;
const MODE_TIMER: u32 = 0;
const PRESCALER_MAX: u8 = 9;

/// Implemented priority bits on nRF52
const NVIC_PRIO_BITS: u8 = 3;

/// TIMER interrupt numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Interrupt {
    /// TIMER3
    Timer3 = 26,
    /// TIMER4
    Timer4 = 27,
}

// SAFETY: discriminants are the nRF52 vector table positions
unsafe impl InterruptNumber for Interrupt {
    fn number(self) -> u16 {
        self as u16
    }
}

/// TIMER peripheral at `BASE`
pub struct Timer<const BASE: usize> {
    _private: (),
}

/// TIMER3 handle
pub type Timer3 = Timer<TIMER3_BASE>;
/// TIMER4 handle
pub type Timer4 = Timer<TIMER4_BASE>;

static TIMER4_TAKEN: AtomicBool = AtomicBool::new(false);

impl Timer4 {
    /// Claim TIMER4 once
    pub fn take() -> Option<Self> {
        if TIMER4_TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { _private: () })
        }
    }
}

impl<const BASE: usize> Timer<BASE> {
    /// Create a handle without claiming the peripheral
    ///
    /// # Safety
    ///
    /// No other code may drive this TIMER instance. In particular a radio
    /// stack reserves TIMER0.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: BASE is a TIMER block and offset a register within it
        unsafe { ptr::write_volatile((BASE + offset) as *mut u32, value) }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: as for write
        unsafe { ptr::read_volatile((BASE + offset) as *const u32) }
    }
}

impl<const BASE: usize> CompareTimer for Timer<BASE> {
    fn stop(&self) {
        self.write(TASKS_STOP, 1);
    }

    fn clear(&self) {
        self.write(TASKS_CLEAR, 1);
    }

    fn start(&self) {
        self.write(TASKS_START, 1);
    }

    fn set_timer_mode(&self) {
        self.write(MODE, MODE_TIMER);
    }

    fn set_bit_width(&self, width: CounterWidth) {
        let bitmode = match width {
            CounterWidth::Bits16 => 0,
            CounterWidth::Bits8 => 1,
            CounterWidth::Bits24 => 2,
            CounterWidth::Bits32 => 3,
        };
        self.write(BITMODE, bitmode);
    }

    fn set_prescaler(&self, shift: u8) {
        self.write(PRESCALER, shift.min(PRESCALER_MAX) as u32);
    }

    fn set_compare(&self, value: u32) {
        self.write(CC0, value);
    }

    fn set_clear_on_compare(&self, enable: bool) {
        let shorts = self.read(SHORTS);
        let shorts = if enable {
            shorts | SHORTS_COMPARE0_CLEAR
        } else {
            shorts & !SHORTS_COMPARE0_CLEAR
        };
        self.write(SHORTS, shorts);
    }

    fn enable_compare_interrupt(&self) {
        self.write(INTENSET, INTEN_COMPARE0);
    }

    fn take_compare_event(&self) -> bool {
        if self.read(EVENTS_COMPARE0) == 0 {
            return false;
        }
        self.write(EVENTS_COMPARE0, 0);
        // Read back so the clear lands before the handler returns
        let _ = self.read(EVENTS_COMPARE0);
        true
    }
}

/// NVIC line of a TIMER
#[derive(Debug, Clone, Copy)]
pub struct TimerIrq {
    irq: Interrupt,
}

impl TimerIrq {
    /// Line for `irq`
    pub const fn new(irq: Interrupt) -> Self {
        Self { irq }
    }
}

impl InterruptLine for TimerIrq {
    fn disable(&self) {
        NVIC::mask(self.irq);
    }

    fn clear_pending(&self) {
        NVIC::unpend(self.irq);
    }

    fn set_priority(&self, level: u8) {
        let prio = level << (8 - NVIC_PRIO_BITS);
        // SAFETY: only this line's priority byte is written; the line is
        // masked while it changes
        unsafe {
            let mut peripherals = cortex_m::Peripherals::steal();
            peripherals.NVIC.set_priority(self.irq, prio);
        }
    }

    fn enable(&self) {
        // SAFETY: the handler is installed by the application before the
        // tick is started
        unsafe { NVIC::unmask(self.irq) }
    }
}
