//! Shared display/touch bus arbitration
//!
//! On several boards the display and the queued touch controller share one
//! SPI bus. A display transaction stays open after a flush so the DMA
//! transfer can run while the renderer draws the next strip. Before anything
//! else uses the bus, the transfer must be drained and the transaction
//! closed. [`SharedBus`] tracks that state and only hands out a
//! [`TouchAccess`] token once the display has let go.

use tftglue_hal::display::{DisplayBus, Rotation};

/// Who currently owns the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusOwner {
    /// Nothing in flight
    Idle,
    /// A display transaction is open (DMA may still be running)
    Display,
}

/// Display driver behind the shared bus
pub struct SharedBus<D> {
    display: D,
    owner: BusOwner,
}

impl<D: DisplayBus> SharedBus<D> {
    /// Wrap a display driver; the bus starts idle
    pub fn new(display: D) -> Self {
        Self {
            display,
            owner: BusOwner::Idle,
        }
    }

    /// Current owner
    pub fn owner(&self) -> BusOwner {
        self.owner
    }

    /// Read-only access to the display driver
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Unwrap the display driver
    pub fn into_inner(self) -> D {
        self.display
    }

    /// Wait for DMA to drain and close the display transaction
    ///
    /// Always issued, even if the bus looks idle: a driver may have opened
    /// a transaction on its own.
    pub fn release_display(&mut self) {
        self.display.dma_wait();
        self.display.end_write();
        self.owner = BusOwner::Idle;
    }

    /// Open a display transaction
    ///
    /// The transaction stays open after the returned handle is dropped so
    /// the last transfer can complete in the background.
    pub fn begin_display(&mut self) -> DisplayWrite<'_, D> {
        self.display.start_write();
        self.owner = BusOwner::Display;
        DisplayWrite { display: &mut self.display }
    }

    /// Drain the display and borrow the bus for a touch read
    pub fn claim_for_touch(&mut self) -> TouchAccess<'_, D> {
        self.release_display();
        TouchAccess { display: &self.display }
    }
}

/// Open display transaction
pub struct DisplayWrite<'a, D> {
    display: &'a mut D,
}

impl<D: DisplayBus> DisplayWrite<'_, D> {
    /// Set the target window
    pub fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.display.set_addr_window(x, y, width, height);
    }

    /// Queue pixels for transfer
    pub fn write_pixels(&mut self, pixels: &[u16], block: bool, big_endian: bool) {
        self.display.write_pixels(pixels, block, big_endian);
    }
}

/// Proof that the display has released the bus
///
/// Holding this token keeps the [`SharedBus`] mutably borrowed, so no
/// display transaction can start until the touch read is finished.
pub struct TouchAccess<'a, D> {
    display: &'a D,
}

impl<D: DisplayBus> TouchAccess<'_, D> {
    /// Display width in the current rotation
    pub fn width(&self) -> u16 {
        self.display.width()
    }

    /// Display height in the current rotation
    pub fn height(&self) -> u16 {
        self.display.height()
    }

    /// Current display rotation
    pub fn rotation(&self) -> Rotation {
        self.display.rotation()
    }
}
