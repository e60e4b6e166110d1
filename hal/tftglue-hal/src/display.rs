//! Display bus abstractions
//!
//! The display driver owns the low-level bus protocol. The bridge only needs
//! the panel geometry and the transaction primitives used to push a pixel
//! rectangle, possibly through DMA.

/// Panel rotation as reported by the display driver
///
/// Odd rotations swap the panel's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Deg0,
    /// Rotated 90° clockwise
    Deg90,
    /// Rotated 180°
    Deg180,
    /// Rotated 270° clockwise
    Deg270,
}

impl Rotation {
    /// Create from the driver's 0-3 rotation index
    ///
    /// Only the two low bits are significant, matching how display
    /// drivers store rotation.
    pub const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Get the 0-3 rotation index
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Check if the rotation swaps the panel axes
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Display with a bus that may be shared with a touch controller
///
/// All operations are infallible: waits block until the hardware reports
/// completion instead of timing out.
pub trait DisplayBus {
    /// Width in pixels for the current rotation
    fn width(&self) -> u16;

    /// Height in pixels for the current rotation
    fn height(&self) -> u16;

    /// Current rotation
    fn rotation(&self) -> Rotation;

    /// Block until any in-flight DMA transfer has finished
    fn dma_wait(&mut self);

    /// Begin a bus transaction (assert chip select, take the bus)
    fn start_write(&mut self);

    /// End the current bus transaction (release chip select)
    fn end_write(&mut self);

    /// Set the address window for the following pixel writes
    fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16);

    /// Write RGB565 pixels into the current address window
    ///
    /// - `pixels`: Pixel data, already in the panel's color format
    /// - `block`: If false, the driver may return while DMA is still running
    /// - `big_endian`: Byte order of the pixel words in memory
    fn write_pixels(&mut self, pixels: &[u16], block: bool, big_endian: bool);
}
