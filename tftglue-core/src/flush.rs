//! Flush sequencing
//!
//! Pushes a rendered area to the display and signals completion right away.
//! The transfer itself keeps running over DMA; the next flush (or a touch
//! read) waits for it before touching the bus again.

use tftglue_hal::display::DisplayBus;

use crate::bus::SharedBus;
use crate::renderer::{Area, FlushReady};

/// Tracks whether a previous transfer may still be in flight
#[derive(Debug, Clone, Copy)]
pub struct FlushSequencer {
    first_frame: bool,
    big_endian: bool,
}

impl Default for FlushSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl FlushSequencer {
    /// Sequencer for a freshly initialized display
    pub const fn new() -> Self {
        Self {
            first_frame: true,
            big_endian: cfg!(target_endian = "big"),
        }
    }

    /// No flush has been issued yet
    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }

    /// Flush `area` from `pixels`
    ///
    /// `pixels` holds the area row by row; extra trailing pixels are
    /// ignored. Rows and columns at negative coordinates are dropped, and
    /// an area with nothing on screen never touches the bus. `done` is
    /// signalled exactly once, before the transfer completes.
    pub fn flush<D, F>(&mut self, bus: &mut SharedBus<D>, area: &Area, pixels: &[u16], done: &mut F)
    where
        D: DisplayBus,
        F: FlushReady + ?Sized,
    {
        let Some(visible) = area.visible() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("flush: nothing visible in {}", area);
            done.flush_ready();
            return;
        };

        if self.first_frame {
            self.first_frame = false;
        } else {
            bus.release_display();
        }

        let stride = area.width() as usize;
        let skip_rows = (visible.y1 as i32 - area.y1 as i32) as usize;
        let skip_cols = (visible.x1 as i32 - area.x1 as i32) as usize;
        let rows = pixels.get(skip_rows * stride..).unwrap_or(&[]);

        let mut write = bus.begin_display();
        write.set_addr_window(
            visible.x1 as u16,
            visible.y1 as u16,
            visible.width(),
            visible.height(),
        );

        if skip_cols == 0 {
            let count = visible.pixel_count().min(rows.len());
            write.write_pixels(&rows[..count], false, self.big_endian);
        } else {
            // Clipped rows are not contiguous; all but the last one block
            let mut lines = rows.chunks(stride).take(visible.height() as usize).peekable();
            while let Some(line) = lines.next() {
                let line = line.get(skip_cols..).unwrap_or(&[]);
                write.write_pixels(line, lines.peek().is_some(), self.big_endian);
            }
        }

        done.flush_ready();
    }
}
