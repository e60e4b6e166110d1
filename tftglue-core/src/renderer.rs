//! Renderer-facing contract
//!
//! The GUI renderer is external. It consumes a millisecond tick, renders
//! into the session's staging buffer, and calls back into the session to
//! flush dirty areas and to read the pointer.

use portable_atomic::{AtomicU32, Ordering};

/// Receiver of tick increments
///
/// Called from interrupt or timer-task context, so implementations must
/// be safe to call concurrently with the renderer.
pub trait TickSink: Sync {
    /// Advance the renderer clock by `ms` milliseconds
    fn tick_inc(&self, ms: u32);
}

/// Monotonic millisecond clock fed by tick increments
///
/// Wraps after about 49 days, like the renderer's own tick counter.
pub struct MillisClock {
    ms: AtomicU32,
}

impl Default for MillisClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MillisClock {
    /// Create a clock at zero
    pub const fn new() -> Self {
        Self {
            ms: AtomicU32::new(0),
        }
    }

    /// Milliseconds elapsed since the clock started
    pub fn now_ms(&self) -> u32 {
        self.ms.load(Ordering::Acquire)
    }

    /// Milliseconds elapsed since an earlier reading
    pub fn elapsed_since(&self, earlier_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier_ms)
    }
}

impl TickSink for MillisClock {
    fn tick_inc(&self, ms: u32) {
        self.ms.fetch_add(ms, Ordering::AcqRel);
    }
}

/// Inclusive pixel rectangle handed over by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    /// Left column
    pub x1: i16,
    /// Top row
    pub y1: i16,
    /// Right column (inclusive)
    pub x2: i16,
    /// Bottom row (inclusive)
    pub y2: i16,
}

impl Area {
    /// Create an area from inclusive corners
    pub const fn new(x1: i16, y1: i16, x2: i16, y2: i16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels, zero if the corners are swapped
    pub const fn width(&self) -> u16 {
        span(self.x1, self.x2)
    }

    /// Height in pixels, zero if the corners are swapped
    pub const fn height(&self) -> u16 {
        span(self.y1, self.y2)
    }

    /// Covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    /// Part of the area at non-negative coordinates
    pub fn visible(&self) -> Option<Area> {
        let clipped = Area::new(self.x1.max(0), self.y1.max(0), self.x2, self.y2);
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Number of pixels covered
    pub const fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

const fn span(lo: i16, hi: i16) -> u16 {
    if hi < lo {
        0
    } else {
        let span = hi as i32 - lo as i32 + 1;
        if span > u16::MAX as i32 {
            u16::MAX
        } else {
            span as u16
        }
    }
}

/// Pointer button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
    /// Not touched
    #[default]
    Released,
    /// Touched
    Pressed,
}

/// Display-space point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    /// Column
    pub x: i16,
    /// Row
    pub y: i16,
}

impl Point {
    /// Create a point
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Result of one pointer read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputData {
    /// Pressed or released
    pub state: PointerState,
    /// Last pressed position
    pub point: Point,
    /// More samples are queued; the renderer should read again now
    pub continue_reading: bool,
}

/// How the renderer uses the staging buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// Render dirty areas in strips no larger than one buffer
    Partial,
}

/// Display parameters registered with the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayRegistration {
    /// Horizontal resolution
    pub hor_res: u16,
    /// Vertical resolution
    pub ver_res: u16,
    /// Pixels per staging buffer
    pub buffer_pixels: usize,
    /// Two buffers are available
    pub double_buffered: bool,
    /// Render mode
    pub mode: RenderMode,
}

/// Renderer registration surface
pub trait Renderer {
    /// Initialize the renderer core
    fn init(&mut self);

    /// Enable or disable forwarding of the renderer's own log output
    fn set_log_enabled(&mut self, enabled: bool);

    /// Create the renderer display and attach the staging buffers
    fn register_display(&mut self, registration: &DisplayRegistration);

    /// Create a pointer input device bound to the session's read callback
    fn register_pointer(&mut self);
}

/// Flush completion signal
pub trait FlushReady {
    /// Tell the renderer the flushed buffer may be reused
    fn flush_ready(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_dimensions() {
        let area = Area::new(10, 20, 19, 21);
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 2);
        assert_eq!(area.pixel_count(), 20);
    }

    #[test]
    fn test_single_pixel_area() {
        let area = Area::new(5, 5, 5, 5);
        assert_eq!(area.pixel_count(), 1);
    }

    #[test]
    fn test_inverted_area_is_empty() {
        let area = Area::new(10, 3, 4, 8);
        assert!(area.is_empty());
        assert_eq!(area.width(), 0);
        assert_eq!(area.pixel_count(), 0);
        assert_eq!(area.visible(), None);
    }

    #[test]
    fn test_visible_clips_origin() {
        assert_eq!(
            Area::new(-4, -2, 9, 5).visible(),
            Some(Area::new(0, 0, 9, 5))
        );
        assert_eq!(Area::new(-8, 0, -1, 5).visible(), None);
    }

    #[test]
    fn test_millis_clock() {
        let clock = MillisClock::new();
        assert_eq!(clock.now_ms(), 0);

        clock.tick_inc(10);
        clock.tick_inc(10);
        assert_eq!(clock.now_ms(), 20);
        assert_eq!(clock.elapsed_since(5), 15);
    }

    #[test]
    fn test_millis_clock_wraps() {
        let clock = MillisClock::new();
        clock.tick_inc(u32::MAX - 4);
        let before = clock.now_ms();
        clock.tick_inc(10);
        assert_eq!(clock.now_ms(), 5);
        assert_eq!(clock.elapsed_since(before), 10);
    }
}
