//! Display session
//!
//! [`Glue`] owns the display, the optional touch controller, the tick
//! source and the staging buffers, and wires them to the renderer.
//!
//! ```text
//! new() ──► begin() ──┬─► flush() / read_input() ... ──► end()
//!                     └─► Err: staging released, begin() may be retried
//! ```

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use tftglue_hal::display::DisplayBus;
use tftglue_hal::touch::{AnalogTouch, QueuedTouch};

use crate::bus::SharedBus;
use crate::config::GlueConfig;
use crate::error::GlueError;
use crate::flush::FlushSequencer;
use crate::renderer::{Area, DisplayRegistration, FlushReady, InputData, RenderMode, Renderer};
use crate::tick::TickBackend;
use crate::touch::{TouchInput, TouchNormalizer};

/// Delay that returns immediately
///
/// For setups without a touch settle quirk.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Which half of the staging area to flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferIndex {
    /// First buffer
    First,
    /// Second buffer (double buffering only)
    Second,
}

/// Parts handed back by [`Glue::end`]
pub struct GlueParts<D, Q, A, T, const N: usize> {
    /// Display driver
    pub display: D,
    /// Touch controller
    pub touch: TouchInput<Q, A>,
    /// Stopped tick source
    pub tick: T,
    /// Emptied staging storage
    pub staging: Vec<u16, N>,
}

/// Display/touch/tick session for one renderer
///
/// `N` is the staging storage capacity in pixels. It must cover
/// [`GlueConfig::staging_pixels`] for the display width.
pub struct Glue<D, Q, A, T, W, const N: usize> {
    bus: SharedBus<D>,
    touch: TouchInput<Q, A>,
    tick: T,
    delay: W,
    staging: Vec<u16, N>,
    buffer_pixels: usize,
    flush: FlushSequencer,
    normalizer: TouchNormalizer,
    config: GlueConfig,
    started: bool,
}

impl<D, Q, A, T, W, const N: usize> Glue<D, Q, A, T, W, N>
where
    D: DisplayBus,
    Q: QueuedTouch,
    A: AnalogTouch,
    T: TickBackend,
    W: DelayNs,
{
    /// Assemble a session; nothing is touched until [`begin`](Self::begin)
    pub fn new(display: D, touch: TouchInput<Q, A>, tick: T, delay: W, staging: Vec<u16, N>) -> Self {
        let config = GlueConfig::default();
        Self {
            bus: SharedBus::new(display),
            touch,
            tick,
            delay,
            staging,
            buffer_pixels: 0,
            flush: FlushSequencer::new(),
            normalizer: TouchNormalizer::new(config.touch),
            config,
            started: false,
        }
    }

    /// Initialize the renderer and start ticking
    ///
    /// Sizes the staging buffers, registers the display (and the pointer
    /// when a touch controller is attached) and starts the tick source.
    /// On failure the staging buffers are released and the session is left
    /// stopped; `begin` may be called again.
    pub fn begin<R: Renderer>(&mut self, renderer: &mut R, config: GlueConfig) -> Result<(), GlueError> {
        if self.started {
            self.tick.stop();
            self.started = false;
        }

        if let Some(cal) = self.touch.calibration(&config.touch) {
            if !cal.is_valid() {
                #[cfg(feature = "defmt")]
                defmt::error!("glue: empty touch calibration range {}", cal);
                return Err(GlueError::InvalidCalibration);
            }
        }

        renderer.init();
        renderer.set_log_enabled(config.debug);

        let width = self.bus.display().width();
        let height = self.bus.display().height();

        self.staging.clear();
        self.buffer_pixels = 0;
        if self.staging.resize(config.staging_pixels(width), 0).is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "glue: staging needs {} pixels, capacity {}",
                config.staging_pixels(width),
                N
            );
            return Err(GlueError::Alloc);
        }
        self.buffer_pixels = config.buffer_pixels(width);

        let (hor_res, ver_res) = config.renderer_size.unwrap_or((width, height));
        renderer.register_display(&DisplayRegistration {
            hor_res,
            ver_res,
            buffer_pixels: self.buffer_pixels,
            double_buffered: config.double_buffer,
            mode: RenderMode::Partial,
        });

        if self.touch.is_present() {
            renderer.register_pointer();
        }

        if let Err(e) = self.tick.start(config.tick_interval_ms) {
            #[cfg(feature = "defmt")]
            defmt::error!("glue: tick start failed: {}", e);
            self.tick.stop();
            self.staging.clear();
            self.buffer_pixels = 0;
            return Err(e);
        }

        self.normalizer = TouchNormalizer::new(config.touch);
        self.config = config;
        self.started = true;

        #[cfg(feature = "defmt")]
        if config.debug {
            defmt::info!(
                "glue: {}x{} display, {} px buffers, touch {}",
                hor_res,
                ver_res,
                self.buffer_pixels,
                self.touch.is_present()
            );
        }

        Ok(())
    }

    /// Flush an area rendered outside the staging buffers
    pub fn flush<F: FlushReady + ?Sized>(&mut self, area: &Area, pixels: &[u16], done: &mut F) {
        self.flush.flush(&mut self.bus, area, pixels, done);
    }

    /// Flush an area rendered into one of the staging buffers
    pub fn flush_buffer<F: FlushReady + ?Sized>(&mut self, area: &Area, buffer: BufferIndex, done: &mut F) {
        let start = match buffer {
            BufferIndex::First => 0,
            BufferIndex::Second => self.buffer_pixels,
        };
        let end = (start + self.buffer_pixels).min(self.staging.len());
        let start = start.min(end);

        self.flush
            .flush(&mut self.bus, area, &self.staging[start..end], done);
    }

    /// Pointer read callback
    ///
    /// Reports released when no touch controller is attached.
    pub fn read_input(&mut self) -> InputData {
        match &mut self.touch {
            TouchInput::None => InputData::default(),
            TouchInput::Queued(touch) => {
                self.normalizer
                    .read_queued(touch, &mut self.bus, &mut self.delay)
            }
            TouchInput::Analog(touch) => self.normalizer.read_analog(touch, self.bus.display()),
        }
    }

    /// Staging buffers for the renderer to draw into
    ///
    /// The second buffer is only present with double buffering.
    pub fn draw_buffers(&mut self) -> (&mut [u16], Option<&mut [u16]>) {
        let split = self.buffer_pixels.min(self.staging.len());
        let (first, second) = self.staging.split_at_mut(split);
        if second.is_empty() {
            (first, None)
        } else {
            (first, Some(second))
        }
    }

    /// Stop ticking and hand back the parts
    pub fn end(mut self) -> GlueParts<D, Q, A, T, N> {
        if self.started {
            self.tick.stop();
        }
        self.staging.clear();

        GlueParts {
            display: self.bus.into_inner(),
            touch: self.touch,
            tick: self.tick,
            staging: self.staging,
        }
    }

    /// Session is initialized and ticking
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Display driver
    pub fn display(&self) -> &D {
        self.bus.display()
    }

    /// Tick source
    pub fn tick(&self) -> &T {
        &self.tick
    }

    /// Active configuration
    pub fn config(&self) -> &GlueConfig {
        &self.config
    }

    /// Pixels per staging buffer
    pub fn buffer_pixels(&self) -> usize {
        self.buffer_pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{BusOp, MockDisplay};
    use crate::config::Calibration;
    use crate::error::{GlueStatus, TickError};
    use crate::renderer::{Point, PointerState};
    use crate::tick::ManualTick;
    use crate::touch::NoTouch;
    use std::vec::Vec as StdVec;
    use tftglue_hal::touch::RawPoint;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Init,
        Log(bool),
        Display(DisplayRegistration),
        Pointer,
    }

    #[derive(Default)]
    struct MockRenderer {
        calls: StdVec<Call>,
    }

    impl Renderer for MockRenderer {
        fn init(&mut self) {
            self.calls.push(Call::Init);
        }
        fn set_log_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::Log(enabled));
        }
        fn register_display(&mut self, registration: &DisplayRegistration) {
            self.calls.push(Call::Display(*registration));
        }
        fn register_pointer(&mut self) {
            self.calls.push(Call::Pointer);
        }
    }

    #[derive(Default)]
    struct MockTick {
        fail: Option<GlueError>,
        started: StdVec<u32>,
        stops: u32,
    }

    impl TickBackend for MockTick {
        fn start(&mut self, interval_ms: u32) -> Result<(), GlueError> {
            if let Some(e) = self.fail {
                return Err(e);
            }
            self.started.push(interval_ms);
            Ok(())
        }
        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    struct OnePoint(Option<RawPoint>);

    impl QueuedTouch for OnePoint {
        fn buffer_size(&mut self) -> u8 {
            self.0.is_some() as u8
        }
        fn get_point(&mut self) -> RawPoint {
            self.0.take().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct ReadyCount(u32);

    impl FlushReady for ReadyCount {
        fn flush_ready(&mut self) {
            self.0 += 1;
        }
    }

    type Session<T, const N: usize> = Glue<MockDisplay, NoTouch, NoTouch, T, NoDelay, N>;

    #[test]
    fn test_begin_registers_display() {
        let mut glue: Session<MockTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();

        glue.begin(&mut renderer, GlueConfig::default()).unwrap();

        assert!(glue.is_started());
        assert_eq!(glue.buffer_pixels(), 2560);
        assert_eq!(glue.tick().started, [10]);
        assert_eq!(
            renderer.calls,
            [
                Call::Init,
                Call::Log(false),
                Call::Display(DisplayRegistration {
                    hor_res: 320,
                    ver_res: 240,
                    buffer_pixels: 2560,
                    double_buffered: true,
                    mode: RenderMode::Partial,
                }),
            ]
        );
    }

    #[test]
    fn test_renderer_size_override() {
        let mut glue: Session<ManualTick, 3840> = Glue::new(
            MockDisplay::new(240, 320),
            TouchInput::none(),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();
        let config = GlueConfig {
            renderer_size: Some((240, 240)),
            ..GlueConfig::default()
        };

        glue.begin(&mut renderer, config).unwrap();

        match &renderer.calls[2] {
            Call::Display(reg) => assert_eq!((reg.hor_res, reg.ver_res), (240, 240)),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_pointer_registered_with_touch() {
        let mut glue: Glue<MockDisplay, OnePoint, NoTouch, ManualTick, NoDelay, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::Queued(OnePoint(None)),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();

        glue.begin(&mut renderer, GlueConfig::default()).unwrap();
        assert_eq!(renderer.calls.last(), Some(&Call::Pointer));
    }

    #[test]
    fn test_alloc_failure() {
        let mut glue: Session<MockTick, 1024> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();

        assert_eq!(
            glue.begin(&mut renderer, GlueConfig::default()),
            Err(GlueError::Alloc)
        );
        assert!(!glue.is_started());
        assert!(glue.tick().started.is_empty());
        assert!(!renderer.calls.iter().any(|c| matches!(c, Call::Display(_))));
    }

    #[test]
    fn test_tick_failure_releases_staging() {
        let mut glue: Session<MockTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick {
                fail: Some(TickError::NoDivider.into()),
                ..Default::default()
            },
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();

        assert_eq!(
            glue.begin(&mut renderer, GlueConfig::default()),
            Err(GlueError::TimerConfig(TickError::NoDivider))
        );
        assert!(!glue.is_started());
        assert_eq!(glue.buffer_pixels(), 0);
        let (first, second) = glue.draw_buffers();
        assert!(first.is_empty());
        assert!(second.is_none());
    }

    #[test]
    fn test_empty_calibration_rejected() {
        let mut glue: Glue<MockDisplay, OnePoint, NoTouch, MockTick, NoDelay, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::Queued(OnePoint(None)),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();
        let mut config = GlueConfig::default();
        config.touch.queued = Calibration::new(100, 100, 100, 3750);

        let result = glue.begin(&mut renderer, config);
        assert_eq!(result, Err(GlueError::InvalidCalibration));
        assert_eq!(GlueStatus::from(&result), GlueStatus::ErrConfig);
        assert!(!glue.is_started());
        assert!(renderer.calls.is_empty());
        assert!(glue.tick().started.is_empty());
    }

    #[test]
    fn test_unused_calibration_ignored() {
        let mut glue: Session<MockTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        let mut config = GlueConfig::default();
        config.touch.analog = Calibration::new(0, 0, 0, 0);

        glue.begin(&mut MockRenderer::default(), config).unwrap();
        assert!(glue.is_started());
    }

    #[test]
    fn test_single_buffer() {
        let mut glue: Session<ManualTick, 2560> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        let config = GlueConfig {
            double_buffer: false,
            ..GlueConfig::default()
        };

        glue.begin(&mut MockRenderer::default(), config).unwrap();
        let (first, second) = glue.draw_buffers();
        assert_eq!(first.len(), 2560);
        assert!(second.is_none());
    }

    #[test]
    fn test_flush_from_staging() {
        let mut glue: Session<ManualTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        glue.begin(&mut MockRenderer::default(), GlueConfig::default())
            .unwrap();

        {
            let (_, second) = glue.draw_buffers();
            if let Some(second) = second {
                second.fill(0x001F);
            }
        }

        let mut done = ReadyCount::default();
        glue.flush_buffer(&Area::new(0, 0, 319, 1), BufferIndex::Second, &mut done);

        assert_eq!(done.0, 1);
        assert_eq!(glue.display().written.len(), 640);
        assert!(glue.display().written.iter().all(|&p| p == 0x001F));
    }

    #[test]
    fn test_read_input_without_touch() {
        let mut glue: Session<ManualTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        let data = glue.read_input();
        assert_eq!(data.state, PointerState::Released);
        assert!(!data.continue_reading);
    }

    #[test]
    fn test_touch_read_drains_flush() {
        let mut glue: Glue<MockDisplay, OnePoint, NoTouch, ManualTick, NoDelay, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::Queued(OnePoint(Some(RawPoint::new(3800, 100, 40)))),
            ManualTick,
            NoDelay,
            Vec::new(),
        );
        glue.begin(&mut MockRenderer::default(), GlueConfig::default())
            .unwrap();

        let mut done = ReadyCount::default();
        glue.flush(&Area::new(0, 0, 0, 0), &[0], &mut done);
        let data = glue.read_input();

        assert_eq!(data.state, PointerState::Pressed);
        assert_eq!(data.point, Point::new(0, 0));
        assert_eq!(
            glue.display().ops[3..],
            [BusOp::DmaWait, BusOp::EndWrite]
        );
    }

    #[test]
    fn test_end_stops_tick() {
        let mut glue: Session<MockTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        glue.begin(&mut MockRenderer::default(), GlueConfig::default())
            .unwrap();

        let parts = glue.end();
        assert_eq!(parts.tick.stops, 1);
        assert!(parts.staging.is_empty());
        assert_eq!(parts.display.width, 320);
    }

    #[test]
    fn test_rebegin_restarts_tick() {
        let mut glue: Session<MockTick, 5120> = Glue::new(
            MockDisplay::new(320, 240),
            TouchInput::none(),
            MockTick::default(),
            NoDelay,
            Vec::new(),
        );
        let mut renderer = MockRenderer::default();
        glue.begin(&mut renderer, GlueConfig::default()).unwrap();
        glue.begin(&mut renderer, GlueConfig::default()).unwrap();

        assert_eq!(glue.tick().stops, 1);
        assert_eq!(glue.tick().started, [10, 10]);
    }
}
