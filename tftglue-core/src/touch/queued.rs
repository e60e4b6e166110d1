//! Queued touch controller reads
//!
//! The controller shares the bus with the display, so any in-flight display
//! transfer is drained first. One point is popped per read; the renderer is
//! asked to read again while the FIFO still holds more.

use embedded_hal::delay::DelayNs;
use tftglue_hal::display::DisplayBus;
use tftglue_hal::touch::QueuedTouch;

use super::remap::QUEUED_REMAP;
use super::TouchNormalizer;
use crate::bus::SharedBus;
use crate::renderer::{InputData, PointerState};

impl TouchNormalizer {
    /// Read one point from a queued controller
    ///
    /// `delay` is only used when the platform needs a pause after the FIFO
    /// appears drained.
    pub fn read_queued<Q, D, W>(&mut self, touch: &mut Q, bus: &mut SharedBus<D>, delay: &mut W) -> InputData
    where
        Q: QueuedTouch,
        D: DisplayBus,
        W: DelayNs,
    {
        let access = bus.claim_for_touch();

        let depth = touch.buffer_size();
        if depth == 0 {
            return InputData {
                state: PointerState::Released,
                point: self.state.last,
                continue_reading: false,
            };
        }

        let mut sample = touch.get_point();

        let wide = self.config.wide_panel_size;
        if access.width() == wide || access.height() == wide {
            sample.x = self.config.queued.mirror_x(sample.x);
        }

        self.state.last = QUEUED_REMAP.remap(
            sample,
            &self.config.queued,
            access.rotation(),
            access.width(),
            access.height(),
        );

        let continue_reading = depth > 1;
        if !continue_reading {
            if let Some(ms) = self.config.quirks.drained_settle_ms {
                delay.delay_ms(ms);
            }
        }

        InputData {
            state: PointerState::Pressed,
            point: self.state.last,
            continue_reading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{BusOp, MockDisplay};
    use crate::config::{TouchConfig, TouchQuirks, QUEUE_CALIBRATION};
    use crate::renderer::Point;
    use std::collections::VecDeque;
    use tftglue_hal::touch::RawPoint;

    struct MockFifo {
        points: VecDeque<RawPoint>,
    }

    impl MockFifo {
        fn new(points: &[RawPoint]) -> Self {
            Self {
                points: points.iter().copied().collect(),
            }
        }
    }

    impl QueuedTouch for MockFifo {
        fn buffer_size(&mut self) -> u8 {
            self.points.len() as u8
        }

        fn get_point(&mut self) -> RawPoint {
            self.points.pop_front().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_empty_fifo_releases() {
        let mut normalizer = TouchNormalizer::new(TouchConfig::default());
        let mut bus = SharedBus::new(MockDisplay::new(320, 240));
        let mut delay = MockDelay::default();

        let data = normalizer.read_queued(&mut MockFifo::new(&[]), &mut bus, &mut delay);
        assert_eq!(data.state, PointerState::Released);
        assert!(!data.continue_reading);
        // Bus is drained before the depth is read
        assert_eq!(bus.display().ops, [BusOp::DmaWait, BusOp::EndWrite]);
    }

    #[test]
    fn test_drains_one_point_per_read() {
        let mut normalizer = TouchNormalizer::new(TouchConfig::default());
        let mut bus = SharedBus::new(MockDisplay::new(320, 240));
        let mut delay = MockDelay::default();
        let cal = QUEUE_CALIBRATION;
        let mut fifo = MockFifo::new(&[
            RawPoint::new(cal.x_max, cal.y_min, 50),
            RawPoint::new(cal.x_min, cal.y_max, 50),
        ]);

        let first = normalizer.read_queued(&mut fifo, &mut bus, &mut delay);
        assert_eq!(first.state, PointerState::Pressed);
        assert_eq!(first.point, Point::new(0, 0));
        assert!(first.continue_reading);

        let second = normalizer.read_queued(&mut fifo, &mut bus, &mut delay);
        assert_eq!(second.point, Point::new(319, 239));
        assert!(!second.continue_reading);

        let third = normalizer.read_queued(&mut fifo, &mut bus, &mut delay);
        assert_eq!(third.state, PointerState::Released);
        assert_eq!(third.point, Point::new(319, 239));
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn test_wide_panel_mirrors_raw_x() {
        let mut normalizer = TouchNormalizer::new(TouchConfig::default());
        let mut bus = SharedBus::new(MockDisplay::new(480, 320));
        let mut delay = MockDelay::default();
        let cal = QUEUE_CALIBRATION;

        // Raw x_max would map to column 0 without the mirror
        let data = normalizer.read_queued(
            &mut MockFifo::new(&[RawPoint::new(cal.x_max, cal.y_min, 50)]),
            &mut bus,
            &mut delay,
        );
        assert_eq!(data.point, Point::new(479, 0));
    }

    #[test]
    fn test_tall_panel_mirrors_raw_x() {
        let mut normalizer = TouchNormalizer::new(TouchConfig::default());
        let mut bus = SharedBus::new(MockDisplay::new(320, 480));
        let mut delay = MockDelay::default();
        let cal = QUEUE_CALIBRATION;

        let data = normalizer.read_queued(
            &mut MockFifo::new(&[RawPoint::new(cal.x_max, cal.y_min, 50)]),
            &mut bus,
            &mut delay,
        );
        assert_eq!(data.point, Point::new(319, 0));
    }

    #[test]
    fn test_other_sizes_not_mirrored() {
        let cal = QUEUE_CALIBRATION;
        for (width, height) in [(479, 320), (320, 479), (481, 320)] {
            let mut normalizer = TouchNormalizer::new(TouchConfig::default());
            let mut bus = SharedBus::new(MockDisplay::new(width, height));
            let mut delay = MockDelay::default();

            let data = normalizer.read_queued(
                &mut MockFifo::new(&[RawPoint::new(cal.x_max, cal.y_min, 50)]),
                &mut bus,
                &mut delay,
            );
            assert_eq!(data.point, Point::new(0, 0), "{}x{}", width, height);
        }
    }

    #[test]
    fn test_settle_quirk_waits_when_drained() {
        let config = TouchConfig {
            quirks: TouchQuirks::NRF52,
            ..TouchConfig::default()
        };
        let mut normalizer = TouchNormalizer::new(config);
        let mut bus = SharedBus::new(MockDisplay::new(320, 240));
        let mut delay = MockDelay::default();
        let mut fifo = MockFifo::new(&[RawPoint::new(2000, 2000, 50), RawPoint::new(2000, 2000, 50)]);

        normalizer.read_queued(&mut fifo, &mut bus, &mut delay);
        assert_eq!(delay.total_ns, 0);

        normalizer.read_queued(&mut fifo, &mut bus, &mut delay);
        assert_eq!(delay.total_ns, 50_000_000);
    }

    #[test]
    fn test_rotation_from_display() {
        let mut normalizer = TouchNormalizer::new(TouchConfig::default());
        let mut bus = SharedBus::new(MockDisplay::new(240, 320).rotated(tftglue_hal::display::Rotation::Deg90));
        let mut delay = MockDelay::default();
        let cal = QUEUE_CALIBRATION;

        let data = normalizer.read_queued(
            &mut MockFifo::new(&[RawPoint::new(cal.x_max, cal.y_min, 50)]),
            &mut bus,
            &mut delay,
        );
        assert_eq!(data.point, Point::new(0, 319));
    }
}
