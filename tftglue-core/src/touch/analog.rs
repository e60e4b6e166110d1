//! Analog resistive panel reads
//!
//! Resistive panels bounce on lift-off, so a release is only reported
//! after several consecutive low-pressure polls. Until then the pointer
//! stays pressed at the last good position.

use tftglue_hal::display::DisplayBus;
use tftglue_hal::touch::AnalogTouch;

use super::remap::ANALOG_REMAP;
use super::TouchNormalizer;
use crate::renderer::{InputData, PointerState};

impl TouchNormalizer {
    /// Poll an analog panel once
    pub fn read_analog<A, D>(&mut self, touch: &mut A, display: &D) -> InputData
    where
        A: AnalogTouch,
        D: DisplayBus,
    {
        let sample = touch.get_point();

        let state = if sample.z < touch.pressure_threshold() {
            self.state.release_count = self.state.release_count.saturating_add(1);
            if self.state.release_count >= self.config.release_polls {
                PointerState::Released
            } else {
                PointerState::Pressed
            }
        } else {
            self.state.release_count = 0;
            self.state.last = ANALOG_REMAP.remap(
                sample,
                &self.config.analog,
                display.rotation(),
                display.width(),
                display.height(),
            );
            PointerState::Pressed
        };

        InputData {
            state,
            point: self.state.last,
            continue_reading: false,
        }
    }
}
