//! tftglue Hardware Abstraction Layer
//!
//! This crate defines the hardware contracts the renderer bridge is written
//! against. Display and touch drivers, timer peripherals and RTOS primitives
//! are all external; they only have to implement these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Renderer (widgets, layout, drawing)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tftglue-core (tick, flush, touch)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tftglue-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tftglue-hal-  │       │ display/touch │
//! │    nrf52      │       │   drivers     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::DisplayBus`] - Display geometry and bus transaction primitives
//! - [`touch::QueuedTouch`], [`touch::AnalogTouch`] - Touch controller sampling
//! - [`timer::TimerCounter`] - Prescaled timer/counter with compare match
//! - [`timer::CompareTimer`], [`timer::InterruptLine`] - Bare compare timer + NVIC line
//! - [`rtos::Rtos`] - Semaphores, pinned tasks and periodic timers

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod rtos;
pub mod timer;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use display::{DisplayBus, Rotation};
pub use rtos::{BinarySemaphore, PeriodicTimer, Rtos, TaskSpec};
pub use timer::{CompareTimer, InterruptLine, TimerCounter};
pub use touch::{AnalogTouch, QueuedTouch, RawPoint};
