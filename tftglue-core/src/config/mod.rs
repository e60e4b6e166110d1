//! Configuration types
//!
//! Board-agnostic configuration structures, fixed for the life of a session.

pub mod calibration;
pub mod types;

pub use calibration::*;
pub use types::*;
