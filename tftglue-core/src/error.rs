//! Initialization errors and status codes
//!
//! Errors only exist during initialization. Once a session is running,
//! flush and touch polling are infallible.

use core::fmt;

/// Tick configuration failure detail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickError {
    /// Interval of zero milliseconds requested
    ZeroInterval,
    /// Interval too short for the timer clock (compare would be zero)
    IntervalTooShort,
    /// No divider brings the compare value into counter range
    NoDivider,
    /// Platform refused to create the periodic timer
    TimerUnavailable,
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::ZeroInterval => write!(f, "Tick interval is zero"),
            TickError::IntervalTooShort => write!(f, "Tick interval too short for timer clock"),
            TickError::NoDivider => write!(f, "No divider fits the counter width"),
            TickError::TimerUnavailable => write!(f, "Periodic timer unavailable"),
        }
    }
}

/// Initialization failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlueError {
    /// Staging buffer could not be sized
    Alloc,
    /// Tick timer could not be configured
    TimerConfig(TickError),
    /// Renderer lock could not be created
    MutexCreation,
    /// Background renderer task could not be spawned
    TaskCreation,
    /// Touch calibration of the attached controller spans an empty range
    InvalidCalibration,
}

impl From<TickError> for GlueError {
    fn from(e: TickError) -> Self {
        GlueError::TimerConfig(e)
    }
}

impl fmt::Display for GlueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlueError::Alloc => write!(f, "Staging buffer allocation failed"),
            GlueError::TimerConfig(e) => write!(f, "Timer configuration failed: {}", e),
            GlueError::MutexCreation => write!(f, "Renderer lock creation failed"),
            GlueError::TaskCreation => write!(f, "Renderer task creation failed"),
            GlueError::InvalidCalibration => write!(f, "Touch calibration range is empty"),
        }
    }
}

/// Flat status code of an initialization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GlueStatus {
    /// Initialization succeeded
    Ok = 0,
    /// Staging buffer allocation failed
    ErrAlloc = 1,
    /// Timer setup failed
    ErrTimer = 2,
    /// Lock creation failed
    ErrMutex = 3,
    /// Task creation failed
    ErrTask = 4,
    /// Configuration rejected
    ErrConfig = 5,
}

impl GlueStatus {
    /// Numeric status code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check for success
    pub const fn is_ok(self) -> bool {
        matches!(self, GlueStatus::Ok)
    }
}

impl From<GlueError> for GlueStatus {
    fn from(e: GlueError) -> Self {
        match e {
            GlueError::Alloc => GlueStatus::ErrAlloc,
            GlueError::TimerConfig(_) => GlueStatus::ErrTimer,
            GlueError::MutexCreation => GlueStatus::ErrMutex,
            GlueError::TaskCreation => GlueStatus::ErrTask,
            GlueError::InvalidCalibration => GlueStatus::ErrConfig,
        }
    }
}

impl<T> From<&Result<T, GlueError>> for GlueStatus {
    fn from(result: &Result<T, GlueError>) -> Self {
        match result {
            Ok(_) => GlueStatus::Ok,
            Err(e) => (*e).into(),
        }
    }
}
