//! Preemptive scheduler abstractions
//!
//! Used by the RTOS tick backend, where a software timer feeds the tick
//! and a pinned task runs the renderer's processing step. Handles follow
//! the FreeRTOS model: semaphores are cheap cloneable handles and tasks
//! are identified by an opaque id.

/// Task creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSpec {
    /// Task name
    pub name: &'static str,
    /// Stack size in bytes
    pub stack_size: usize,
    /// Scheduler priority
    pub priority: u8,
    /// Core to pin the task to, or `None` to let the scheduler decide
    pub core: Option<u8>,
}

/// Binary semaphore handle
///
/// Clones refer to the same semaphore. Both operations block without
/// timeout.
pub trait BinarySemaphore: Clone + Send + Sync + 'static {
    /// Take the semaphore, blocking until it is available
    fn take(&self);

    /// Give the semaphore back
    fn give(&self);
}

/// Periodic software timer handle
pub trait PeriodicTimer: Send {
    /// Start firing every `period_us` microseconds
    fn start(&mut self, period_us: u64);

    /// Stop firing
    fn stop(&mut self);
}

/// Preemptive scheduler services
pub trait Rtos: Clone + Send + Sync + 'static {
    /// Opaque task identity
    type TaskId: Copy + PartialEq + Send + Sync + 'static;

    /// Semaphore handle type
    type Semaphore: BinarySemaphore;

    /// Periodic timer handle type
    type Timer: PeriodicTimer;

    /// Create a binary semaphore in the "given" state
    fn create_semaphore(&self) -> Option<Self::Semaphore>;

    /// Spawn a task, optionally pinned to a core
    ///
    /// Returns `None` if the scheduler rejected the task.
    fn spawn_pinned<F>(&self, spec: &TaskSpec, body: F) -> Option<Self::TaskId>
    where
        F: FnOnce() + Send + 'static;

    /// Identity of the calling task
    fn current_task(&self) -> Self::TaskId;

    /// Create a stopped periodic timer that runs `callback` on each expiry
    fn create_periodic_timer<F>(&self, name: &'static str, callback: F) -> Option<Self::Timer>
    where
        F: Fn() + Send + Sync + 'static;
}
