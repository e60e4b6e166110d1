//! Scheduler-driven tick backend
//!
//! A periodic software timer feeds the tick while a pinned background task
//! runs the renderer's processing step. Access to the renderer from other
//! tasks is serialized through [`GuiLock`]; the background task holds it
//! around every processing step.

use tftglue_hal::rtos::{BinarySemaphore, PeriodicTimer, Rtos, TaskSpec};

use super::TickBackend;
use crate::error::{GlueError, TickError};
use crate::renderer::TickSink;

/// Default renderer task: second core, mid priority
pub const GUI_TASK: TaskSpec = TaskSpec {
    name: "gui",
    stack_size: 8 * 1024,
    priority: 5,
    core: Some(1),
};

/// Serializes renderer access between tasks
///
/// Acquire and release are no-ops when called from the renderer task
/// itself, so renderer callbacks may use the same entry points as
/// application code without deadlocking.
#[derive(Clone)]
pub struct GuiLock<R: Rtos> {
    rtos: R,
    semaphore: R::Semaphore,
    owner: R::TaskId,
}

impl<R: Rtos> GuiLock<R> {
    fn new(rtos: R, semaphore: R::Semaphore, owner: R::TaskId) -> Self {
        Self {
            rtos,
            semaphore,
            owner,
        }
    }

    /// Whether the caller is the renderer task
    pub fn is_renderer_task(&self) -> bool {
        self.rtos.current_task() == self.owner
    }

    /// Block until the renderer is free
    pub fn acquire(&self) {
        if !self.is_renderer_task() {
            self.semaphore.take();
        }
    }

    /// Hand the renderer back
    pub fn release(&self) {
        if !self.is_renderer_task() {
            self.semaphore.give();
        }
    }

    /// Acquire for the lifetime of the returned guard
    pub fn lock(&self) -> GuiGuard<'_, R> {
        self.acquire();
        GuiGuard { lock: self }
    }
}

/// Releases a [`GuiLock`] on drop
pub struct GuiGuard<'a, R: Rtos> {
    lock: &'a GuiLock<R>,
}

impl<R: Rtos> Drop for GuiGuard<'_, R> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// Tick source on a scheduler
///
/// The periodic timer both feeds the tick and wakes the background task,
/// so the processing step always runs at the current timer period.
pub struct RtosTick<R: Rtos, S: 'static, H> {
    rtos: R,
    sink: &'static S,
    handler: Option<H>,
    spec: TaskSpec,
    timer: Option<R::Timer>,
    wake: Option<R::Semaphore>,
    lock: Option<GuiLock<R>>,
}

impl<R, S, H> RtosTick<R, S, H>
where
    R: Rtos,
    S: TickSink,
    H: FnMut() + Send + 'static,
{
    /// Create a stopped tick source
    ///
    /// `handler` is the renderer's processing step. It moves into the
    /// background task on the first start and runs once per timer period
    /// with the renderer lock held.
    pub fn new(rtos: R, sink: &'static S, handler: H) -> Self {
        Self {
            rtos,
            sink,
            handler: Some(handler),
            spec: GUI_TASK,
            timer: None,
            wake: None,
            lock: None,
        }
    }

    /// Override the background task parameters
    pub fn with_task(mut self, spec: TaskSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Handle to the renderer lock, once started
    pub fn gui_lock(&self) -> Option<GuiLock<R>> {
        self.lock.clone()
    }

    /// Block until the renderer is free
    ///
    /// No-op before the backend is started.
    pub fn acquire(&self) {
        if let Some(lock) = &self.lock {
            lock.acquire();
        }
    }

    /// Hand the renderer back
    pub fn release(&self) {
        if let Some(lock) = &self.lock {
            lock.release();
        }
    }

    /// Acquire for the lifetime of the returned guard
    pub fn lock(&self) -> Option<GuiGuard<'_, R>> {
        self.lock.as_ref().map(GuiLock::lock)
    }

    /// Whether the periodic timer is running
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    fn wake_semaphore(&mut self) -> Result<R::Semaphore, GlueError> {
        if let Some(wake) = &self.wake {
            return Ok(wake.clone());
        }
        let wake = self
            .rtos
            .create_semaphore()
            .ok_or(GlueError::MutexCreation)?;
        // Created given; the task must wait for the first expiry
        wake.take();
        self.wake = Some(wake.clone());
        Ok(wake)
    }

    fn start_timer(&mut self, interval_ms: u32, wake: R::Semaphore) -> Result<(), GlueError> {
        self.stop();

        let sink = self.sink;
        let mut timer = self
            .rtos
            .create_periodic_timer("gui_tick", move || {
                sink.tick_inc(interval_ms);
                wake.give();
            })
            .ok_or(TickError::TimerUnavailable)?;
        timer.start(interval_ms as u64 * 1000);
        self.timer = Some(timer);

        Ok(())
    }
}

impl<R, S, H> TickBackend for RtosTick<R, S, H>
where
    R: Rtos,
    S: TickSink,
    H: FnMut() + Send + 'static,
{
    fn start(&mut self, interval_ms: u32) -> Result<(), GlueError> {
        if interval_ms == 0 {
            return Err(TickError::ZeroInterval.into());
        }

        let wake = self.wake_semaphore()?;
        if self.lock.is_some() {
            // Background task survives a stop; only the timer is replaced
            return self.start_timer(interval_ms, wake);
        }

        let semaphore = self
            .rtos
            .create_semaphore()
            .ok_or(GlueError::MutexCreation)?;

        // A failed spawn consumed the handler
        let mut handler = self.handler.take().ok_or(GlueError::TaskCreation)?;

        // Held until the lock is published so the task cannot run early
        semaphore.take();

        let task_semaphore = semaphore.clone();
        let task_wake = wake.clone();
        let spawned = self.rtos.spawn_pinned(&self.spec, move || loop {
            task_wake.take();
            task_semaphore.take();
            handler();
            task_semaphore.give();
        });

        let owner = match spawned {
            Some(owner) => owner,
            None => {
                semaphore.give();
                return Err(GlueError::TaskCreation);
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!("tick: renderer task '{}' started", self.spec.name);

        self.lock = Some(GuiLock::new(self.rtos.clone(), semaphore.clone(), owner));
        semaphore.give();

        self.start_timer(interval_ms, wake)
    }

    fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }
}
