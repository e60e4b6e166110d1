//! Hosted scheduler on std threads
//!
//! Lets the scheduler-driven backend run on a desktop for simulation and
//! tests. Core pinning and priorities are ignored.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tftglue_hal::rtos::{BinarySemaphore, PeriodicTimer, Rtos, TaskSpec};

/// Scheduler backed by OS threads
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRtos;

/// Binary semaphore on a mutex and condition variable
#[derive(Clone)]
pub struct StdSemaphore {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StdSemaphore {
    fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(true), Condvar::new())),
        }
    }
}

impl BinarySemaphore for StdSemaphore {
    fn take(&self) {
        let (available, cond) = &*self.inner;
        let mut available = available.lock().unwrap_or_else(PoisonError::into_inner);
        while !*available {
            available = cond.wait(available).unwrap_or_else(PoisonError::into_inner);
        }
        *available = false;
    }

    fn give(&self) {
        let (available, cond) = &*self.inner;
        *available.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cond.notify_one();
    }
}

/// Periodic timer on a sleeping thread
///
/// Each start bumps a generation counter; a timer thread exits as soon as
/// it sees a newer generation.
pub struct StdTimer {
    name: &'static str,
    callback: Arc<dyn Fn() + Send + Sync>,
    generation: Arc<AtomicU32>,
    running: bool,
}

impl PeriodicTimer for StdTimer {
    fn start(&mut self, period_us: u64) {
        if self.running {
            return;
        }

        let mine = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let generation = self.generation.clone();
        let callback = self.callback.clone();
        let period = Duration::from_micros(period_us);

        let spawned = thread::Builder::new()
            .name(self.name.into())
            .spawn(move || loop {
                thread::sleep(period);
                if generation.load(Ordering::Acquire) != mine {
                    break;
                }
                callback();
            });

        self.running = spawned.is_ok();
    }

    fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.running = false;
    }
}

impl Drop for StdTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Rtos for StdRtos {
    type TaskId = ThreadId;
    type Semaphore = StdSemaphore;
    type Timer = StdTimer;

    fn create_semaphore(&self) -> Option<StdSemaphore> {
        Some(StdSemaphore::new())
    }

    fn spawn_pinned<F>(&self, spec: &TaskSpec, body: F) -> Option<ThreadId>
    where
        F: FnOnce() + Send + 'static,
    {
        thread::Builder::new()
            .name(spec.name.into())
            .stack_size(spec.stack_size.max(64 * 1024))
            .spawn(body)
            .ok()
            .map(|handle| handle.thread().id())
    }

    fn current_task(&self) -> ThreadId {
        thread::current().id()
    }

    fn create_periodic_timer<F>(&self, name: &'static str, callback: F) -> Option<StdTimer>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Some(StdTimer {
            name,
            callback: Arc::new(callback),
            generation: Arc::new(AtomicU32::new(0)),
            running: false,
        })
    }
}
