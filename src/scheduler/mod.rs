//! Thread hand-off between background workers and the simulation thread.
//!
//! Mirrors a game-server threading model: a worker pool absorbs disk and
//! decode work, while a single simulation thread owns every live world
//! mutation. Hand-off between the two is explicit scheduling, not shared
//! memory.

mod thread_scheduler;

pub use thread_scheduler::{ThreadScheduler, ThreadSchedulerConfig};

use std::time::Duration;

/// Unit of scheduled work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Host scheduler surface consumed by the session manager.
///
/// Implementations must serialize all `run_simulation` and
/// `run_simulation_later` tasks onto one thread; background tasks may run
/// concurrently with each other and with simulation tasks.
pub trait Scheduler: Send + Sync {
    /// Run `task` on a background worker thread.
    fn run_background(&self, task: Task);

    /// Enqueue `task` onto the simulation thread.
    fn run_simulation(&self, task: Task);

    /// Enqueue `task` onto the simulation thread once `delay` has elapsed.
    fn run_simulation_later(&self, delay: Duration, task: Task);
}
