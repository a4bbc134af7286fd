//! Standalone scheduler with its own worker pool and simulation thread.
//!
//! Hosts embedding the crate into a real game server will usually adapt the
//! server's scheduler instead; this implementation exists for standalone
//! use and tests.

use std::collections::BinaryHeap;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use super::{Scheduler, Task};
use crate::constants::scheduling::MAX_DEFAULT_WORKERS;

/// Configuration for [`ThreadScheduler`].
#[derive(Clone, Debug)]
pub struct ThreadSchedulerConfig {
    /// Worker threads for background tasks.
    pub worker_threads: usize,
    /// Thread name prefix, visible in profilers and panic messages.
    pub thread_name: String,
}

impl Default for ThreadSchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get().min(MAX_DEFAULT_WORKERS).max(1),
            thread_name: "schematic".to_string(),
        }
    }
}

enum SimCommand {
    Run(Task),
    RunAt(Instant, Task),
    Shutdown,
}

struct DelayedTask {
    deadline: Instant,
    /// Submission order, so same-deadline tasks stay FIFO.
    seq: u64,
    task: Task,
}

impl PartialEq for DelayedTask {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for DelayedTask {}

impl PartialOrd for DelayedTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DelayedTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the max-heap pops the earliest deadline first.
        other
            .deadline
            .cmp(&self.deadline)
            .then(other.seq.cmp(&self.seq))
    }
}

/// Worker pool plus a dedicated simulation thread with a delayed-task queue.
pub struct ThreadScheduler {
    background_tx: Option<Sender<Task>>,
    sim_tx: Option<Sender<SimCommand>>,
    workers: Vec<thread::JoinHandle<()>>,
    sim_thread: Option<thread::JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn new(config: ThreadSchedulerConfig) -> std::io::Result<Self> {
        let worker_count = config.worker_threads.max(1);
        let (background_tx, background_rx) = unbounded::<Task>();
        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let rx = background_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-worker-{}", config.thread_name, index))
                .spawn(move || worker_loop(rx))?;
            workers.push(handle);
        }

        let (sim_tx, sim_rx) = unbounded::<SimCommand>();
        let sim_thread = thread::Builder::new()
            .name(format!("{}-sim", config.thread_name))
            .spawn(move || simulation_loop(sim_rx))?;

        log::info!(
            "[ThreadScheduler] started with {} worker thread(s)",
            worker_count
        );

        Ok(Self {
            background_tx: Some(background_tx),
            sim_tx: Some(sim_tx),
            workers,
            sim_thread: Some(sim_thread),
        })
    }

    /// Stop accepting work and join all threads.
    ///
    /// Queued simulation tasks ahead of the shutdown command still run;
    /// pending delayed tasks are dropped. Also invoked from `Drop`.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.sim_tx.take() {
            let _ = tx.send(SimCommand::Shutdown);
        }
        // Disconnecting the channel ends the worker loops.
        self.background_tx.take();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        if let Some(handle) = self.sim_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn run_background(&self, task: Task) {
        match &self.background_tx {
            Some(tx) => {
                if tx.send(task).is_err() {
                    log::warn!("[ThreadScheduler] worker pool is gone, dropping background task");
                }
            }
            None => log::warn!("[ThreadScheduler] run_background after shutdown"),
        }
    }

    fn run_simulation(&self, task: Task) {
        match &self.sim_tx {
            Some(tx) => {
                if tx.send(SimCommand::Run(task)).is_err() {
                    log::warn!("[ThreadScheduler] simulation thread is gone, dropping task");
                }
            }
            None => log::warn!("[ThreadScheduler] run_simulation after shutdown"),
        }
    }

    fn run_simulation_later(&self, delay: Duration, task: Task) {
        let deadline = Instant::now() + delay;
        match &self.sim_tx {
            Some(tx) => {
                if tx.send(SimCommand::RunAt(deadline, task)).is_err() {
                    log::warn!("[ThreadScheduler] simulation thread is gone, dropping delayed task");
                }
            }
            None => log::warn!("[ThreadScheduler] run_simulation_later after shutdown"),
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(rx: Receiver<Task>) {
    while let Ok(task) = rx.recv() {
        task();
    }
}

fn simulation_loop(rx: Receiver<SimCommand>) {
    let mut delayed: BinaryHeap<DelayedTask> = BinaryHeap::new();
    let mut seq: u64 = 0;

    loop {
        let now = Instant::now();
        while delayed.peek().map_or(false, |next| next.deadline <= now) {
            if let Some(due) = delayed.pop() {
                (due.task)();
            }
        }

        let command = match delayed.peek() {
            Some(next) => {
                let wait = next.deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
        };

        match command {
            SimCommand::Run(task) => task(),
            SimCommand::RunAt(deadline, task) => {
                seq += 1;
                delayed.push(DelayedTask {
                    deadline,
                    seq,
                    task,
                });
            }
            SimCommand::Shutdown => break,
        }
    }

    if !delayed.is_empty() {
        log::debug!(
            "[ThreadScheduler] dropping {} pending delayed task(s) on shutdown",
            delayed.len()
        );
    }
}
