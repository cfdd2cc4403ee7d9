//! Thread pools that run one batch of jobs per frame.
//!
//! Both pools share the same round protocol: `submit` jobs, `run_all` to
//! start them together, then `wait_all` to block until every job of the
//! round has finished. Jobs of a round may run in any order.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::RenderError;

/// A unit of work handed to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Batch-synchronous job pool.
pub trait JobPool: Send {
    /// Queue a job for the next round. Nothing runs until [`JobPool::run_all`].
    fn submit(&mut self, job: Job);

    /// Start every job submitted since the last [`JobPool::wait_all`].
    fn run_all(&mut self);

    /// Block until every started job has finished.
    ///
    /// Returns one [`RenderError::JobFailed`] per job that panicked, indexed
    /// by submission order within the round.
    fn wait_all(&mut self) -> Vec<RenderError>;

    /// Number of threads the pool currently owns.
    fn workers(&self) -> usize;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Jobs run outside every lock, so a poisoned lock still holds valid data
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run a job, turning a panic into `false`.
fn run_guarded(job: Job) -> bool {
    panic::catch_unwind(AssertUnwindSafe(job)).is_ok()
}

struct SlotState {
    job: Option<Job>,
    /// Round this slot was last started for
    generation: u64,
    alive: bool,
}

/// One persistent worker's mailbox.
struct Slot {
    index: usize,
    state: Mutex<SlotState>,
    start: Condvar,
}

/// State shared between the pool and all of its workers.
struct Shared {
    /// Jobs finished in the current round
    completed: AtomicUsize,
    /// Slot indices whose job panicked this round
    failures: Mutex<Vec<usize>>,
}

struct Worker {
    slot: Arc<Slot>,
    handle: Option<JoinHandle<()>>,
}

/// Fixed set of long-lived worker threads, reused every round.
///
/// Each submitted job goes to the next slot in order; the slot list grows
/// the first time a round needs more slots than exist. Threads are spawned
/// lazily on the first round that uses their slot.
///
/// Every `run_all` opens a new generation. A worker only runs its job once
/// its slot carries a generation newer than the last one it served, so a
/// job assigned while the worker is still finishing the previous round can
/// never start before `run_all`.
pub struct WorkerPool {
    workers: Vec<Worker>,
    shared: Arc<Shared>,
    /// Jobs submitted this round (next slot to fill)
    submitted: usize,
    /// Jobs started by the last `run_all`
    running: usize,
    generation: u64,
}

impl WorkerPool {
    /// Create an empty pool with room for `capacity` workers.
    pub fn new(capacity: usize) -> Self {
        Self {
            workers: Vec::with_capacity(capacity),
            shared: Arc::new(Shared {
                completed: AtomicUsize::new(0),
                failures: Mutex::new(Vec::new()),
            }),
            submitted: 0,
            running: 0,
            generation: 0,
        }
    }

    /// Jobs submitted for the round being prepared.
    pub fn pending(&self) -> usize {
        self.submitted
    }

    fn start_worker(&mut self, index: usize) {
        let generation = self.generation;
        let worker = &mut self.workers[index];
        let slot = Arc::clone(&worker.slot);

        lock(&slot.state).generation = generation;

        if worker.handle.is_none() {
            let shared = Arc::clone(&self.shared);
            let thread_slot = Arc::clone(&slot);
            let spawned = thread::Builder::new()
                .name(format!("fogray-worker-{}", index))
                .spawn(move || worker_loop(thread_slot, shared));

            match spawned {
                Ok(handle) => {
                    log::debug!("Spawned worker {}", index);
                    worker.handle = Some(handle);
                }
                Err(e) => {
                    // Run this round's job on the calling thread instead
                    log::error!("Failed to spawn worker {}: {}", index, e);
                    let job = lock(&slot.state).job.take();
                    finish_job(&slot, &self.shared, job);
                    return;
                }
            }
        }

        slot.start.notify_one();
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}

impl JobPool for WorkerPool {
    fn submit(&mut self, job: Job) {
        if self.workers.len() == self.submitted {
            let index = self.workers.len();
            self.workers.push(Worker {
                slot: Arc::new(Slot {
                    index,
                    state: Mutex::new(SlotState {
                        job: None,
                        generation: self.generation,
                        alive: true,
                    }),
                    start: Condvar::new(),
                }),
                handle: None,
            });
            log::info!("Worker pool grew to {} slots", self.workers.len());
        }

        lock(&self.workers[self.submitted].slot.state).job = Some(job);
        self.submitted += 1;
    }

    fn run_all(&mut self) {
        self.shared.completed.store(0, Ordering::SeqCst);
        self.generation += 1;
        self.running = self.submitted;

        for index in 0..self.running {
            self.start_worker(index);
        }
    }

    fn wait_all(&mut self) -> Vec<RenderError> {
        while self.shared.completed.load(Ordering::Acquire) < self.running {
            thread::yield_now();
        }

        self.submitted = 0;
        self.running = 0;

        lock(&self.shared.failures)
            .drain(..)
            .map(|index| RenderError::JobFailed { index })
            .collect()
    }

    fn workers(&self) -> usize {
        self.workers.iter().filter(|w| w.handle.is_some()).count()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &self.workers {
            lock(&worker.slot.state).alive = false;
            worker.slot.start.notify_one();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::error!("Worker {} exited abnormally", worker.slot.index);
                }
            }
        }
    }
}

/// Body of a persistent worker thread.
fn worker_loop(slot: Arc<Slot>, shared: Arc<Shared>) {
    let mut served = 0;

    loop {
        let job = {
            let mut state = lock(&slot.state);
            while state.alive && state.generation == served {
                state = slot
                    .start
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if !state.alive {
                return;
            }
            served = state.generation;
            state.job.take()
        };

        finish_job(&slot, &shared, job);
    }
}

/// Run the job (if any) and count it as done for the round.
fn finish_job(slot: &Slot, shared: &Shared, job: Option<Job>) {
    if let Some(job) = job {
        if !run_guarded(job) {
            lock(&shared.failures).push(slot.index);
        }
    }
    shared.completed.fetch_add(1, Ordering::Release);
}

/// Pool that spawns a fresh thread for every job and joins them all in
/// `wait_all`. No threads outlive a round.
#[derive(Default)]
pub struct SpawnPool {
    pending: Vec<Job>,
    running: Vec<(usize, JoinHandle<()>)>,
    /// Jobs whose thread could not be spawned this round
    failed: Vec<usize>,
}

impl SpawnPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobPool for SpawnPool {
    fn submit(&mut self, job: Job) {
        self.pending.push(job);
    }

    fn run_all(&mut self) {
        for (index, job) in self.pending.drain(..).enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("fogray-job-{}", index))
                .spawn(job);

            match spawned {
                Ok(handle) => self.running.push((index, handle)),
                Err(e) => {
                    log::error!("Failed to spawn thread for job {}: {}", index, e);
                    self.failed.push(index);
                }
            }
        }
    }

    fn wait_all(&mut self) -> Vec<RenderError> {
        for (index, handle) in self.running.drain(..) {
            if handle.join().is_err() {
                self.failed.push(index);
            }
        }
        self.pending.clear();

        self.failed.sort_unstable();
        self.failed
            .drain(..)
            .map(|index| RenderError::JobFailed { index })
            .collect()
    }

    fn workers(&self) -> usize {
        self.running.len()
    }
}
