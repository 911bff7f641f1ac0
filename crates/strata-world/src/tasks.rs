//! Background worker pool with per-category concurrency caps.
//!
//! Each task category owns a fixed set of worker threads fed by an
//! unbounded queue. The thread count is the cap on concurrently running
//! tasks in that category; excess submissions queue without bound.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::debug;

/// A unit of background work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The kind of work a task performs, determining which thread set runs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskCategory {
    /// Chunk block generation.
    Generation = 0,
    /// Chunk mesh extraction.
    Meshing = 1,
}

impl TaskCategory {
    /// Worker thread name prefix.
    fn label(self) -> &'static str {
        match self {
            Self::Generation => "chunk-gen",
            Self::Meshing => "chunk-mesh",
        }
    }
}

struct Category {
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    submitted: Arc<AtomicU64>,
}

impl Category {
    fn new(category: TaskCategory, threads: usize) -> Self {
        let (sender, receiver) = unbounded::<Task>();
        let workers = (0..threads.max(1))
            .map(|i| {
                let receiver: Receiver<Task> = receiver.clone();
                std::thread::Builder::new()
                    .name(format!("{}-{i}", category.label()))
                    .spawn(move || {
                        while let Ok(task) = receiver.recv() {
                            task();
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
            submitted: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Fixed-size thread pools for generation and meshing work.
///
/// Dropping the pool closes both queues and joins every worker; queued
/// tasks still run to completion first.
pub struct WorkerPool {
    categories: [Category; 2],
}

impl WorkerPool {
    /// Creates a pool with the given thread count per category. Counts are
    /// clamped to at least one thread.
    pub fn new(generation_threads: usize, meshing_threads: usize) -> Self {
        debug!(
            generation_threads,
            meshing_threads, "starting worker pool"
        );
        Self {
            categories: [
                Category::new(TaskCategory::Generation, generation_threads),
                Category::new(TaskCategory::Meshing, meshing_threads),
            ],
        }
    }

    /// A default sizing that leaves headroom for the frame thread.
    pub fn default_threads() -> usize {
        (num_cpus::get().saturating_sub(2)).max(1)
    }

    /// Queues a task. Never blocks; the per-category thread count bounds
    /// how many submitted tasks run at once.
    pub fn submit(&self, category: TaskCategory, task: impl FnOnce() + Send + 'static) {
        let cat = &self.categories[category as usize];
        cat.submitted.fetch_add(1, Ordering::Relaxed);
        if let Some(sender) = &cat.sender {
            // Send fails only mid-shutdown; the task is then dropped.
            let _ = sender.send(Box::new(task));
        }
    }

    /// Total tasks ever submitted in a category.
    pub fn submitted(&self, category: TaskCategory) -> u64 {
        self.categories[category as usize]
            .submitted
            .load(Ordering::Relaxed)
    }

    /// Tasks currently waiting in a category's queue (excludes running).
    pub fn queued(&self, category: TaskCategory) -> usize {
        self.categories[category as usize]
            .sender
            .as_ref()
            .map_or(0, Sender::len)
    }

    /// Worker threads serving a category.
    pub fn threads(&self, category: TaskCategory) -> usize {
        self.categories[category as usize].workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for cat in &mut self.categories {
            // Closing the channel lets workers drain and exit.
            cat.sender.take();
        }
        let current = std::thread::current().id();
        for cat in &mut self.categories {
            for handle in cat.workers.drain(..) {
                // A task can own the last handle to the pool's owner, in
                // which case this drop runs on a worker thread; that
                // thread cannot join itself.
                if handle.thread().id() != current {
                    let _ = handle.join();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        done()
    }

    #[test]
    fn test_submitted_tasks_run() {
        let pool = WorkerPool::new(2, 1);
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let ran = Arc::clone(&ran);
            pool.submit(TaskCategory::Generation, move || {
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(
            wait_until(2000, || ran.load(Ordering::SeqCst) == 20),
            "all tasks should run, got {}",
            ran.load(Ordering::SeqCst)
        );
        assert_eq!(pool.submitted(TaskCategory::Generation), 20);
        assert_eq!(pool.submitted(TaskCategory::Meshing), 0);
    }

    #[test]
    fn test_thread_count_caps_concurrency() {
        let pool = WorkerPool::new(2, 1);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..12 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            let done = Arc::clone(&done);
            pool.submit(TaskCategory::Generation, move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                running.fetch_sub(1, Ordering::SeqCst);
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(wait_until(5000, || done.load(Ordering::SeqCst) == 12));
        assert!(
            peak.load(Ordering::SeqCst) <= 2,
            "at most 2 generation tasks may run at once, saw {}",
            peak.load(Ordering::SeqCst)
        );
    }

    #[test]
    fn test_categories_run_independently() {
        let pool = WorkerPool::new(1, 1);
        let meshed = Arc::new(AtomicUsize::new(0));
        // Occupy the single generation worker.
        pool.submit(TaskCategory::Generation, || {
            std::thread::sleep(Duration::from_millis(100));
        });
        let flag = Arc::clone(&meshed);
        pool.submit(TaskCategory::Meshing, move || {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        // The meshing task must not wait for the generation task.
        assert!(wait_until(80, || meshed.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn test_drop_drains_queue_and_joins() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(1, 1);
            for _ in 0..5 {
                let ran = Arc::clone(&ran);
                pool.submit(TaskCategory::Meshing, move || {
                    std::thread::sleep(Duration::from_millis(5));
                    ran.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        // Drop has joined the workers, so every queued task already ran.
        assert_eq!(ran.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_zero_threads_clamps_to_one() {
        let pool = WorkerPool::new(0, 0);
        assert_eq!(pool.threads(TaskCategory::Generation), 1);
        assert_eq!(pool.threads(TaskCategory::Meshing), 1);
    }
}
