//! Dedicated timer thread with a deadline heap.
//!
//! Callbacks run on the timer thread, one at a time, and receive the deadline
//! they were scheduled for rather than the wall-clock instant they fired at.
//! Periodic timers re-arm at `deadline + period` so jitter never accumulates.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::error::Result;

type Callback = Box<dyn FnMut(Instant) + Send + 'static>;

struct Task {
    active: AtomicBool,
    callback: Mutex<Callback>,
}

struct Entry {
    deadline: Instant,
    seq: u64,
    period: Option<Duration>,
    task: Arc<Task>,
}

// Min-heap on (deadline, seq).
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

#[derive(Default)]
struct Queue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    shutdown: bool,
}

impl Queue {
    fn push(&mut self, deadline: Instant, period: Option<Duration>, task: Arc<Task>) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Entry {
            deadline,
            seq,
            period,
            task,
        });
    }
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
}

/// Handle to a scheduled callback.
///
/// Dropping the handle does not cancel the callback.
#[derive(Clone)]
pub struct TimerHandle {
    task: Arc<Task>,
    timer_thread: ThreadId,
}

impl TimerHandle {
    /// Cancel the callback.
    ///
    /// Once this returns the callback will not be started again. When called
    /// from another thread it also waits for an in-flight invocation to finish.
    pub fn cancel(&self) {
        self.task.active.store(false, AtomicOrdering::SeqCst);
        if thread::current().id() != self.timer_thread {
            drop(self.task.callback.lock());
        }
    }

    /// Mark the callback cancelled without waiting for an in-flight invocation.
    ///
    /// For callers holding a lock the callback may itself need.
    pub fn cancel_nowait(&self) {
        self.task.active.store(false, AtomicOrdering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.task.active.load(AtomicOrdering::SeqCst)
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Timer facility owning one worker thread.
pub struct Timer {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

impl Timer {
    pub fn new() -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("beamsim-timer".into())
            .spawn(move || run(&worker))?;
        let thread_id = thread.thread().id();
        Ok(Self {
            shared,
            thread: Some(thread),
            thread_id,
        })
    }

    /// Run `f` once at `deadline`.
    pub fn schedule_at<F>(&self, deadline: Instant, f: F) -> TimerHandle
    where
        F: FnOnce(Instant) + Send + 'static,
    {
        let mut slot = Some(f);
        let task = self.task(Box::new(move |at| {
            if let Some(f) = slot.take() {
                f(at);
            }
        }));
        self.enqueue(deadline, None, &task);
        self.handle(task)
    }

    /// Run `f` once, `delay` from now.
    pub fn schedule_after<F>(&self, delay: Duration, f: F) -> TimerHandle
    where
        F: FnOnce(Instant) + Send + 'static,
    {
        self.schedule_at(Instant::now() + delay, f)
    }

    /// Run `f` at `first`, then every `period` after the previous deadline.
    pub fn schedule_periodic<F>(&self, first: Instant, period: Duration, f: F) -> TimerHandle
    where
        F: FnMut(Instant) + Send + 'static,
    {
        let task = self.task(Box::new(f));
        self.enqueue(first, Some(period), &task);
        self.handle(task)
    }

    /// Number of entries still queued (cancelled ones included until popped).
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().heap.len()
    }

    fn task(&self, callback: Callback) -> Arc<Task> {
        Arc::new(Task {
            active: AtomicBool::new(true),
            callback: Mutex::new(callback),
        })
    }

    fn enqueue(&self, deadline: Instant, period: Option<Duration>, task: &Arc<Task>) {
        let mut q = self.shared.queue.lock();
        q.push(deadline, period, Arc::clone(task));
        drop(q);
        self.shared.wake.notify_one();
    }

    fn handle(&self, task: Arc<Task>) -> TimerHandle {
        TimerHandle {
            task,
            timer_thread: self.thread_id,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.shared.queue.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(t) = self.thread.take() {
            if thread::current().id() != self.thread_id && t.join().is_err() {
                log::error!("timer thread exited by panic");
            }
        }
    }
}

fn run(shared: &Shared) {
    let mut q = shared.queue.lock();
    loop {
        if q.shutdown {
            break;
        }

        let next = match q.heap.peek() {
            Some(e) => e.deadline,
            None => {
                shared.wake.wait(&mut q);
                continue;
            }
        };

        if next > Instant::now() {
            let _ = shared.wake.wait_until(&mut q, next);
            continue;
        }

        let Some(entry) = q.heap.pop() else {
            continue;
        };

        if let Some(again) = MutexGuard::unlocked(&mut q, || fire(entry)) {
            q.push(again.deadline, again.period, again.task);
        }
    }
}

/// Fire one entry; returns it re-armed for periodic timers.
///
/// A panicking callback is retired; the thread keeps serving everyone else.
fn fire(mut entry: Entry) -> Option<Entry> {
    {
        let mut cb = entry.task.callback.lock();
        if !entry.task.active.load(AtomicOrdering::SeqCst) {
            return None;
        }
        let deadline = entry.deadline;
        if panic::catch_unwind(AssertUnwindSafe(|| (*cb)(deadline))).is_err() {
            log::error!("timer callback panicked; cancelling it");
            entry.task.active.store(false, AtomicOrdering::SeqCst);
            return None;
        }
    }

    match entry.period {
        Some(p) if entry.task.active.load(AtomicOrdering::SeqCst) => {
            entry.deadline += p;
            Some(entry)
        }
        Some(_) => None,
        None => {
            entry.task.active.store(false, AtomicOrdering::SeqCst);
            None
        }
    }
}
