use std::{
    cmp::Ordering as CmpOrdering,
    collections::BinaryHeap,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::{sync::Notify, task::JoinHandle, time::Instant};

use crate::infrastructure::shutdown::ShutdownListener;

type CleanupAction = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// One shared timer wheel for every self-expiring entry (cache rows,
/// suppression entries, evidence records): a min-heap of deadlines, drained
/// by a single task. Cleanup actions racing an in-flight handler on the same
/// key must tolerate losing (the handler's write wins).
pub struct ExpiryScheduler {
    queue: Mutex<BinaryHeap<Entry>>,
    seq: AtomicU64,
    wake: Notify,
}

struct Entry {
    deadline: Instant,
    seq: u64,
    action: CleanupAction,
}

// Heap order: earliest deadline first, insertion order as tie-break.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl ExpiryScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(BinaryHeap::new()),
            seq: AtomicU64::new(0),
            wake: Notify::new(),
        })
    }

    /// Registers a cleanup action to run once `after` has elapsed.
    pub fn schedule<F, Fut>(&self, after: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let entry = Entry {
            deadline: Instant::now() + after,
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            action: Box::new(move || -> BoxFuture<'static, ()> { Box::pin(action()) }),
        };
        self.queue.lock().push(entry);
        // The new entry may be the new front; the loop re-peeks on wake.
        self.wake.notify_one();
    }

    pub fn spawn(self: Arc<Self>, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run_loop(&mut shutdown).await;
        })
    }

    async fn run_loop(&self, shutdown: &mut ShutdownListener) {
        loop {
            if shutdown.is_triggered() {
                break;
            }

            let next_deadline = self.queue.lock().peek().map(|entry| entry.deadline);
            match next_deadline {
                None => {
                    tokio::select! {
                        _ = self.wake.notified() => {}
                        _ = shutdown.notified() => break,
                    }
                }
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => self.run_due().await,
                        _ = self.wake.notified() => {}
                        _ = shutdown.notified() => break,
                    }
                }
            }
        }
        tracing::info!(target: "expiry", "expiry scheduler stopped");
    }

    async fn run_due(&self) {
        loop {
            let due = {
                let mut queue = self.queue.lock();
                match queue.peek() {
                    Some(entry) if entry.deadline <= Instant::now() => {
                        queue.pop().map(|entry| entry.action)
                    }
                    _ => None,
                }
            };
            match due {
                Some(action) => action().await,
                None => break,
            }
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}
