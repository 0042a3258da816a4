use std::{
    collections::HashMap,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;

/// Per-URL debounce: bursts of triggers for one URL collapse into a single
/// run once the quiet period elapses, and the last trigger's arguments win.
/// Unrelated URLs debounce independently, so a storm of distinct URLs still
/// evaluates each of them.
pub struct UrlDebouncer {
    window: Duration,
    pending: Arc<Mutex<HashMap<String, u64>>>,
    seq: AtomicU64,
}

impl UrlDebouncer {
    pub fn new(window: Duration) -> Arc<Self> {
        Arc::new(Self {
            window,
            pending: Arc::new(Mutex::new(HashMap::new())),
            seq: AtomicU64::new(0),
        })
    }

    /// Arms (or re-arms) the URL's quiet period and runs `run` only if no
    /// newer trigger for the same URL lands before it elapses.
    pub fn trigger<F, Fut>(&self, url: &str, run: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending.lock().insert(url.to_string(), generation);

        let pending = self.pending.clone();
        let window = self.window;
        let key = url.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let still_current = {
                let mut pending = pending.lock();
                if pending.get(&key) == Some(&generation) {
                    pending.remove(&key);
                    true
                } else {
                    false
                }
            };
            if still_current {
                run().await;
            }
        });
    }
}
