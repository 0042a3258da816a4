use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{domain::Verdict, tasks::ExpiryScheduler};

/// URL → verdict cache with a fixed time-to-live and no size bound; eviction
/// is purely time-based. Each insert schedules its own removal, and the
/// removal is generation-checked so a stale sweep never evicts a fresher
/// write for the same URL.
pub struct ResultCache {
    ttl: Duration,
    scheduler: Arc<ExpiryScheduler>,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    generation: AtomicU64,
}

struct CacheEntry {
    verdict: Verdict,
    inserted_at: Instant,
    generation: u64,
}

impl ResultCache {
    pub fn new(ttl: Duration, scheduler: Arc<ExpiryScheduler>) -> Arc<Self> {
        Arc::new(Self {
            ttl,
            scheduler,
            entries: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        })
    }

    /// Entries past their TTL are refused even if the sweep has not fired
    /// yet.
    pub fn get(&self, url: &str) -> Option<Verdict> {
        let entries = self.entries.lock();
        entries
            .get(url)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.verdict.clone())
    }

    /// Overwriting an existing URL resets only that entry's expiry.
    pub fn put(&self, url: &str, verdict: Verdict) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.lock().insert(
            url.to_string(),
            CacheEntry {
                verdict,
                inserted_at: Instant::now(),
                generation,
            },
        );

        let entries = Arc::downgrade(&self.entries);
        let key = url.to_string();
        self.scheduler.schedule(self.ttl, move || async move {
            let Some(entries) = entries.upgrade() else {
                return;
            };
            let mut entries = entries.lock();
            // A fresher write for the same URL wins over this sweep.
            if entries
                .get(&key)
                .map_or(false, |entry| entry.generation == generation)
            {
                entries.remove(&key);
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
