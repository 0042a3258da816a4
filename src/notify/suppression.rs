use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{domain::TabId, tasks::ExpiryScheduler};

/// Tabs cooling down after a notification. Each entry expires on its own
/// timer, or earlier when the tab closes, whichever comes first.
pub struct SuppressionState {
    ttl: Duration,
    scheduler: Arc<ExpiryScheduler>,
    tabs: Arc<Mutex<HashMap<TabId, SuppressionEntry>>>,
    generation: AtomicU64,
}

struct SuppressionEntry {
    since: Instant,
    generation: u64,
}

impl SuppressionState {
    pub fn new(ttl: Duration, scheduler: Arc<ExpiryScheduler>) -> Arc<Self> {
        Arc::new(Self {
            ttl,
            scheduler,
            tabs: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        })
    }

    pub fn is_cooling(&self, tab: TabId) -> bool {
        self.tabs
            .lock()
            .get(&tab)
            .map_or(false, |entry| entry.since.elapsed() < self.ttl)
    }

    /// Starts (or restarts) the tab's cooling window.
    pub fn engage(&self, tab: TabId) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.tabs.lock().insert(
            tab,
            SuppressionEntry {
                since: Instant::now(),
                generation,
            },
        );

        let tabs = Arc::downgrade(&self.tabs);
        self.scheduler.schedule(self.ttl, move || async move {
            let Some(tabs) = tabs.upgrade() else {
                return;
            };
            let mut tabs = tabs.lock();
            // A re-engaged window outlives the sweep of the one it replaced.
            if tabs
                .get(&tab)
                .map_or(false, |entry| entry.generation == generation)
            {
                tabs.remove(&tab);
            }
        });
    }

    /// Tab closed: the cooling window dies with it.
    pub fn clear(&self, tab: TabId) {
        self.tabs.lock().remove(&tab);
    }
}
