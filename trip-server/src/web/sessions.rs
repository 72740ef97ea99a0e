//! In-memory planning sessions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::selection::SelectionState;

/// A session's state. Every transition happens under the lock.
pub type SessionHandle = Arc<Mutex<SelectionState>>;

/// Sessions keyed by id, dropped after a period without access.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<u64, SessionHandle>,
    next_id: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new(idle: Duration, max_capacity: u64) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(idle)
            .max_capacity(max_capacity)
            .build();

        Self {
            sessions,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Start a new session in the searching view.
    pub async fn create(&self) -> (u64, SessionHandle) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = Arc::new(Mutex::new(SelectionState::new()));
        self.sessions.insert(id, handle.clone()).await;
        (id, handle)
    }

    pub async fn get(&self, id: u64) -> Option<SessionHandle> {
        self.sessions.get(&id).await
    }

    pub fn entry_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60), 10_000)
    }
}
