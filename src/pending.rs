//! Pending work queues for multi-URL batches.
//!
//! A caller that receives several URLs at once registers the tail of the
//! batch here, then pops one URL per user action until the batch drains or
//! its TTL lapses. Expiry is enforced lazily at access time; there is no
//! background sweeper.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// How long a batch stays poppable after creation.
pub const QUEUE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct QueueEntry {
    remaining_urls: VecDeque<String>,
    processed_count: usize,
    total_count: usize,
    expires_at: Instant,
}

/// One popped work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextItem {
    pub url: String,
    /// 1-based position of the item after this one, for display.
    pub next_index: usize,
    pub total_count: usize,
    pub has_more: bool,
}

/// In-memory, TTL-bounded queues keyed by an opaque id.
///
/// Each id is logically owned by the caller that created it. A concurrent
/// pop that loses the race sees an empty result, never an error.
pub struct PendingQueues {
    queues: Mutex<HashMap<String, QueueEntry>>,
    ttl: Duration,
}

impl PendingQueues {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(QUEUE_TTL)
    }

    /// Queue store with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Register a batch under `id`, replacing any previous batch with the
    /// same id.
    ///
    /// `processed_count` is how many of the batch's URLs were already
    /// handled before the remainder was queued.
    pub async fn create(
        &self,
        id: impl Into<String>,
        remaining_urls: Vec<String>,
        processed_count: usize,
        total_count: usize,
    ) {
        let entry = QueueEntry {
            remaining_urls: VecDeque::from(remaining_urls),
            processed_count,
            total_count,
            expires_at: Instant::now() + self.ttl,
        };
        self.queues.lock().await.insert(id.into(), entry);
    }

    /// Pop the next URL from batch `id`.
    ///
    /// Returns `None` when the id is unknown, expired, or drained. The
    /// entry is deleted on the pop that drains it, so a drained id behaves
    /// exactly like an unknown one afterwards.
    pub async fn pop_next(&self, id: &str) -> Option<NextItem> {
        let mut queues = self.queues.lock().await;

        let entry = queues.get_mut(id)?;
        if Instant::now() >= entry.expires_at {
            debug!(%id, "queue expired, dropping");
            queues.remove(id);
            return None;
        }

        let Some(url) = entry.remaining_urls.pop_front() else {
            queues.remove(id);
            return None;
        };
        entry.processed_count += 1;

        let has_more = !entry.remaining_urls.is_empty();
        let item = NextItem {
            url,
            next_index: entry.processed_count + 1,
            total_count: entry.total_count,
            has_more,
        };
        if !has_more {
            queues.remove(id);
        }
        Some(item)
    }
}

impl Default for PendingQueues {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique queue id for one conversation at one instant.
#[must_use]
pub fn make_id(conversation_id: i64) -> String {
    format!(
        "q{}_{}",
        conversation_id,
        chrono::Utc::now().timestamp_millis()
    )
}
