//! Last-write-wins cache for data-bound listing views.
//!
//! A view re-fetches whenever its search term or session changes, and the
//! completions are not guaranteed to arrive in order. Each fetch takes a
//! generation ticket; committing with an outdated ticket is a no-op, so a
//! slow early response can never overwrite a fresher one.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Matches the session inactivity expiry; a session's views have no reader
/// once the session itself is gone.
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60 * 24);
const SWEEP_EVERY: u64 = 256;

/// Identifies one data-bound view instance: the browser session it belongs
/// to and the view's name, including any scope such as a division id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub session: String,
    pub view: String,
}

impl ViewKey {
    pub fn new(session: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            view: view.into(),
        }
    }
}

/// Handed out when a fetch starts; proves which generation the result
/// belongs to.
#[derive(Debug)]
pub struct FetchTicket {
    key: ViewKey,
    generation: u64,
}

struct Entry {
    generation: u64,
    committed: Option<Value>,
    touched: Instant,
}

pub struct ViewCache {
    entries: DashMap<ViewKey, Entry>,
    idle_ttl: Duration,
    begins: AtomicU64,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            idle_ttl,
            begins: AtomicU64::new(0),
        }
    }

    /// Start a new fetch for the view, superseding any in-flight one.
    pub fn begin(&self, key: ViewKey) -> FetchTicket {
        if self.begins.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == 0 {
            self.evict_idle();
        }

        let mut entry = self.entries.entry(key.clone()).or_insert_with(|| Entry {
            generation: 0,
            committed: None,
            touched: Instant::now(),
        });
        entry.generation += 1;
        entry.touched = Instant::now();
        FetchTicket {
            key,
            generation: entry.generation,
        }
    }

    /// Apply a completed fetch. Returns false, leaving the cache untouched,
    /// when a newer fetch has started since the ticket was issued.
    pub fn commit(&self, ticket: &FetchTicket, items: Value) -> bool {
        let Some(mut entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if ticket.generation != entry.generation {
            return false;
        }
        entry.committed = Some(items);
        entry.touched = Instant::now();
        true
    }

    /// Drop views no fetch has touched within the idle window.
    pub fn evict_idle(&self) {
        self.entries
            .retain(|_, entry| entry.touched.elapsed() < self.idle_ttl);
    }

    /// The freshest committed collection for the view, if any fetch has won.
    pub fn current(&self, key: &ViewKey) -> Option<Value> {
        self.entries
            .get(key)
            .and_then(|entry| entry.committed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stale_result_is_discarded() {
        let cache = ViewCache::new();
        let key = ViewKey::new("sess-1", "tournaments");

        // Fetch A (search = "x") starts before fetch B (search = "y") but
        // completes after it.
        let ticket_a = cache.begin(key.clone());
        let ticket_b = cache.begin(key.clone());

        assert!(cache.commit(&ticket_b, json!([{"name": "y"}])));
        assert!(!cache.commit(&ticket_a, json!([{"name": "x"}])));

        assert_eq!(cache.current(&key), Some(json!([{"name": "y"}])));
    }

    #[test]
    fn newest_fetch_wins_in_order_too() {
        let cache = ViewCache::new();
        let key = ViewKey::new("sess-1", "tournaments");

        let ticket_a = cache.begin(key.clone());
        assert!(cache.commit(&ticket_a, json!(["a"])));

        let ticket_b = cache.begin(key.clone());
        assert!(cache.commit(&ticket_b, json!(["b"])));

        assert_eq!(cache.current(&key), Some(json!(["b"])));
    }

    #[test]
    fn pending_newer_fetch_blocks_older_commit() {
        let cache = ViewCache::new();
        let key = ViewKey::new("sess-1", "participants");

        let ticket_a = cache.begin(key.clone());
        let _ticket_b = cache.begin(key.clone());

        // B is still in flight; A's late arrival must not surface.
        assert!(!cache.commit(&ticket_a, json!(["a"])));
        assert_eq!(cache.current(&key), None);
    }

    #[test]
    fn idle_views_are_evicted() {
        let cache = ViewCache::with_idle_ttl(Duration::ZERO);
        let key = ViewKey::new("sess-1", "tournaments");

        let ticket = cache.begin(key.clone());
        assert!(cache.commit(&ticket, json!(["t"])));
        assert_eq!(cache.current(&key), Some(json!(["t"])));

        cache.evict_idle();
        assert_eq!(cache.current(&key), None);
    }

    #[test]
    fn recently_touched_views_survive_the_sweep() {
        let cache = ViewCache::with_idle_ttl(Duration::from_secs(60));
        let key = ViewKey::new("sess-1", "tournaments");

        let ticket = cache.begin(key.clone());
        assert!(cache.commit(&ticket, json!(["t"])));

        cache.evict_idle();
        assert_eq!(cache.current(&key), Some(json!(["t"])));
    }

    #[test]
    fn views_are_keyed_independently() {
        let cache = ViewCache::new();
        let tournaments = ViewKey::new("sess-1", "tournaments");
        let participants = ViewKey::new("sess-1", "participants");

        let ticket_t = cache.begin(tournaments.clone());
        let ticket_p = cache.begin(participants.clone());

        assert!(cache.commit(&ticket_t, json!(["t"])));
        assert!(cache.commit(&ticket_p, json!(["p"])));

        assert_eq!(cache.current(&tournaments), Some(json!(["t"])));
        assert_eq!(cache.current(&participants), Some(json!(["p"])));
    }
}
