use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use threadview_core::domain::comments::CommentEnvelope;
use threadview_core::domain::query::{FetchError, FetchResults, InfiniteQueryState, QueryState};
use threadview_core::pipeline::{Layout, QueryKind};
use threadview_core::types::permalink::Permalink;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub permalink: Permalink,
    pub kind: QueryKind,
}

impl QueryKey {
    pub fn new(permalink: Permalink, kind: QueryKind) -> Self {
        Self { permalink, kind }
    }
}

#[derive(Debug, Clone)]
struct CachedQuery {
    pages: Vec<CommentEnvelope>,
    error: Option<FetchError>,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CachedQuery>,
    in_flight: HashSet<QueryKey>,
    capacity: usize,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashSet::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    // Error-only entries do not count, so the next open retries.
    pub fn is_cached(&self, key: &QueryKey, now: Instant) -> bool {
        self.in_flight.contains(key)
            || self
                .live(key, now)
                .is_some_and(|entry| !entry.pages.is_empty())
    }

    pub fn begin(&mut self, key: &QueryKey) -> bool {
        self.in_flight.insert(key.clone())
    }

    pub fn finish(&mut self, key: &QueryKey) {
        self.in_flight.remove(key);
    }

    pub fn store_page(&mut self, key: QueryKey, envelope: CommentEnvelope, now: Instant) {
        let mut pages = match self.entries.remove(&key) {
            Some(entry) if key.kind.is_infinite() && !self.is_expired(&entry, now) => entry.pages,
            _ => Vec::new(),
        };
        pages.push(envelope);
        self.insert(
            key,
            CachedQuery {
                pages,
                error: None,
                stored_at: now,
            },
        );
    }

    pub fn store_error(&mut self, key: QueryKey, error: FetchError, now: Instant) {
        let pages = match self.entries.remove(&key) {
            Some(entry) if !self.is_expired(&entry, now) => entry.pages,
            _ => Vec::new(),
        };
        self.insert(
            key,
            CachedQuery {
                pages,
                error: Some(error),
                stored_at: now,
            },
        );
    }

    pub fn snapshot(&self, permalink: &Permalink, layout: Layout, now: Instant) -> FetchResults {
        let lazy = QueryKey::new(permalink.clone(), QueryKind::lazy(layout));
        let infinite = QueryKey::new(permalink.clone(), QueryKind::infinite(layout));
        let mut results = FetchResults::default();
        match layout {
            Layout::Nested => {
                results.nested_lazy = self.lazy_state(&lazy, now);
                results.nested_infinite = self.infinite_state(&infinite, now);
            }
            Layout::Flat => {
                results.flat_lazy = self.lazy_state(&lazy, now);
                results.flat_infinite = self.infinite_state(&infinite, now);
            }
        }
        results
    }

    pub fn next_cursor(&self, key: &QueryKey, now: Instant) -> Option<String> {
        self.live(key, now)
            .and_then(|entry| entry.pages.last())
            .and_then(|page| page.comments().after.clone())
    }

    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn lazy_state(&self, key: &QueryKey, now: Instant) -> QueryState<CommentEnvelope> {
        let entry = self.live(key, now);
        QueryState {
            data: entry.and_then(|entry| entry.pages.last().cloned()),
            is_loading: self.in_flight.contains(key),
            error: entry.and_then(|entry| entry.error.clone()),
        }
    }

    fn infinite_state(&self, key: &QueryKey, now: Instant) -> InfiniteQueryState {
        let entry = self.live(key, now);
        let pages = entry
            .map(|entry| entry.pages.clone())
            .filter(|pages| !pages.is_empty());
        let has_next_page = pages
            .as_ref()
            .and_then(|pages| pages.last())
            .is_some_and(|page| page.comments().after.is_some());
        let running = self.in_flight.contains(key);
        InfiniteQueryState {
            is_loading: running && pages.is_none(),
            is_fetching_next_page: running && pages.is_some(),
            has_next_page,
            pages,
            error: entry.and_then(|entry| entry.error.clone()),
        }
    }

    fn live(&self, key: &QueryKey, now: Instant) -> Option<&CachedQuery> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
    }

    fn is_expired(&self, entry: &CachedQuery, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) >= self.ttl
    }

    fn insert(&mut self, key: QueryKey, entry: CachedQuery) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, entry);
    }
}
