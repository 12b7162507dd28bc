//! Stale-while-revalidate cache of remote fetch results.
//!
//! One cache instance is the single source of truth for every key. Requests
//! for a key that already has a fetch in flight attach to that fetch instead
//! of issuing a new one. Each issued request carries a generation number and
//! only the response of the latest generation is applied, so a slow earlier
//! response cannot overwrite newer data.
//!
//! The cache is single-threaded (`Rc<RefCell<..>>`): it lives on the UI
//! thread and futures are driven by `spawn_local`.

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use super::fetcher::{FetchError, Fetcher};
use super::key::Key;
use super::options::{SwrOptions, DEFAULT_DEDUPE_INTERVAL_MS};

pub type FetchResult = Result<Arc<Value>, FetchError>;

/// In-flight fetch shared by all coalesced callers
pub type SharedFetch = Shared<LocalBoxFuture<'static, FetchResult>>;

/// Time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Read-only projection of one cache entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryState {
    pub data: Option<Arc<Value>>,
    pub error: Option<FetchError>,
    pub is_validating: bool,
}

impl EntryState {
    /// First load of the key: a request is running and nothing is cached yet
    pub fn is_loading(&self) -> bool {
        self.is_validating && self.data.is_none()
    }

    pub fn status(&self) -> FetchStatus {
        if self.is_loading() {
            FetchStatus::Loading
        } else if self.error.is_some() {
            FetchStatus::Error
        } else if self.data.is_some() {
            FetchStatus::Success
        } else {
            FetchStatus::Idle
        }
    }
}

type Listener = Rc<dyn Fn(&EntryState)>;

struct Subscriber {
    id: u64,
    options: SwrOptions,
    listener: Listener,
}

struct Entry {
    key: Key,
    data: Option<Arc<Value>>,
    error: Option<FetchError>,
    in_flight: Option<SharedFetch>,
    generation: u64,
    last_request_at: Option<i64>,
    subscribers: Vec<Subscriber>,
}

impl Entry {
    fn new(key: Key) -> Self {
        Self {
            key,
            data: None,
            error: None,
            in_flight: None,
            generation: 0,
            last_request_at: None,
            subscribers: Vec::new(),
        }
    }

    fn state(&self) -> EntryState {
        EntryState {
            data: self.data.clone(),
            error: self.error.clone(),
            is_validating: self.in_flight.is_some(),
        }
    }

    fn listeners(&self) -> Vec<Listener> {
        self.subscribers.iter().map(|s| s.listener.clone()).collect()
    }

    /// The shortest window requested by any subscriber
    fn dedupe_interval_ms(&self) -> i64 {
        self.subscribers
            .iter()
            .map(|s| s.options.dedupe_interval_ms)
            .min()
            .unwrap_or(DEFAULT_DEDUPE_INTERVAL_MS) as i64
    }

    fn within_dedupe_window(&self, now: i64) -> bool {
        match self.last_request_at {
            Some(at) => self.data.is_some() && now - at < self.dedupe_interval_ms(),
            None => false,
        }
    }

    /// Store a payload, keeping the old `Arc` when nothing changed
    fn store(&mut self, value: Value) -> Arc<Value> {
        if let Some(current) = &self.data {
            if **current == value {
                return current.clone();
            }
        }
        let data = Arc::new(value);
        self.data = Some(data.clone());
        data
    }
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, Entry>,
    next_subscriber_id: u64,
}

/// Key-addressed cache of remote responses
#[derive(Clone)]
pub struct SwrCache {
    inner: Rc<RefCell<CacheInner>>,
    fetcher: Rc<dyn Fetcher>,
    clock: Rc<dyn Clock>,
}

impl SwrCache {
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self::with_clock(fetcher, SystemClock)
    }

    pub fn with_clock(fetcher: impl Fetcher + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CacheInner::default())),
            fetcher: Rc::new(fetcher),
            clock: Rc::new(clock),
        }
    }

    pub fn snapshot(&self, key: &Key) -> EntryState {
        self.inner
            .borrow()
            .entries
            .get(&key.canonical())
            .map(Entry::state)
            .unwrap_or_default()
    }

    /// Register a listener for state changes of `key`.
    ///
    /// The listener stops receiving updates once the returned handle is dropped.
    pub fn subscribe(
        &self,
        key: &Key,
        options: SwrOptions,
        listener: impl Fn(&EntryState) + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_subscriber_id += 1;
        let id = inner.next_subscriber_id;
        let canonical = key.canonical();
        inner
            .entries
            .entry(canonical.clone())
            .or_insert_with(|| Entry::new(key.clone()))
            .subscribers
            .push(Subscriber {
                id,
                options,
                listener: Rc::new(listener),
            });

        Subscription {
            inner: Rc::downgrade(&self.inner),
            key: canonical,
            id,
        }
    }

    pub fn subscriber_count(&self, key: &Key) -> usize {
        self.inner
            .borrow()
            .entries
            .get(&key.canonical())
            .map(|e| e.subscribers.len())
            .unwrap_or(0)
    }

    /// Revalidate unless a request was issued within the dedupe window.
    ///
    /// The returned future must be awaited or spawned for the fetch to run.
    pub fn revalidate(&self, key: &Key) -> SharedFetch {
        self.request(key, false)
    }

    /// Force revalidation. Still attaches to a fetch that is already in flight.
    pub fn mutate(&self, key: &Key) -> SharedFetch {
        self.request(key, true)
    }

    /// Interval tick: `None` while validating or inside the dedupe window
    pub fn poll(&self, key: &Key) -> Option<SharedFetch> {
        let now = self.clock.now_ms();
        {
            let inner = self.inner.borrow();
            if let Some(entry) = inner.entries.get(&key.canonical()) {
                if entry.in_flight.is_some() || entry.within_dedupe_window(now) {
                    return None;
                }
            }
        }
        Some(self.request(key, true))
    }

    /// Revalidate every key with a subscriber that opted into focus revalidation
    pub fn revalidate_on_focus(&self) -> Vec<SharedFetch> {
        let keys: Vec<Key> = self
            .inner
            .borrow()
            .entries
            .values()
            .filter(|e| e.subscribers.iter().any(|s| s.options.revalidate_on_focus))
            .map(|e| e.key.clone())
            .collect();
        keys.iter().map(|key| self.revalidate(key)).collect()
    }

    /// Local update. Responses of requests issued before this call are discarded.
    pub fn set_data(&self, key: &Key, value: Value) {
        let (state, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let entry = inner
                .entries
                .entry(key.canonical())
                .or_insert_with(|| Entry::new(key.clone()));
            entry.generation += 1;
            entry.in_flight = None;
            entry.error = None;
            entry.store(value);
            (entry.state(), entry.listeners())
        };
        notify(&listeners, &state);
    }

    /// Mark every key under `path_prefix` stale after a write.
    ///
    /// Entries without subscribers are dropped; mounted ones are revalidated
    /// in place and keep serving their current data meanwhile.
    pub fn invalidate_matching(&self, path_prefix: &str) -> Vec<SharedFetch> {
        let mounted: Vec<Key> = {
            let mut inner = self.inner.borrow_mut();
            inner.entries.retain(|_, e| {
                !e.key.path().starts_with(path_prefix) || !e.subscribers.is_empty()
            });
            inner
                .entries
                .values()
                .filter(|e| e.key.path().starts_with(path_prefix))
                .map(|e| e.key.clone())
                .collect()
        };
        mounted.iter().map(|key| self.mutate(key)).collect()
    }

    fn request(&self, key: &Key, force: bool) -> SharedFetch {
        let canonical = key.canonical();
        let now = self.clock.now_ms();

        let (future, state, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let entry = inner
                .entries
                .entry(canonical.clone())
                .or_insert_with(|| Entry::new(key.clone()));

            if let Some(in_flight) = &entry.in_flight {
                debug!("swr: attach to in-flight request {}", canonical);
                return in_flight.clone();
            }

            if !force && entry.within_dedupe_window(now) {
                if let Some(data) = &entry.data {
                    debug!("swr: deduped {}", canonical);
                    return future::ready(Ok(data.clone())).boxed_local().shared();
                }
            }

            entry.generation += 1;
            entry.last_request_at = Some(now);
            let generation = entry.generation;
            debug!("swr: fetch {} (generation {})", canonical, generation);

            let fetch = self.fetcher.fetch(key);
            let weak = Rc::downgrade(&self.inner);
            let apply_key = canonical.clone();
            let future = async move {
                let result = fetch.await;
                apply_result(&weak, &apply_key, generation, result)
            }
            .boxed_local()
            .shared();

            entry.in_flight = Some(future.clone());
            (future, entry.state(), entry.listeners())
        };

        notify(&listeners, &state);
        future
    }
}

fn apply_result(
    inner: &Weak<RefCell<CacheInner>>,
    key: &str,
    generation: u64,
    result: Result<Value, FetchError>,
) -> FetchResult {
    let Some(inner) = inner.upgrade() else {
        return result.map(Arc::new);
    };

    let (outcome, notification) = {
        let mut inner = inner.borrow_mut();
        match inner.entries.get_mut(key) {
            Some(entry) if entry.generation == generation => {
                entry.in_flight = None;
                let outcome = match result {
                    Ok(value) => {
                        entry.error = None;
                        Ok(entry.store(value))
                    }
                    Err(e) => {
                        warn!("swr: fetch {} failed: {}", key, e);
                        entry.error = Some(e.clone());
                        Err(e)
                    }
                };
                (outcome, Some((entry.state(), entry.listeners())))
            }
            _ => {
                debug!("swr: discard stale response {} (generation {})", key, generation);
                (result.map(Arc::new), None)
            }
        }
    };

    if let Some((state, listeners)) = notification {
        notify(&listeners, &state);
    }
    outcome
}

fn notify(listeners: &[Listener], state: &EntryState) {
    for listener in listeners {
        listener(state);
    }
}

/// Handle of one subscription; dropping it unsubscribes
pub struct Subscription {
    inner: Weak<RefCell<CacheInner>>,
    key: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                if let Some(entry) = inner.entries.get_mut(&self.key) {
                    entry.subscribers.retain(|s| s.id != self.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use crate::shared::swr::key::QueryParams;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::VecDeque;

    type Pending = Rc<RefCell<VecDeque<oneshot::Sender<Result<Value, FetchError>>>>>;

    /// Fetcher whose responses are released by the test
    #[derive(Clone, Default)]
    struct GatedFetcher {
        calls: Rc<Cell<usize>>,
        pending: Pending,
    }

    impl GatedFetcher {
        fn resolve_oldest(&self, result: Result<Value, FetchError>) {
            let sender = self.pending.borrow_mut().pop_front().expect("no pending fetch");
            let _ = sender.send(result);
        }

        fn resolve_newest(&self, result: Result<Value, FetchError>) {
            let sender = self.pending.borrow_mut().pop_back().expect("no pending fetch");
            let _ = sender.send(result);
        }
    }

    impl Fetcher for GatedFetcher {
        fn fetch(&self, _key: &Key) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
            self.calls.set(self.calls.get() + 1);
            let (tx, rx) = oneshot::channel();
            self.pending.borrow_mut().push_back(tx);
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(FetchError::Network("cancelled".into())))
            }
            .boxed_local()
        }
    }

    #[derive(Clone, Default)]
    struct ManualClock(Rc<Cell<i64>>);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.get()
        }
    }

    struct Harness {
        cache: SwrCache,
        fetcher: GatedFetcher,
        clock: ManualClock,
        pool: LocalPool,
    }

    impl Harness {
        fn new() -> Self {
            let fetcher = GatedFetcher::default();
            let clock = ManualClock::default();
            Self {
                cache: SwrCache::with_clock(fetcher.clone(), clock.clone()),
                fetcher,
                clock,
                pool: LocalPool::new(),
            }
        }

        fn spawn(&self, fetch: SharedFetch) {
            self.pool
                .spawner()
                .spawn_local(fetch.map(|_| ()))
                .unwrap();
        }

        fn run(&mut self) {
            self.pool.run_until_stalled();
        }

        /// Load `value` for `key` through a real fetch
        fn load(&mut self, key: &Key, value: Value) {
            let fetch = self.cache.mutate(key);
            self.spawn(fetch);
            self.run();
            self.fetcher.resolve_oldest(Ok(value));
            self.run();
        }
    }

    fn clients_key() -> Key {
        Key::new("/api/clients")
    }

    fn recorder() -> (Rc<RefCell<Vec<EntryState>>>, impl Fn(&EntryState) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |s: &EntryState| sink.borrow_mut().push(s.clone()))
    }

    #[test]
    fn test_concurrent_subscribers_share_one_fetch() {
        let mut h = Harness::new();
        let key = clients_key();
        let (seen_a, listener_a) = recorder();
        let (seen_b, listener_b) = recorder();
        let _a = h.cache.subscribe(&key, SwrOptions::default(), listener_a);
        let _b = h.cache.subscribe(&key, SwrOptions::default(), listener_b);

        h.spawn(h.cache.revalidate(&key));
        h.spawn(h.cache.revalidate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 1);

        h.fetcher.resolve_oldest(Ok(json!({ "clients": [{ "id": 1 }] })));
        h.run();

        let a = seen_a.borrow().last().cloned().unwrap().data.unwrap();
        let b = seen_b.borrow().last().cloned().unwrap().data.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_first_load_is_loading_then_success() {
        let mut h = Harness::new();
        let key = clients_key();
        h.spawn(h.cache.revalidate(&key));
        h.run();

        let state = h.cache.snapshot(&key);
        assert!(state.is_loading());
        assert_eq!(state.status(), FetchStatus::Loading);

        h.fetcher.resolve_oldest(Ok(json!({ "clients": [] })));
        h.run();

        let state = h.cache.snapshot(&key);
        assert!(!state.is_loading());
        assert!(!state.is_validating);
        assert_eq!(state.status(), FetchStatus::Success);
    }

    #[test]
    fn test_stale_data_served_while_revalidating() {
        let mut h = Harness::new();
        let key = clients_key();
        let d1 = json!({ "clients": [{ "id": 1 }] });
        let d2 = json!({ "clients": [{ "id": 1 }, { "id": 2 }] });
        h.load(&key, d1.clone());

        let (seen, listener) = recorder();
        let _sub = h.cache.subscribe(&key, SwrOptions::default(), listener);
        h.spawn(h.cache.mutate(&key));
        h.run();

        let state = h.cache.snapshot(&key);
        assert_eq!(state.data.as_deref(), Some(&d1));
        assert!(state.is_validating);
        assert!(!state.is_loading());

        h.fetcher.resolve_oldest(Ok(d2.clone()));
        h.run();

        let state = h.cache.snapshot(&key);
        assert_eq!(state.data.as_deref(), Some(&d2));
        assert!(!state.is_validating);
        assert!(seen.borrow().iter().all(|s| s.data.is_some()));
    }

    #[test]
    fn test_mutate_attaches_to_in_flight_request() {
        let mut h = Harness::new();
        let key = clients_key();
        h.spawn(h.cache.revalidate(&key));
        h.spawn(h.cache.mutate(&key));
        h.spawn(h.cache.mutate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 1);

        h.fetcher.resolve_oldest(Ok(json!({ "clients": [] })));
        h.run();
        assert!(!h.cache.snapshot(&key).is_validating);
    }

    #[test]
    fn test_local_update_discards_older_response() {
        let mut h = Harness::new();
        let key = clients_key();
        h.spawn(h.cache.revalidate(&key));
        h.run();

        let local = json!({ "clients": [{ "id": 9 }] });
        h.cache.set_data(&key, local.clone());

        // newer request issued after the local update
        h.spawn(h.cache.mutate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 2);

        let fresh = json!({ "clients": [{ "id": 10 }] });
        h.fetcher.resolve_newest(Ok(fresh.clone()));
        h.run();
        // the older request completes last and must not win
        h.fetcher.resolve_oldest(Ok(json!({ "clients": [] })));
        h.run();

        assert_eq!(h.cache.snapshot(&key).data.as_deref(), Some(&fresh));
    }

    #[test]
    fn test_stale_response_keeps_newer_request_in_flight() {
        let mut h = Harness::new();
        let key = clients_key();
        h.spawn(h.cache.revalidate(&key));
        h.run();
        h.cache.set_data(&key, json!({ "clients": [] }));
        h.spawn(h.cache.mutate(&key));
        h.run();

        h.fetcher.resolve_oldest(Ok(json!({ "clients": [{ "id": 1 }] })));
        h.run();
        assert!(h.cache.snapshot(&key).is_validating);

        // still attaches to the newer request instead of issuing a third
        h.spawn(h.cache.mutate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 2);
    }

    #[test]
    fn test_error_keeps_previous_data() {
        let mut h = Harness::new();
        let key = clients_key();
        let d1 = json!({ "clients": [{ "id": 1 }] });
        h.load(&key, d1.clone());

        h.spawn(h.cache.mutate(&key));
        h.run();
        h.fetcher.resolve_oldest(Err(FetchError::Status(500)));
        h.run();

        let state = h.cache.snapshot(&key);
        assert_eq!(state.data.as_deref(), Some(&d1));
        assert_eq!(state.error, Some(FetchError::Status(500)));
        assert_eq!(state.status(), FetchStatus::Error);
    }

    #[test]
    fn test_dedupe_window_skips_non_forced_revalidation() {
        let mut h = Harness::new();
        let key = clients_key();
        h.load(&key, json!({ "clients": [] }));
        assert_eq!(h.fetcher.calls.get(), 1);

        h.clock.advance(500);
        h.spawn(h.cache.revalidate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 1);

        h.clock.advance(DEFAULT_DEDUPE_INTERVAL_MS as i64);
        h.spawn(h.cache.revalidate(&key));
        h.run();
        assert_eq!(h.fetcher.calls.get(), 2);
    }

    #[test]
    fn test_equal_payload_keeps_identity() {
        let mut h = Harness::new();
        let key = clients_key();
        h.load(&key, json!({ "clients": [{ "id": 1 }] }));
        let before = h.cache.snapshot(&key).data.unwrap();

        h.load(&key, json!({ "clients": [{ "id": 1 }] }));
        let after = h.cache.snapshot(&key).data.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_dropped_subscription_gets_no_late_response() {
        let mut h = Harness::new();
        let key = clients_key();
        let (seen, listener) = recorder();
        let sub = h.cache.subscribe(&key, SwrOptions::default(), listener);

        h.spawn(h.cache.revalidate(&key));
        h.run();
        let before = seen.borrow().len();
        drop(sub);
        assert_eq!(h.cache.subscriber_count(&key), 0);

        h.fetcher.resolve_oldest(Ok(json!({ "clients": [] })));
        h.run();
        assert_eq!(seen.borrow().len(), before);
        // the cache itself still keeps the response
        assert!(h.cache.snapshot(&key).data.is_some());
    }

    #[test]
    fn test_poll_skipped_while_validating_and_in_window() {
        let mut h = Harness::new();
        let key = clients_key();
        let options = SwrOptions::default()
            .with_refresh_interval(5_000)
            .with_dedupe_interval(1_000);
        let _sub = h.cache.subscribe(&key, options, |_| {});

        h.spawn(h.cache.revalidate(&key));
        h.run();
        assert!(h.cache.poll(&key).is_none());

        h.fetcher.resolve_oldest(Ok(json!({ "count": 1 })));
        h.run();
        assert!(h.cache.poll(&key).is_none());

        h.clock.advance(1_000);
        let tick = h.cache.poll(&key);
        assert!(tick.is_some());
        assert_eq!(h.fetcher.calls.get(), 2);
    }

    #[test]
    fn test_focus_revalidates_only_opted_in_keys() {
        let mut h = Harness::new();
        let badges = Key::new("/api/notifications/count");
        let clients = clients_key();
        let focus = SwrOptions::default().with_focus_revalidation();
        let _a = h.cache.subscribe(&badges, focus, |_| {});
        let _b = h.cache.subscribe(&clients, SwrOptions::default(), |_| {});

        for fetch in h.cache.revalidate_on_focus() {
            h.spawn(fetch);
        }
        h.run();
        assert_eq!(h.fetcher.calls.get(), 1);
        assert!(h.cache.snapshot(&badges).is_validating);
        assert!(!h.cache.snapshot(&clients).is_validating);
    }

    #[test]
    fn test_invalidate_matching_refreshes_mounted_and_drops_unused() {
        let mut h = Harness::new();
        let mounted = Key::with_params("/api/clients", QueryParams::new().with("page", 0usize));
        let unused = Key::with_params("/api/clients", QueryParams::new().with("page", 1usize));
        let other = Key::new("/api/leads");
        let _sub = h.cache.subscribe(&mounted, SwrOptions::default(), |_| {});
        h.load(&mounted, json!({ "clients": [{ "id": 1 }] }));
        h.load(&unused, json!({ "clients": [{ "id": 2 }] }));
        h.load(&other, json!({ "leads": [] }));

        let fetches = h.cache.invalidate_matching("/api/clients");
        assert_eq!(fetches.len(), 1);
        for fetch in fetches {
            h.spawn(fetch);
        }
        h.run();

        // mounted key keeps its data while the refetch runs
        let state = h.cache.snapshot(&mounted);
        assert!(state.data.is_some());
        assert!(state.is_validating);
        assert!(h.cache.snapshot(&unused).data.is_none());
        assert!(h.cache.snapshot(&other).data.is_some());
        assert_eq!(h.fetcher.calls.get(), 4);
    }
}
