//! Query Client
//!
//! Session-wide cache of asynchronous query results. One client is built at
//! startup and handed to every view; clones share the same cache.
//!
//! The client is single-threaded (`Rc`/`RefCell`) to match the UI event loop
//! it runs on. Borrows never span an `.await`.

use chrono::{DateTime, Utc};
use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use super::error::{QueryError, QueryResult, UnauthorizedBehavior};

/// Upper bound accepted for `retry`
pub const MAX_RETRY: u32 = 10;

/// Cache key: ordered segments, the first being the request path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// URL the default query function requests for this key
    pub fn url(&self) -> String {
        self.0.join("/")
    }

    /// True if `prefix` is a leading run of this key's segments
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl From<&str> for QueryKey {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for QueryKey {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Client-wide query defaults
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// How long a result stays fresh; `None` keeps it fresh until invalidated
    pub stale_time_ms: Option<u64>,
    /// Age after which `garbage_collect` drops an entry
    pub gc_time_ms: u64,
    /// Extra attempts after a failed fetch
    pub retry: u32,
    /// Default 401 policy for the HTTP query function
    pub on_unauthorized: UnauthorizedBehavior,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time_ms: None,
            gc_time_ms: 5 * 60 * 1000,
            retry: 0,
            on_unauthorized: UnauthorizedBehavior::Throw,
        }
    }
}

impl QueryOptions {
    pub fn validate(&self) -> QueryResult<()> {
        if self.gc_time_ms == 0 {
            return Err(QueryError::InvalidOptions(
                "gc_time_ms must be greater than zero".to_string(),
            ));
        }
        if self.retry > MAX_RETRY {
            return Err(QueryError::InvalidOptions(format!(
                "retry must be at most {}, got {}",
                MAX_RETRY, self.retry
            )));
        }
        Ok(())
    }
}

/// Lifecycle status of a cached query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Success,
    Error,
}

/// Snapshot of one cache entry
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub status: QueryStatus,
    /// Last successful result; kept when a later fetch fails
    pub data: Option<Value>,
    pub error: Option<QueryError>,
    pub updated_at: DateTime<Utc>,
    pub invalidated: bool,
    pub fetch_count: u32,
}

type SharedFetch = Shared<LocalBoxFuture<'static, QueryResult<Value>>>;

/// A running fetch; `id` tells it apart from later fetches of the same key
struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

struct ClientInner {
    options: QueryOptions,
    entries: RefCell<HashMap<QueryKey, QueryState>>,
    in_flight: RefCell<HashMap<QueryKey, InFlight>>,
    next_fetch: Cell<u64>,
}

impl ClientInner {
    /// Remove the in-flight entry for `key` if it is still fetch `id`
    fn finish(&self, key: &QueryKey, id: u64) -> bool {
        let mut in_flight = self.in_flight.borrow_mut();
        match in_flight.get(key) {
            Some(running) if running.id == id => {
                in_flight.remove(key);
                true
            }
            _ => false,
        }
    }

    fn drop_in_flight(&self, prefix: &QueryKey) {
        self.in_flight
            .borrow_mut()
            .retain(|key, _| !key.starts_with(prefix));
    }

    fn record(&self, key: &QueryKey, result: &QueryResult<Value>, now: DateTime<Utc>) {
        let mut entries = self.entries.borrow_mut();
        let fetch_count = entries.get(key).map(|s| s.fetch_count).unwrap_or(0) + 1;
        let previous = entries.remove(key).and_then(|s| s.data);

        let state = match result {
            Ok(data) => QueryState {
                status: QueryStatus::Success,
                data: Some(data.clone()),
                error: None,
                updated_at: now,
                invalidated: false,
                fetch_count,
            },
            Err(e) => QueryState {
                status: QueryStatus::Error,
                data: previous,
                error: Some(e.clone()),
                updated_at: now,
                invalidated: false,
                fetch_count,
            },
        };
        entries.insert(key.clone(), state);
    }

    fn is_stale(&self, state: &QueryState, now: DateTime<Utc>) -> bool {
        if state.invalidated || state.status == QueryStatus::Error {
            return true;
        }
        match self.options.stale_time_ms {
            None => false,
            Some(ms) => {
                let age = (now - state.updated_at).num_milliseconds();
                age >= i64::try_from(ms).unwrap_or(i64::MAX)
            }
        }
    }
}

/// Shared handle to the query cache
#[derive(Clone)]
pub struct QueryClient {
    inner: Rc<ClientInner>,
}

impl QueryClient {
    /// Build a client; invalid options are rejected
    pub fn new(options: QueryOptions) -> QueryResult<Self> {
        options.validate()?;
        Ok(Self {
            inner: Rc::new(ClientInner {
                options,
                entries: RefCell::new(HashMap::new()),
                in_flight: RefCell::new(HashMap::new()),
                next_fetch: Cell::new(0),
            }),
        })
    }

    pub fn options(&self) -> &QueryOptions {
        &self.inner.options
    }

    /// True if both handles refer to the same cache
    pub fn ptr_eq(&self, other: &QueryClient) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Return fresh cached data, or run `fetcher` and cache its result.
    ///
    /// Concurrent calls for the same key share a single in-flight fetch.
    /// A fetch that was running when its key was invalidated, removed or
    /// cleared still resolves for its callers but is not cached.
    pub async fn fetch_query<F, Fut>(&self, key: impl Into<QueryKey>, fetcher: F) -> QueryResult<Value>
    where
        F: Fn(QueryKey) -> Fut + 'static,
        Fut: Future<Output = QueryResult<Value>> + 'static,
    {
        let key = key.into();

        if let Some(data) = self.fresh_data(&key, Utc::now()) {
            tracing::trace!(key = %key, "query cache hit");
            return Ok(data);
        }

        let pending = self
            .inner
            .in_flight
            .borrow()
            .get(&key)
            .map(|running| running.fetch.clone());
        let fetch = match pending {
            Some(fetch) => {
                tracing::trace!(key = %key, "joining in-flight query");
                fetch
            }
            None => {
                let id = self.inner.next_fetch.get();
                self.inner.next_fetch.set(id.wrapping_add(1));
                let fetch = self.start_fetch(key.clone(), id, fetcher);
                self.inner.in_flight.borrow_mut().insert(
                    key,
                    InFlight {
                        id,
                        fetch: fetch.clone(),
                    },
                );
                fetch
            }
        };

        fetch.await
    }

    fn start_fetch<F, Fut>(&self, key: QueryKey, id: u64, fetcher: F) -> SharedFetch
    where
        F: Fn(QueryKey) -> Fut + 'static,
        Fut: Future<Output = QueryResult<Value>> + 'static,
    {
        let inner: Weak<ClientInner> = Rc::downgrade(&self.inner);
        let retry = self.inner.options.retry;

        async move {
            let mut attempt = 0;
            let result = loop {
                match fetcher(key.clone()).await {
                    Ok(data) => break Ok(data),
                    Err(e) if attempt < retry => {
                        attempt += 1;
                        tracing::debug!(key = %key, attempt, error = %e, "retrying query");
                    }
                    Err(e) => break Err(e),
                }
            };

            if let Some(inner) = inner.upgrade() {
                if inner.finish(&key, id) {
                    inner.record(&key, &result, Utc::now());
                } else {
                    tracing::debug!(key = %key, "discarding result of superseded query");
                }
            }
            if let Err(e) = &result {
                tracing::debug!(key = %key, error = %e, "query failed");
            }
            result
        }
        .boxed_local()
        .shared()
    }

    fn fresh_data(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<Value> {
        let entries = self.inner.entries.borrow();
        let state = entries.get(key)?;
        if self.inner.is_stale(state, now) {
            return None;
        }
        state.data.clone()
    }

    /// Cached data for a key, fresh or not
    pub fn get_query_data(&self, key: impl Into<QueryKey>) -> Option<Value> {
        let key = key.into();
        self.inner
            .entries
            .borrow()
            .get(&key)
            .and_then(|s| s.data.clone())
    }

    /// Write data directly into the cache
    pub fn set_query_data(&self, key: impl Into<QueryKey>, data: Value) {
        let key = key.into();
        self.inner.record(&key, &Ok(data), Utc::now());
    }

    pub fn query_state(&self, key: impl Into<QueryKey>) -> Option<QueryState> {
        let key = key.into();
        self.inner.entries.borrow().get(&key).cloned()
    }

    /// True if the next `fetch_query` for `key` would hit the network
    pub fn is_stale(&self, key: impl Into<QueryKey>) -> bool {
        let key = key.into();
        self.fresh_data(&key, Utc::now()).is_none()
    }

    /// Mark every entry under `prefix` stale; returns how many were marked.
    /// Running fetches under `prefix` are detached so the next call refetches.
    pub fn invalidate_queries(&self, prefix: impl Into<QueryKey>) -> usize {
        let prefix = prefix.into();
        self.inner.drop_in_flight(&prefix);
        let mut marked = 0;
        for (key, state) in self.inner.entries.borrow_mut().iter_mut() {
            if key.starts_with(&prefix) {
                state.invalidated = true;
                marked += 1;
            }
        }
        tracing::debug!(prefix = %prefix, marked, "invalidated queries");
        marked
    }

    /// Drop every entry under `prefix`; returns how many were removed
    pub fn remove_queries(&self, prefix: impl Into<QueryKey>) -> usize {
        let prefix = prefix.into();
        self.inner.drop_in_flight(&prefix);
        let mut entries = self.inner.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        before - entries.len()
    }

    /// Drop everything, e.g. on sign-out
    pub fn clear(&self) {
        self.inner.in_flight.borrow_mut().clear();
        self.inner.entries.borrow_mut().clear();
    }

    /// Drop idle entries last updated at least `gc_time_ms` before `now`
    pub fn garbage_collect_at(&self, now: DateTime<Utc>) -> usize {
        let gc_ms = i64::try_from(self.inner.options.gc_time_ms).unwrap_or(i64::MAX);
        let in_flight = self.inner.in_flight.borrow();
        let mut entries = self.inner.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|key, state| {
            in_flight.contains_key(key) || (now - state.updated_at).num_milliseconds() < gc_ms
        });
        before - entries.len()
    }

    pub fn garbage_collect(&self) -> usize {
        self.garbage_collect_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.borrow().len()
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.inner.options)
            .field("entries", &self.len())
            .field("in_flight", &self.in_flight_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::oneshot;

    fn client() -> QueryClient {
        QueryClient::new(QueryOptions::default()).unwrap()
    }

    fn counting_fetcher(
        calls: Rc<Cell<u32>>,
        value: Value,
    ) -> impl Fn(QueryKey) -> LocalBoxFuture<'static, QueryResult<Value>> {
        move |_key| {
            calls.set(calls.get() + 1);
            let value = value.clone();
            async move { Ok(value) }.boxed_local()
        }
    }

    /// Fetcher that resolves once the matching sender fires
    fn gated_fetcher(
        gate: oneshot::Receiver<Value>,
    ) -> impl Fn(QueryKey) -> LocalBoxFuture<'static, QueryResult<Value>> {
        let gate = Rc::new(RefCell::new(Some(gate)));
        move |_key| {
            let receiver = gate.borrow_mut().take();
            async move {
                match receiver {
                    Some(receiver) => receiver
                        .await
                        .map_err(|e| QueryError::Network(e.to_string())),
                    None => Err(QueryError::Network("gate already used".to_string())),
                }
            }
            .boxed_local()
        }
    }

    #[test]
    fn test_rejects_invalid_options() {
        let zero_gc = QueryOptions {
            gc_time_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            QueryClient::new(zero_gc),
            Err(QueryError::InvalidOptions(_))
        ));

        let too_many_retries = QueryOptions {
            retry: MAX_RETRY + 1,
            ..Default::default()
        };
        assert!(QueryClient::new(too_many_retries).is_err());
    }

    #[test]
    fn test_clones_share_cache() {
        let a = client();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&client()));

        a.set_query_data("/api/resume", json!({"name": "Ada"}));
        assert_eq!(b.get_query_data("/api/resume"), Some(json!({"name": "Ada"})));
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_from_cache() {
        let client = client();
        let calls = Rc::new(Cell::new(0));

        let first = client
            .fetch_query("/api/resume", counting_fetcher(calls.clone(), json!(1)))
            .await
            .unwrap();
        let second = client
            .fetch_query("/api/resume", counting_fetcher(calls.clone(), json!(2)))
            .await
            .unwrap();

        assert_eq!(first, json!(1));
        assert_eq!(second, json!(1));
        assert_eq!(calls.get(), 1);
        assert_eq!(client.query_state("/api/resume").unwrap().fetch_count, 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let client = client();
        let calls = Rc::new(Cell::new(0));

        client
            .fetch_query(["/api/resume", "1"], counting_fetcher(calls.clone(), json!("v1")))
            .await
            .unwrap();
        client.set_query_data("/api/user", json!(null));

        assert_eq!(client.invalidate_queries("/api/resume"), 1);
        assert!(client.is_stale(["/api/resume", "1"]));
        assert!(!client.is_stale("/api/user"));

        let refreshed = client
            .fetch_query(["/api/resume", "1"], counting_fetcher(calls.clone(), json!("v2")))
            .await
            .unwrap();
        assert_eq!(refreshed, json!("v2"));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_stale_time_zero_always_refetches() {
        let client = QueryClient::new(QueryOptions {
            stale_time_ms: Some(0),
            ..Default::default()
        })
        .unwrap();
        let calls = Rc::new(Cell::new(0));

        for _ in 0..3 {
            client
                .fetch_query("/api/stats", counting_fetcher(calls.clone(), json!(0)))
                .await
                .unwrap();
        }
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_are_deduplicated() {
        let client = client();
        let calls = Rc::new(Cell::new(0));

        let a = client.fetch_query("/api/resume", counting_fetcher(calls.clone(), json!("a")));
        let b = client.fetch_query("/api/resume", counting_fetcher(calls.clone(), json!("b")));
        let (a, b) = futures_util::future::join(a, b).await;

        assert_eq!(a.unwrap(), json!("a"));
        assert_eq!(b.unwrap(), json!("a"));
        assert_eq!(calls.get(), 1);
        assert_eq!(client.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_retry_then_error_keeps_previous_data() {
        let client = QueryClient::new(QueryOptions {
            retry: 2,
            ..Default::default()
        })
        .unwrap();
        client.set_query_data("/api/resume", json!("old"));
        client.invalidate_queries("/api/resume");

        let attempts = Rc::new(Cell::new(0));
        let counter = attempts.clone();
        let result = client
            .fetch_query("/api/resume", move |_key| {
                counter.set(counter.get() + 1);
                async { Err(QueryError::from_status(503, "Service Unavailable", "")) }
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(503));
        assert_eq!(attempts.get(), 3);

        let state = client.query_state("/api/resume").unwrap();
        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.data, Some(json!("old")));
        assert!(client.is_stale("/api/resume"));
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch_discards_old_result() {
        let client = client();
        client.set_query_data("/api/resume", json!("v0"));
        client.invalidate_queries("/api/resume");

        let (sender, gate) = oneshot::channel();
        let mut pending = Box::pin(client.fetch_query("/api/resume", gated_fetcher(gate)));
        assert!((&mut pending).now_or_never().is_none());
        assert_eq!(client.in_flight_count(), 1);

        assert_eq!(client.invalidate_queries("/api/resume"), 1);
        assert_eq!(client.in_flight_count(), 0);

        sender.send(json!("old")).unwrap();
        assert_eq!(pending.await.unwrap(), json!("old"));

        let state = client.query_state("/api/resume").unwrap();
        assert_eq!(state.data, Some(json!("v0")));
        assert!(state.invalidated);
        assert!(client.is_stale("/api/resume"));

        let calls = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let data = client
                .fetch_query("/api/resume", counting_fetcher(calls.clone(), json!("new")))
                .await
                .unwrap();
            assert_eq!(data, json!("new"));
        }
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_clear_during_fetch_discards_old_result() {
        let client = client();

        let (old_sender, old_gate) = oneshot::channel();
        let mut old = Box::pin(client.fetch_query("/api/user", gated_fetcher(old_gate)));
        assert!((&mut old).now_or_never().is_none());

        client.clear();
        assert_eq!(client.in_flight_count(), 0);

        // A fetch started after the clear is not disturbed by the old one finishing
        let (new_sender, new_gate) = oneshot::channel();
        let mut new = Box::pin(client.fetch_query("/api/user", gated_fetcher(new_gate)));
        assert!((&mut new).now_or_never().is_none());

        old_sender.send(json!("signed-out user")).unwrap();
        assert_eq!(old.await.unwrap(), json!("signed-out user"));
        assert!(client.is_empty());
        assert_eq!(client.in_flight_count(), 1);

        new_sender.send(json!("new")).unwrap();
        assert_eq!(new.await.unwrap(), json!("new"));
        assert_eq!(client.in_flight_count(), 0);

        let calls = Rc::new(Cell::new(0));
        let cached = client
            .fetch_query("/api/user", counting_fetcher(calls.clone(), json!("other")))
            .await
            .unwrap();
        assert_eq!(cached, json!("new"));
        assert_eq!(calls.get(), 0);
        assert_eq!(client.query_state("/api/user").unwrap().fetch_count, 1);
    }

    #[test]
    fn test_remove_clear_and_gc() {
        let client = client();
        client.set_query_data(["/api/resume", "1"], json!(1));
        client.set_query_data(["/api/resume", "2"], json!(2));
        client.set_query_data("/api/user", json!(3));

        assert_eq!(client.remove_queries(["/api/resume", "1"]), 1);
        assert_eq!(client.len(), 2);

        assert_eq!(client.garbage_collect_at(Utc::now()), 0);
        let later = Utc::now() + chrono::Duration::milliseconds(5 * 60 * 1000 + 1);
        assert_eq!(client.garbage_collect_at(later), 2);
        assert!(client.is_empty());

        client.set_query_data("/api/user", json!(3));
        client.clear();
        assert!(client.is_empty());
    }

    #[test]
    fn test_query_key_prefix_and_url() {
        let key = QueryKey::from(["/api/resume", "42"]);
        assert_eq!(key.url(), "/api/resume/42");
        assert!(key.starts_with(&QueryKey::from("/api/resume")));
        assert!(!key.starts_with(&QueryKey::from("/api")));
    }
}
