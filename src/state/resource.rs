//! Polling resource: the fetch/state contract shared by every view.
//!
//! A [`Resource`] owns a fetch function, the dependency value it is called
//! with, and an optional refresh period. Each fetch runs as its own task and
//! carries a sequence number; only the most recently issued fetch may write
//! state, so a late response for an old dependency never replaces the state
//! of a newer one.

use crate::error::Result;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Fetch function invoked with the current dependency value.
pub type FetchFn<D, T> = Arc<dyn Fn(D) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Lifecycle phase of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a resource's state.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Data from the latest successful fetch.
    pub data: Option<T>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message from the latest failed fetch, cleared on success.
    pub error: Option<String>,
    /// When `data` was last replaced.
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

/// What a view should display for a resource.
#[derive(Debug, PartialEq)]
pub enum ResourceView<'a, T> {
    /// Nothing requested yet.
    Idle,
    /// First load in progress, nothing to show.
    Loading,
    /// Failed with nothing to fall back on; offer a retry.
    Failed(&'a str),
    /// Data available, possibly refreshing or stale after a failed refresh.
    Ready {
        data: &'a T,
        refreshing: bool,
        stale_error: Option<&'a str>,
    },
}

impl<T> ResourceState<T> {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Loading and error screens are only shown when there is no data.
    pub fn view(&self) -> ResourceView<'_, T> {
        match (&self.data, self.loading, self.error.as_deref()) {
            (Some(data), refreshing, stale_error) => ResourceView::Ready {
                data,
                refreshing,
                stale_error,
            },
            (None, true, _) => ResourceView::Loading,
            (None, false, Some(error)) => ResourceView::Failed(error),
            (None, false, None) => ResourceView::Idle,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

struct Inner<D, T> {
    name: &'static str,
    fetch: FetchFn<D, T>,
    deps: Mutex<D>,
    /// Dependency value the current data was fetched with.
    loaded: Mutex<Option<D>>,
    /// Sequence number of the latest issued fetch.
    latest: AtomicU64,
    state: watch::Sender<ResourceState<T>>,
}

/// Cloneable handle for driving a resource from other tasks.
pub struct ResourceHandle<D, T> {
    inner: Arc<Inner<D, T>>,
}

impl<D, T> Clone for ResourceHandle<D, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, T> ResourceHandle<D, T>
where
    D: Clone + PartialEq + Debug + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// The current dependency value.
    pub fn deps(&self) -> D {
        self.lock_deps().clone()
    }

    /// Borrow the current state.
    pub fn state(&self) -> watch::Ref<'_, ResourceState<T>> {
        self.inner.state.borrow()
    }

    /// Dependency value the current data belongs to, if any data has loaded.
    pub fn loaded_deps(&self) -> Option<D> {
        lock(&self.inner.loaded).clone()
    }

    /// Whether the current data was fetched with the current dependency value.
    ///
    /// False while a dependency change is in flight; the previous data is
    /// still in the state but describes something else.
    pub fn is_current(&self) -> bool {
        let deps = self.deps();
        self.loaded_deps().is_some_and(|loaded| loaded == deps)
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// Re-issue the fetch for the current dependency value.
    pub fn refetch(&self) -> JoinHandle<()> {
        let deps = self.deps();
        self.issue(deps)
    }

    /// Change the dependency value, fetching if it differs from the current one.
    pub fn set_deps(&self, deps: D) -> Option<JoinHandle<()>> {
        {
            let mut current = self.lock_deps();
            if *current == deps {
                return None;
            }
            *current = deps.clone();
        }
        Some(self.issue(deps))
    }

    /// Change the dependency value and fetch even if it is unchanged.
    pub fn replace_deps(&self, deps: D) -> JoinHandle<()> {
        *self.lock_deps() = deps.clone();
        self.issue(deps)
    }

    /// Discard in-flight fetches and return to `Idle`.
    pub fn clear(&self) {
        self.invalidate();
        *lock(&self.inner.loaded) = None;
        self.inner.state.send_replace(ResourceState::default());
    }

    /// Mark every in-flight fetch as stale.
    fn invalidate(&self) {
        self.inner.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn lock_deps(&self) -> MutexGuard<'_, D> {
        lock(&self.inner.deps)
    }

    fn issue(&self, deps: D) -> JoinHandle<()> {
        let seq = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(resource = self.inner.name, seq, ?deps, "fetch issued");

        self.inner.state.send_modify(|state| state.loading = true);

        let future = (self.inner.fetch)(deps.clone());
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let result = future.await;
            inner.complete(seq, deps, result);
        })
    }
}

// The guarded values are plain clone targets, so a poisoned lock is still usable.
fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<D, T> Inner<D, T> {
    fn complete(&self, seq: u64, deps: D, result: Result<T>) {
        let failure = result
            .as_ref()
            .err()
            .map(|err| (err.to_string(), err.is_recoverable()));

        let applied = self.state.send_if_modified(|state| {
            // Checked under the channel lock so a newer fetch can't slip in between.
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            state.loading = false;
            match result {
                Ok(data) => {
                    *lock(&self.loaded) = Some(deps);
                    state.data = Some(data);
                    state.error = None;
                    state.last_updated = Some(Utc::now());
                }
                Err(err) => state.error = Some(err.user_message()),
            }
            true
        });

        if !applied {
            tracing::debug!(resource = self.name, seq, "discarding stale fetch result");
        } else if let Some((error, recoverable)) = failure {
            tracing::warn!(resource = self.name, %error, recoverable, "fetch failed");
        }
    }
}

/// A polling resource bound to a view's lifetime.
///
/// Dropping it stops the timer and discards any in-flight result.
pub struct Resource<D, T> {
    handle: ResourceHandle<D, T>,
    interval: Option<Duration>,
    ticker: Option<JoinHandle<()>>,
}

impl<D, T> Resource<D, T>
where
    D: Clone + PartialEq + Debug + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Create an idle resource. Nothing is fetched until [`Resource::mount`].
    pub fn new<F>(name: &'static str, deps: D, fetch: F) -> Self
    where
        F: Fn(D) -> BoxFuture<'static, Result<T>> + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            handle: ResourceHandle {
                inner: Arc::new(Inner {
                    name,
                    fetch: Arc::new(fetch),
                    deps: Mutex::new(deps),
                    loaded: Mutex::new(None),
                    latest: AtomicU64::new(0),
                    state,
                }),
            },
            interval: None,
            ticker: None,
        }
    }

    /// Re-fetch on a fixed period while mounted.
    pub fn with_interval(mut self, period: Duration) -> Self {
        self.interval = Some(period);
        self
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Issue the initial fetch and start the timer, if any.
    pub fn mount(&mut self) -> JoinHandle<()> {
        self.stop_ticker();
        let initial = self.handle.refetch();

        if let Some(period) = self.interval {
            let handle = self.handle.clone();
            self.ticker = Some(tokio::spawn(async move {
                let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    handle.refetch();
                }
            }));
        }

        initial
    }

    /// Stop the timer and discard in-flight results.
    pub fn unmount(&mut self) {
        self.stop_ticker();
        self.handle.invalidate();
        self.handle.inner.state.send_modify(|state| state.loading = false);
    }

    pub fn is_mounted(&self) -> bool {
        self.ticker.is_some()
    }

    /// A cloneable handle to this resource.
    pub fn handle(&self) -> ResourceHandle<D, T> {
        self.handle.clone()
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl<D, T> Deref for Resource<D, T> {
    type Target = ResourceHandle<D, T>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<D, T> Drop for Resource<D, T> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.handle.inner.latest.fetch_add(1, Ordering::SeqCst);
    }
}
