//! Read-only data fetching for dashboard views.
//!
//! A [`Query`] wraps one request function and owns the loading / error /
//! data state for it. Responses are applied in "last request wins" order:
//! every request takes a token, and only the newest token may write state.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::user_message;
use crate::models::ApiResponse;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Error,
}

impl<T> FetchState<T> {
    pub fn phase(&self) -> FetchPhase {
        if self.loading {
            FetchPhase::Loading
        } else if self.error.is_some() {
            FetchPhase::Error
        } else if self.data.is_some() {
            FetchPhase::Success
        } else {
            FetchPhase::Idle
        }
    }
}

struct Inner<T> {
    state: FetchState<T>,
    latest: u64,
    unmounted: bool,
}

// Never held across an await, so a plain mutex also works from `Drop`.
fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// Settles `loading` when a refetch future is dropped before its response
// arrives (timeout, `select!`, aborted task).
struct Pending<'a, T> {
    inner: &'a Mutex<Inner<T>>,
    token: u64,
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if !inner.unmounted && inner.latest == self.token && inner.state.loading {
            debug!(token = self.token, "Fetch cancelled");
            inner.state.loading = false;
        }
    }
}

pub struct Query<T, F> {
    fetch: F,
    inner: Mutex<Inner<T>>,
}

impl<T, F, Fut> Query<T, F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>>>,
{
    /// An idle query. Nothing is requested until [`Query::refetch`].
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            inner: Mutex::new(Inner {
                state: FetchState::default(),
                latest: 0,
                unmounted: false,
            }),
        }
    }

    /// Issue a request, superseding any request still in flight.
    pub async fn refetch(&self) {
        let token = {
            let mut inner = lock(&self.inner);
            if inner.unmounted {
                return;
            }
            inner.latest += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.latest
        };
        debug!(token, "Fetch started");
        // Dropped after the lock below is released.
        let _pending = Pending {
            inner: &self.inner,
            token,
        };

        let result = (self.fetch)().await;

        let mut inner = lock(&self.inner);
        if inner.unmounted || inner.latest != token {
            debug!(token, latest = inner.latest, "Discarding stale fetch result");
            return;
        }

        match result {
            Ok(response) => {
                inner.state.data = Some(response.data);
                inner.state.error = None;
            }
            Err(e) => {
                let message = user_message(&e);
                warn!(token, error = %e, "Fetch failed");
                inner.state.data = None;
                inner.state.error = Some(message);
            }
        }
        inner.state.loading = false;
    }

    /// Tear down: any request still in flight is ignored from now on and no
    /// further request is started.
    pub async fn unmount(&self) {
        let mut inner = lock(&self.inner);
        inner.unmounted = true;
        inner.latest += 1;
    }

    pub async fn is_unmounted(&self) -> bool {
        lock(&self.inner).unmounted
    }

    pub async fn snapshot(&self) -> FetchState<T>
    where
        T: Clone,
    {
        lock(&self.inner).state.clone()
    }
}

impl<T, F, Fut> Query<T, F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ApiResponse<T>>> + Send + 'static,
{
    /// Create a query and, unless `skip` is set, start the first request in
    /// the background.
    pub fn mount(fetch: F, skip: bool) -> Arc<Self> {
        let query = Arc::new(Self::new(fetch));
        if !skip {
            // Visible as loading before the task is first polled.
            lock(&query.inner).state.loading = true;
            query.spawn_refetch();
        }
        query
    }

    pub fn spawn_refetch(self: &Arc<Self>) -> JoinHandle<()> {
        let query = self.clone();
        tokio::spawn(async move { query.refetch().await })
    }
}
