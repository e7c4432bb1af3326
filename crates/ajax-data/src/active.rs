//! In-flight requests that can be aborted by key.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, Abortable};
use tracing::warn;

use crate::error::RequestError;

#[derive(Debug)]
struct ActiveRequest {
    key: String,
    id: u64,
    handle: AbortHandle,
}

/// Registry of keyed in-flight requests.
///
/// Requests run without a key (or with an empty one) are not tracked and
/// cannot be aborted. Entries are removed once their request settles.
#[derive(Debug, Default)]
pub struct ActiveRequests {
    requests: Mutex<Vec<ActiveRequest>>,
    next_id: AtomicU64,
}

impl ActiveRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `request` to completion, abortable through `key`.
    pub async fn run<T, F>(&self, key: Option<&str>, request: F) -> Result<T, RequestError>
    where
        F: Future<Output = Result<T, RequestError>>,
    {
        let Some(key) = key.filter(|key| !key.is_empty()) else {
            return request.await;
        };

        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(ActiveRequest {
            key: key.to_string(),
            id,
            handle,
        });
        let _entry = Entry { active: self, id };

        match Abortable::new(request, registration).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Aborted),
        }
    }

    /// Abort the first in-flight request registered under `key`.
    ///
    /// Returns `false` when no such request exists.
    pub fn abort(&self, key: &str) -> bool {
        if key.is_empty() {
            warn!("aborting a request requires a key");
            return false;
        }

        let requests = self.lock();
        match requests.iter().find(|request| request.key == key) {
            Some(request) => {
                request.handle.abort();
                true
            }
            None => {
                warn!(key, "no active request found for key");
                false
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().iter().any(|request| request.key == key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ActiveRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes its request from the registry when dropped, including when the
/// caller drops the request future early.
struct Entry<'a> {
    active: &'a ActiveRequests,
    id: u64,
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        self.active.lock().retain(|request| request.id != self.id);
    }
}
