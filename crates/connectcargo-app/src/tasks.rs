//! Keyed single-flight task control
//!
//! Every user action runs as a spawned task under a key such as
//! `accept-load:3`. While a key is in flight a second start is refused, so a
//! double click cannot run the success path twice. Tasks can be cancelled by
//! key or all at once when the page goes away.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use connectcargo_types::{Error, Result};
use tokio::task::AbortHandle;

struct InFlight {
    ticket: u64,
    /// `None` until the task has been spawned
    handle: Option<AbortHandle>,
}

#[derive(Default)]
struct Inner {
    tasks: HashMap<String, InFlight>,
    next_ticket: u64,
}

/// Frees a key when the task holding it finishes or is dropped
struct Release {
    inner: Arc<Mutex<Inner>>,
    key: String,
    ticket: u64,
}

impl Drop for Release {
    fn drop(&mut self) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.tasks.get(&self.key).is_some_and(|t| t.ticket == self.ticket) {
            inner.tasks.remove(&self.key);
        }
    }
}

#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Backend("task registry poisoned".to_string()))
    }

    /// Run `task` under `key` and wait for it.
    ///
    /// Fails with `AlreadyPending` when the key is in flight and with
    /// `Cancelled` when the task is aborted before finishing. The key stays
    /// taken until the task itself ends, even if the caller stops waiting.
    pub async fn run<F, T>(&self, key: impl Into<String>, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let key = key.into();

        let ticket = {
            let mut inner = self.lock()?;
            if inner.tasks.contains_key(&key) {
                tracing::debug!(%key, "action already in flight");
                return Err(Error::AlreadyPending(key));
            }
            let ticket = inner.next_ticket;
            inner.next_ticket += 1;
            inner.tasks.insert(key.clone(), InFlight { ticket, handle: None });
            ticket
        };

        let release = Release {
            inner: Arc::clone(&self.inner),
            key: key.clone(),
            ticket,
        };
        let join = tokio::spawn(async move {
            let _release = release;
            task.await
        });

        {
            let mut inner = self.lock()?;
            match inner.tasks.get_mut(&key) {
                Some(entry) if entry.ticket == ticket => entry.handle = Some(join.abort_handle()),
                // cancelled between reserving the key and spawning
                _ => join.abort(),
            }
        }

        match join.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(%key, "action cancelled");
                Err(Error::Cancelled(key))
            }
            Err(e) => Err(Error::Backend(format!("{} panicked: {}", key, e))),
        }
    }

    /// Abort the task running under `key`
    pub fn cancel(&self, key: &str) -> bool {
        match self.lock() {
            Ok(mut inner) => match inner.tasks.remove(key) {
                Some(task) => {
                    if let Some(handle) = task.handle {
                        handle.abort();
                    }
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Abort everything in flight, returning how many tasks were stopped
    pub fn cancel_all(&self) -> usize {
        match self.lock() {
            Ok(mut inner) => {
                let count = inner.tasks.len();
                for handle in inner.tasks.drain().filter_map(|(_, task)| task.handle) {
                    handle.abort();
                }
                if count > 0 {
                    tracing::info!(count, "cancelled pending actions");
                }
                count
            }
            Err(_) => 0,
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.lock()
            .map(|inner| inner.tasks.contains_key(key))
            .unwrap_or(false)
    }

    pub fn pending_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|inner| inner.tasks.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}
