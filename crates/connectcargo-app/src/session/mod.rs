//! Board session: the state behind one signed-in user's pages
//!
//! A session owns its board records, its backend and its toast queue; nothing
//! is global. Actions that talk to the backend run through the task registry
//! under a per-record key, so the same action cannot be in flight twice.

mod accepted;
mod completed;
mod drivers;
mod inbox;
mod loads;
mod pending;
mod publish;
mod published;

use std::sync::Arc;

use connectcargo_domain::model::Board;
use connectcargo_domain::query::{paginate, run_query, Criteria, Page, SortKey};
use connectcargo_types::{Error, Result};
use tokio::sync::RwLock;

use crate::backend::Backend;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::tasks::TaskRegistry;
use crate::toasts::ToastCenter;

pub use publish::form_from_toml;

pub struct BoardSession {
    board: RwLock<Board>,
    backend: Arc<dyn Backend>,
    tasks: TaskRegistry,
    toasts: Arc<ToastCenter>,
    search: Debouncer,
    page_size: usize,
}

impl BoardSession {
    pub fn new(board: Board, backend: Arc<dyn Backend>, config: &Config) -> Self {
        Self {
            board: RwLock::new(board),
            backend,
            tasks: TaskRegistry::new(),
            toasts: Arc::new(ToastCenter::new(config.toast_capacity)),
            search: Debouncer::new(config.debounce()),
            page_size: config.page_size.max(1),
        }
    }

    pub fn toasts(&self) -> Arc<ToastCenter> {
        Arc::clone(&self.toasts)
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Copy of the current records, e.g. for saving
    pub async fn snapshot(&self) -> Board {
        self.board.read().await.clone()
    }

    /// Abort every action in flight, as when leaving the page
    pub fn leave(&self) -> usize {
        self.tasks.cancel_all()
    }

    /// Run the backend side of an action under `key`
    async fn call(&self, key: String, endpoint: &'static str) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        self.tasks
            .run(key, async move { backend.call(endpoint).await })
            .await
    }

    /// Turn a failed action into the toast the user sees
    fn report_failure(&self, err: &Error, action: &str) {
        match err {
            Error::Backend(_) => self
                .toasts
                .error(format!("No se pudo {}. Intenta de nuevo.", action)),
            Error::AlreadyPending(_) => self
                .toasts
                .warning("Ya hay una solicitud en curso, espera un momento"),
            Error::Cancelled(_) => {}
            other => self.toasts.error(other.to_string()),
        }
    }

    fn page_of<T, C, S>(&self, items: &[T], criteria: &C, sort: &S, page: usize) -> Page<T>
    where
        T: Clone,
        C: Criteria<T>,
        S: SortKey<T>,
    {
        let matching = run_query(items, criteria, sort);
        tracing::debug!(
            available = items.len(),
            matching = matching.len(),
            page,
            "query"
        );
        paginate(matching, items.len(), page, self.page_size)
    }
}
