//! Result of the most recent fetch, as held by a state component

use parking_lot::RwLock;
use std::future::Future;
use tracing::{debug, warn};

use super::lifecycle::{Lifecycle, Ticket};
use crate::models::errors::{AppError, AppResult, Failure};

/// `Loading` until the first fetch resolves, then `Loaded` or `Failed`.
///
/// A reload keeps the previous value visible until it resolves; only the
/// outcome replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(Failure),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(err) => Self::Failed(err.into()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Items to render; empty unless loaded
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }

    /// True only when the fetch succeeded and returned nothing
    pub fn is_empty_success(&self) -> bool {
        matches!(self, Self::Loaded(items) if items.is_empty())
    }
}

/// A [`LoadState`] guarded by a [`Lifecycle`]
///
/// Responses are applied only while their ticket is current, so a torn
/// down component never changes and an older fetch never overwrites a
/// newer one.
#[derive(Debug)]
pub struct Synced<T> {
    state: RwLock<LoadState<T>>,
    lifecycle: Lifecycle,
}

impl<T: Clone> Synced<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LoadState::Loading),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.state.read().clone()
    }

    /// Read without cloning the whole state
    pub fn with<R>(&self, f: impl FnOnce(&LoadState<T>) -> R) -> R {
        f(&self.state.read())
    }

    pub fn begin(&self) -> Ticket {
        self.lifecycle.begin()
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_torn_down()
    }

    /// Run `fetch` and store its outcome. Returns false if the outcome was
    /// discarded as stale.
    pub async fn refresh<F>(&self, resource: &str, fetch: F) -> bool
    where
        F: Future<Output = AppResult<T>>,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.apply(resource, &ticket, result)
    }

    /// Store a fetch outcome if `ticket` is still current
    pub fn apply(&self, resource: &str, ticket: &Ticket, result: AppResult<T>) -> bool {
        if !ticket.is_current() {
            debug!("🗑️ Discarding stale {} response", resource);
            return false;
        }
        if let Err(ref e) = result {
            warn!("⚠️ Failed to load {}: {}", resource, e);
        }
        *self.state.write() = LoadState::from_result(result);
        true
    }
}
