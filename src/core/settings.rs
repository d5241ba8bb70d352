//! Settings State
//!
//! Owns the site-wide display settings:
//! - `Loading` shows the bundled defaults so the page is never blank
//! - admin edits go to a draft; the loaded record is untouched until saved
//! - `save()` replaces local state with what the backend returns, not the draft
//! - one save at a time per instance

use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::lifecycle::InFlight;
use super::load_state::{LoadState, Synced};
use crate::models::errors::{AppError, Failure};
use crate::models::types::Settings;
use crate::providers::backend::SettingsApi;

/// Result of [`SettingsState::save`]
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Backend accepted; carries its authoritative copy
    Saved(Settings),
    /// Nothing changed server-side as far as we know; draft kept
    Failed(Failure),
    /// Another save from this instance is still in flight
    Busy,
}

struct Inner {
    api: Arc<dyn SettingsApi>,
    state: Synced<Settings>,
    draft: RwLock<Option<Settings>>,
    saving: AtomicBool,
}

/// Cheap to clone; clones share state
#[derive(Clone)]
pub struct SettingsState {
    inner: Arc<Inner>,
}

impl SettingsState {
    pub fn new(api: Arc<dyn SettingsApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: Synced::new(),
                draft: RwLock::new(None),
                saving: AtomicBool::new(false),
            }),
        }
    }

    /// Fetch settings from the backend
    pub async fn load(&self) {
        let api = &self.inner.api;
        self.inner.state.refresh("settings", api.fetch_settings()).await;
    }

    /// Run [`load`](Self::load) on a background task
    pub fn spawn_load(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.load().await })
    }

    pub fn state(&self) -> LoadState<Settings> {
        self.inner.state.snapshot()
    }

    /// Settings to display: defaults while loading, `None` if the load failed
    pub fn current(&self) -> Option<Settings> {
        self.inner.state.with(|state| match state {
            LoadState::Loading => Some(Settings::default()),
            LoadState::Loaded(settings) => Some(settings.clone()),
            LoadState::Failed(_) => None,
        })
    }

    /// The record the admin panel edits: the draft if any, else the loaded
    /// settings. `None` until settings have loaded.
    pub fn draft(&self) -> Option<Settings> {
        if let Some(draft) = self.inner.draft.read().clone() {
            return Some(draft);
        }
        self.inner.state.with(|state| state.loaded().cloned())
    }

    /// True when the draft differs from the loaded record
    pub fn is_dirty(&self) -> bool {
        let draft = self.inner.draft.read();
        match draft.as_ref() {
            Some(draft) => self.inner.state.with(|state| state.loaded() != Some(draft)),
            None => false,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.inner.saving.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Apply an admin edit to the draft
    pub fn edit<F>(&self, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut draft = self
            .draft()
            .ok_or_else(AppError::settings_not_loaded)?;
        f(&mut draft);
        *self.inner.draft.write() = Some(draft);
        Ok(())
    }

    /// Submit the full draft to the backend
    pub async fn save(&self) -> SaveOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.inner.saving) else {
            info!("⏳ Settings save already in flight, ignoring");
            return SaveOutcome::Busy;
        };

        let Some(draft) = self.draft() else {
            return SaveOutcome::Failed(AppError::settings_not_loaded().into());
        };

        let ticket = self.inner.state.begin();
        match self.inner.api.save_settings(&draft).await {
            Ok(saved) => {
                if self.inner.state.apply("settings", &ticket, Ok(saved.clone())) {
                    *self.inner.draft.write() = None;
                }
                SaveOutcome::Saved(saved)
            }
            Err(e) => {
                warn!("⚠️ Settings save failed: {}", e);
                SaveOutcome::Failed(e.into())
            }
        }
    }

    /// Discard any response that arrives from now on
    pub fn teardown(&self) {
        self.inner.state.teardown();
    }
}
