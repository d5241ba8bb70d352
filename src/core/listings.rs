//! Listings State
//!
//! Loads the property list, seeds demo data on request and tracks which
//! property the visitor is making an offer on.
//!
//! Seeding contract: `SeedStatus` records only what the last seed request
//! did. Whether the listing is empty is always read from the load state
//! (`needs_seed()`), never inferred from the seed flag.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::load_state::{LoadState, Synced};
use crate::models::errors::{AppError, AppResult, Failure};
use crate::models::types::Property;
use crate::providers::backend::{PropertyApi, SeedApi};

/// What the most recent seed request did
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeedStatus {
    #[default]
    NotRequested,
    Seeded,
    Failed(Failure),
}

/// Result of [`ListingsState::seed_and_reload`]
#[derive(Debug, Clone, PartialEq)]
pub struct SeedOutcome {
    /// Outcome of `POST /seed`
    pub trigger: Result<(), Failure>,
    /// Properties visible after the reload
    pub properties: usize,
}

struct Inner {
    properties_api: Arc<dyn PropertyApi>,
    seed_api: Arc<dyn SeedApi>,
    state: Synced<Vec<Property>>,
    selected: RwLock<Option<Property>>,
    seed_status: RwLock<SeedStatus>,
}

#[derive(Clone)]
pub struct ListingsState {
    inner: Arc<Inner>,
}

impl ListingsState {
    pub fn new(properties_api: Arc<dyn PropertyApi>, seed_api: Arc<dyn SeedApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                properties_api,
                seed_api,
                state: Synced::new(),
                selected: RwLock::new(None),
                seed_status: RwLock::new(SeedStatus::NotRequested),
            }),
        }
    }

    /// Initial fetch
    pub async fn load(&self) {
        self.reload().await;
    }

    /// Re-fetch the property list. A failure leaves an empty listing.
    pub async fn reload(&self) {
        let api = &self.inner.properties_api;
        self.inner.state.refresh("properties", api.fetch_properties()).await;
    }

    pub fn spawn_load(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.load().await })
    }

    /// Ask the backend to seed demo data, then reload regardless of the outcome
    pub async fn seed_and_reload(&self) -> SeedOutcome {
        info!("🌱 Seeding demo data");
        let trigger = match self.inner.seed_api.trigger_seed().await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("⚠️ Seed failed, reloading anyway: {}", e);
                Err(Failure::from(e))
            }
        };

        if !self.inner.state.is_torn_down() {
            *self.inner.seed_status.write() = match &trigger {
                Ok(()) => SeedStatus::Seeded,
                Err(failure) => SeedStatus::Failed(failure.clone()),
            };
        }

        self.reload().await;

        SeedOutcome {
            trigger,
            properties: self.items().len(),
        }
    }

    pub fn state(&self) -> LoadState<Vec<Property>> {
        self.inner.state.snapshot()
    }

    /// Loaded properties; empty while loading or after a failed fetch
    pub fn items(&self) -> Vec<Property> {
        self.inner.state.with(|state| state.items().to_vec())
    }

    /// The last load succeeded and the backend has no properties
    pub fn needs_seed(&self) -> bool {
        self.inner.state.with(LoadState::is_empty_success)
    }

    pub fn seed_status(&self) -> SeedStatus {
        self.inner.seed_status.read().clone()
    }

    /// Look up a loaded property by id
    pub fn find(&self, property_id: &str) -> AppResult<Property> {
        self.inner
            .state
            .with(|state| state.items().iter().find(|p| p.id == property_id).cloned())
            .ok_or_else(|| AppError::unknown_property(property_id))
    }

    /// Mark a loaded property as the one being offered on. Local only.
    pub fn select(&self, property_id: &str) -> AppResult<Property> {
        let property = self.find(property_id)?;
        *self.inner.selected.write() = Some(property.clone());
        Ok(property)
    }

    pub fn selected(&self) -> Option<Property> {
        self.inner.selected.read().clone()
    }

    pub fn clear_selection(&self) {
        *self.inner.selected.write() = None;
    }

    pub fn teardown(&self) {
        self.inner.state.teardown();
    }
}
