//! Recent offers, as shown in the public feed

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::load_state::{LoadState, Synced};
use crate::models::types::Offer;
use crate::providers::backend::OfferApi;

struct Inner {
    api: Arc<dyn OfferApi>,
    state: Synced<Vec<Offer>>,
}

#[derive(Clone)]
pub struct OffersFeed {
    inner: Arc<Inner>,
}

impl OffersFeed {
    pub fn new(api: Arc<dyn OfferApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: Synced::new(),
            }),
        }
    }

    pub async fn load(&self) {
        self.reload().await;
    }

    /// Re-fetch the feed; the previous list stays visible until this resolves
    pub async fn reload(&self) {
        let api = &self.inner.api;
        self.inner.state.refresh("offers", api.fetch_offers()).await;
    }

    pub fn spawn_load(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.load().await })
    }

    pub fn state(&self) -> LoadState<Vec<Offer>> {
        self.inner.state.snapshot()
    }

    /// Offers in backend order; empty while loading or after a failure
    pub fn items(&self) -> Vec<Offer> {
        self.inner.state.with(|state| state.items().to_vec())
    }

    pub fn teardown(&self) {
        self.inner.state.teardown();
    }
}
