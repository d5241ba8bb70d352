//! In-memory backend for state component tests
//!
//! Counts every call, can fail reads or writes on demand, and can hold
//! calls at a gate until the test releases them.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Offer, OfferInput, Property, Settings};
use crate::providers::backend::{OfferApi, PropertyApi, SeedApi, SettingsApi};

#[derive(Debug, Default)]
pub struct Calls {
    pub fetch_settings: AtomicUsize,
    pub save_settings: AtomicUsize,
    pub fetch_properties: AtomicUsize,
    pub trigger_seed: AtomicUsize,
    pub fetch_offers: AtomicUsize,
    pub create_offer: AtomicUsize,
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Yield until `counter` reaches `n`, i.e. the call is parked at the gate
pub async fn wait_for_calls(counter: &AtomicUsize, n: usize) {
    while count(counter) < n {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub settings: Mutex<Option<Settings>>,
    pub properties: Mutex<Vec<Property>>,
    pub offers: Mutex<Vec<Offer>>,
    pub created: Mutex<Vec<OfferInput>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Accept offers but answer with an unreadable body
    pub unreadable_creates: AtomicBool,
    pub calls: Calls,
    gate: Mutex<Option<Arc<Notify>>>,
}

pub fn property(id: &str, price: f64) -> Property {
    Property {
        id: id.to_string(),
        title: format!("Home {}", id),
        description: "Sunny and quiet".to_string(),
        price,
        bedrooms: 3,
        bathrooms: 2.0,
        area_sqft: 1450.0,
        images: vec![format!("https://img.example.com/{}.jpg", id)],
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_settings(settings: Settings) -> Arc<Self> {
        let fake = Self::default();
        *fake.settings.lock() = Some(settings);
        Arc::new(fake)
    }

    pub fn with_properties(properties: Vec<Property>) -> Arc<Self> {
        let fake = Self::default();
        *fake.properties.lock() = properties;
        Arc::new(fake)
    }

    /// Hold every subsequent call until the returned handle is notified
    pub fn close_gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock() = Some(notify.clone());
        notify
    }

    pub fn open_gate(&self) {
        if let Some(notify) = self.gate.lock().take() {
            notify.notify_waiters();
        }
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(notify) = gate {
            notify.notified().await;
        }
    }

    fn read_guard(&self, path: &str) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::bad_status("GET", path, 503));
        }
        Ok(())
    }

    fn write_guard(&self, method: &str, path: &str) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::bad_status(method, path, 500));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsApi for FakeBackend {
    async fn fetch_settings(&self) -> AppResult<Settings> {
        self.calls.fetch_settings.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.read_guard("/admin/settings")?;
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> AppResult<Settings> {
        self.calls.save_settings.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.write_guard("PUT", "/admin/settings")?;
        // Mimic backend normalization
        let mut stored = settings.clone();
        stored.primary_color = stored.primary_color.to_lowercase();
        stored.accent_color = stored.accent_color.to_lowercase();
        *self.settings.lock() = Some(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl PropertyApi for FakeBackend {
    async fn fetch_properties(&self) -> AppResult<Vec<Property>> {
        self.calls.fetch_properties.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.read_guard("/properties")?;
        Ok(self.properties.lock().clone())
    }
}

#[async_trait]
impl SeedApi for FakeBackend {
    async fn trigger_seed(&self) -> AppResult<()> {
        self.calls.trigger_seed.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.write_guard("POST", "/seed")?;
        let mut properties = self.properties.lock();
        if properties.is_empty() {
            properties.extend([
                property("seed-1", 350_000.0),
                property("seed-2", 725_000.0),
                property("seed-3", 1_250_000.0),
            ]);
        }
        Ok(())
    }
}

#[async_trait]
impl OfferApi for FakeBackend {
    async fn fetch_offers(&self) -> AppResult<Vec<Offer>> {
        self.calls.fetch_offers.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.read_guard("/offers")?;
        Ok(self.offers.lock().clone())
    }

    async fn create_offer(&self, input: &OfferInput) -> AppResult<Offer> {
        self.calls.create_offer.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.write_guard("POST", "/offers")?;
        self.created.lock().push(input.clone());
        let mut offers = self.offers.lock();
        let offer = Offer {
            id: format!("offer-{}", offers.len() + 1),
            property_id: input.property_id.clone(),
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            amount: input.amount,
            message: input.message.clone(),
            created_at: None,
        };
        offers.push(offer.clone());
        if self.unreadable_creates.load(Ordering::SeqCst) {
            let cause = AppError::decode(
                "/offers",
                serde_json::from_str::<Offer>("{}").unwrap_err(),
            );
            return Err(AppError::write_unconfirmed("POST", "/offers", cause));
        }
        Ok(offer)
    }
}
