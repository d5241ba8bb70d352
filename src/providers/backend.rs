//! Backend REST Client
//!
//! One trait per resource so state components depend only on what they
//! use, and tests can swap in a fake. [`BackendClient`] implements all of
//! them over `reqwest`.
//!
//! Every call resolves to `Err(AppError)` on connect failure, timeout,
//! non-2xx status or a malformed body. Nothing is retried.
//!
//! | Method | Path            | Trait        |
//! |--------|-----------------|--------------|
//! | GET    | /admin/settings | SettingsApi  |
//! | PUT    | /admin/settings | SettingsApi  |
//! | GET    | /properties     | PropertyApi  |
//! | POST   | /seed           | SeedApi      |
//! | GET    | /offers         | OfferApi     |
//! | POST   | /offers         | OfferApi     |

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::config::ClientConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{Offer, OfferInput, Property, Settings};
use crate::utils::constants::{
    PATH_OFFERS, PATH_PROPERTIES, PATH_SEED, PATH_SETTINGS, REQUEST_ID_HEADER,
};

// ============================================
// RESOURCE TRAITS
// ============================================

/// `/admin/settings`
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// Read the singleton settings record
    async fn fetch_settings(&self) -> AppResult<Settings>;
    /// Persist the full record; returns the backend's authoritative copy
    async fn save_settings(&self, settings: &Settings) -> AppResult<Settings>;
}

/// `/properties`
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn fetch_properties(&self) -> AppResult<Vec<Property>>;
}

/// `/seed`
#[async_trait]
pub trait SeedApi: Send + Sync {
    /// Ask the backend to populate demo listings
    async fn trigger_seed(&self) -> AppResult<()>;
}

/// `/offers`
#[async_trait]
pub trait OfferApi: Send + Sync {
    async fn fetch_offers(&self) -> AppResult<Vec<Offer>>;
    /// `WRITE_UNCONFIRMED` when the backend accepted the offer but its
    /// reply could not be decoded
    async fn create_offer(&self, input: &OfferInput) -> AppResult<Offer>;
}

// ============================================
// HTTP CLIENT
// ============================================

/// HTTP implementation of every resource trait
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Client configured from the environment
    pub fn from_env() -> AppResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build HTTP client with JSON headers and the bounded timeout
    fn build_client(config: &ClientConfig) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::ConfigInvalidValue, "Failed to build HTTP client", e)
            })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.config.endpoint(path))
    }

    /// Send a request, tag it with a request id and reject non-2xx statuses
    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> AppResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let result = builder.header(REQUEST_ID_HEADER, &request_id).send().await;
        let latency_ms = start.elapsed().as_millis();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    method = %method,
                    path,
                    latency_ms = %latency_ms,
                    "⚠️ Backend unreachable: {}", e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        debug!(
            request_id = %request_id,
            method = %method,
            path,
            status = %status.as_u16(),
            latency_ms = %latency_ms,
            "Request completed"
        );

        if !status.is_success() {
            warn!("⚠️ {} {} -> HTTP {}", method, path, status.as_u16());
            return Err(AppError::bad_status(method.as_str(), path, status.as_u16()));
        }

        Ok(response)
    }

    /// Read the full body and decode it as JSON
    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::decode(path, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .execute(Method::GET, path, self.request(Method::GET, path))
            .await?;
        Self::decode(path, response).await
    }
}

#[async_trait]
impl SettingsApi for BackendClient {
    async fn fetch_settings(&self) -> AppResult<Settings> {
        self.get_json(PATH_SETTINGS).await
    }

    async fn save_settings(&self, settings: &Settings) -> AppResult<Settings> {
        let builder = self.request(Method::PUT, PATH_SETTINGS).json(settings);
        let response = self.execute(Method::PUT, PATH_SETTINGS, builder).await?;
        let saved: Settings = Self::decode(PATH_SETTINGS, response).await?;
        info!("💾 Settings saved");
        Ok(saved)
    }
}

#[async_trait]
impl PropertyApi for BackendClient {
    async fn fetch_properties(&self) -> AppResult<Vec<Property>> {
        let properties: Vec<Property> = self.get_json(PATH_PROPERTIES).await?;
        debug!("🏠 Fetched {} properties", properties.len());
        Ok(properties)
    }
}

#[async_trait]
impl SeedApi for BackendClient {
    async fn trigger_seed(&self) -> AppResult<()> {
        // Status only; whatever body comes back is ignored.
        self.execute(Method::POST, PATH_SEED, self.request(Method::POST, PATH_SEED))
            .await?;
        info!("🌱 Seed triggered");
        Ok(())
    }
}

#[async_trait]
impl OfferApi for BackendClient {
    async fn fetch_offers(&self) -> AppResult<Vec<Offer>> {
        let offers: Vec<Offer> = self.get_json(PATH_OFFERS).await?;
        debug!("📨 Fetched {} offers", offers.len());
        Ok(offers)
    }

    async fn create_offer(&self, input: &OfferInput) -> AppResult<Offer> {
        let builder = self.request(Method::POST, PATH_OFFERS).json(input);
        let response = self.execute(Method::POST, PATH_OFFERS, builder).await?;
        // The offer exists once the backend said 2xx
        let offer: Offer = Self::decode(PATH_OFFERS, response)
            .await
            .map_err(|e| AppError::write_unconfirmed("POST", PATH_OFFERS, e))?;
        info!("📨 Offer {} created for property {}", offer.id, offer.property_id);
        Ok(offer)
    }
}
