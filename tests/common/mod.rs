//! In-process fake of the OrangeBrick backend, served by axum on an
//! ephemeral localhost port.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use orangebrick::{BackendClient, ClientConfig};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Default)]
pub struct BackendState {
    pub settings: Mutex<Value>,
    pub properties: Mutex<Vec<Value>>,
    pub offers: Mutex<Vec<Value>>,
    /// Raw bodies received on `POST /offers`
    pub offer_bodies: Mutex<Vec<Value>>,
    pub request_ids: Mutex<Vec<String>>,
    pub fail_properties: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Serve a non-JSON body on `GET /offers`
    pub garbage_offers: AtomicBool,
    /// Answer `POST /offers` with only an id
    pub minimal_offer_reply: AtomicBool,
    pub seed_calls: AtomicUsize,
    pub property_fetches: AtomicUsize,
    pub offer_fetches: AtomicUsize,
}

pub struct TestBackend {
    pub url: String,
    pub state: Arc<BackendState>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        *state.settings.lock() = json!({
            "_id": "settings",
            "primary_color": "#f97316",
            "accent_color": "#111827",
            "hero_heading": "Find your next home",
            "hero_subheading": "Fresh listings every week",
            "announcement": "Spring open houses this weekend"
        });

        let app = Router::new()
            .route("/admin/settings", get(get_settings).put(put_settings))
            .route("/properties", get(list_properties))
            .route("/seed", post(seed))
            .route("/offers", get(list_offers).post(create_offer))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> BackendClient {
        let config = ClientConfig::default()
            .with_base_url(&self.url)
            .unwrap()
            .with_timeout_secs(5)
            .unwrap();
        BackendClient::new(config).unwrap()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn property(id: &str, title: &str, price: u64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "Seeded demo listing",
        "price": price,
        "bedrooms": 3,
        "bathrooms": 2,
        "area_sqft": 1600,
        "images": [format!("https://images.example.com/{}.jpg", id)]
    })
}

async fn get_settings(State(state): State<Arc<BackendState>>) -> Json<Value> {
    Json(state.settings.lock().clone())
}

async fn put_settings(
    State(state): State<Arc<BackendState>>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if state.fail_writes.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    for key in ["primary_color", "accent_color"] {
        let lowered = body.get(key).and_then(Value::as_str).map(str::to_lowercase);
        if let Some(color) = lowered {
            body[key] = Value::String(color);
        }
    }
    body["_id"] = json!("settings");
    *state.settings.lock() = body.clone();
    Ok(Json(body))
}

async fn list_properties(
    State(state): State<Arc<BackendState>>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    state.property_fetches.fetch_add(1, Ordering::SeqCst);
    if state.fail_properties.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.properties.lock().clone()))
}

async fn seed(State(state): State<Arc<BackendState>>) -> Result<Json<Value>, StatusCode> {
    state.seed_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_writes.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut properties = state.properties.lock();
    if properties.is_empty() {
        properties.push(property("seed-1", "Sunset Bungalow", 350_000));
        properties.push(property("seed-2", "Harbor Loft", 725_000));
        properties.push(property("seed-3", "Hilltop Villa", 1_250_000));
        Ok(Json(json!({ "status": "seeded" })))
    } else {
        Ok(Json(json!({ "status": "exists" })))
    }
}

async fn list_offers(State(state): State<Arc<BackendState>>) -> Response {
    state.offer_fetches.fetch_add(1, Ordering::SeqCst);
    if state.garbage_offers.load(Ordering::SeqCst) {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    Json(state.offers.lock().clone()).into_response()
}

async fn create_offer(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.request_ids.lock().push(id.to_string());
    }
    state.offer_bodies.lock().push(body.clone());
    if state.fail_writes.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut offers = state.offers.lock();
    let id = format!("offer-{}", offers.len() + 1);
    let mut offer = body;
    offer["_id"] = json!(id);
    offer["created_at"] = json!("2024-05-01T12:30:00.123456");
    offers.push(offer.clone());
    if state.minimal_offer_reply.load(Ordering::SeqCst) {
        return Ok(Json(json!({ "id": id })));
    }
    Ok(Json(offer))
}
