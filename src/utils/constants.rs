//! Constants Module - Single Source of Truth
//!
//! Endpoint paths, environment variable names, defaults and the bundled
//! presentation settings live here. Other modules reference these instead
//! of repeating literals.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Site name shown in the header and footer
pub const APP_NAME: &str = "OrangeBrick";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for backend requests
pub const USER_AGENT: &str = concat!("OrangeBrick/", env!("CARGO_PKG_VERSION"));

// ============================================
// BACKEND CONFIGURATION
// ============================================

/// Backend base URL used when nothing is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Primary env var for the backend base URL
pub const ENV_BACKEND_URL: &str = "ORANGEBRICK_BACKEND_URL";

/// Fallback env var for the backend base URL
pub const ENV_BACKEND_URL_FALLBACK: &str = "BACKEND_URL";

/// Env var for the per-request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "ORANGEBRICK_TIMEOUT_SECS";

/// Default per-request timeout (seconds). No retries are attempted.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// ============================================
// REST ENDPOINTS
// ============================================

pub const PATH_SETTINGS: &str = "/admin/settings";
pub const PATH_PROPERTIES: &str = "/properties";
pub const PATH_SEED: &str = "/seed";
pub const PATH_OFFERS: &str = "/offers";

// ============================================
// PRESENTATION DEFAULTS
// ============================================

/// Shown while settings are still loading
pub const DEFAULT_PRIMARY_COLOR: &str = "#f97316";
pub const DEFAULT_ACCENT_COLOR: &str = "#111827";
pub const DEFAULT_HERO_HEADING: &str = "Discover vibrant homes";
pub const DEFAULT_HERO_SUBHEADING: &str = "Browse, make offers, and manage listings seamlessly.";
pub const DEFAULT_ANNOUNCEMENT: &str = "Welcome! This site uses demo data for preview.";
