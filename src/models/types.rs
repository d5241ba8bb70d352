//! Wire types shared with the backend
//!
//! Field names match the backend JSON exactly. Records carry their id as
//! `_id`; `id` is accepted too.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    DEFAULT_ACCENT_COLOR, DEFAULT_ANNOUNCEMENT, DEFAULT_HERO_HEADING, DEFAULT_HERO_SUBHEADING,
    DEFAULT_PRIMARY_COLOR,
};

/// Site-wide display settings (singleton resource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub primary_color: String,
    pub accent_color: String,
    pub hero_heading: String,
    pub hero_subheading: String,
    #[serde(default)]
    pub announcement: String,
}

impl Default for Settings {
    /// Bundled presentation defaults
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            hero_heading: DEFAULT_HERO_HEADING.to_string(),
            hero_subheading: DEFAULT_HERO_SUBHEADING.to_string(),
            announcement: DEFAULT_ANNOUNCEMENT.to_string(),
        }
    }
}

/// A real-estate listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Asking price in currency units
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub area_sqft: f64,
    /// Image URLs, cover first
    #[serde(default)]
    pub images: Vec<String>,
}

impl Property {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A buyer's bid on a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Not checked against the listing client-side
    pub property_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339 or a naive ISO timestamp (read as UTC). Anything else
/// becomes `None` so one odd record cannot fail the whole feed.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

/// Body of `POST /offers`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub amount: f64,
    pub message: Option<String>,
    pub property_id: String,
}
