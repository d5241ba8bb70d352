//! OrangeBrick client library
//!
//! Client-side data layer for the OrangeBrick listing site:
//! - typed REST client for settings, properties, offers and seeding
//! - self-contained state components that load, degrade and reload
//! - an offer form state machine with validation before any request
//! - page composition rendered as text

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;
pub mod view;

pub use crate::core::{
    FlowState, ListingsState, LoadState, OfferFlow, OfferForm, OffersFeed, SaveOutcome,
    SeedOutcome, SeedStatus, SettingsState, SubmitOutcome,
};
pub use models::{AppError, AppResult, ClientConfig, ErrorCode, Failure, Offer, OfferInput, Property, Settings};
pub use providers::{BackendClient, OfferApi, PropertyApi, SeedApi, SettingsApi};
pub use view::{format_price, Notice, NoticeKind, Page};
