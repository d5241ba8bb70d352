//! Page composition
//!
//! Wires the state components to one backend, turns write outcomes into a
//! notice banner and renders the whole page as text.

use chrono::{Datelike, Utc};
use parking_lot::RwLock;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

use super::format::{render_offer_entry, render_property_card};
use crate::core::listings::{ListingsState, SeedOutcome, SeedStatus};
use crate::core::load_state::LoadState;
use crate::core::offer_flow::{FlowState, OfferFlow, SubmitOutcome};
use crate::core::offers_feed::OffersFeed;
use crate::core::settings::{SaveOutcome, SettingsState};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Property, Settings};
use crate::providers::backend::{BackendClient, OfferApi, PropertyApi, SeedApi, SettingsApi};
use crate::utils::constants::APP_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Banner shown after a write action
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    fn render(&self) -> String {
        let icon = match self.kind {
            NoticeKind::Success => "✅",
            NoticeKind::Info => "ℹ️",
            NoticeKind::Error => "❌",
        };
        format!("{} {}", icon, self.message)
    }
}

pub struct Page {
    settings: SettingsState,
    listings: ListingsState,
    offer_flow: OfferFlow,
    offers: OffersFeed,
    notice: RwLock<Option<Notice>>,
}

impl Page {
    /// All components talk to the same `backend`
    pub fn new<B>(backend: Arc<B>) -> Self
    where
        B: SettingsApi + PropertyApi + SeedApi + OfferApi + 'static,
    {
        Self {
            settings: SettingsState::new(backend.clone()),
            listings: ListingsState::new(backend.clone(), backend.clone()),
            offer_flow: OfferFlow::new(backend.clone()),
            offers: OffersFeed::new(backend),
            notice: RwLock::new(None),
        }
    }

    pub fn with_client(client: BackendClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Every component fetches independently; a failed fetch degrades its
    /// own section only.
    pub async fn init(&self) {
        tokio::join!(self.settings.load(), self.listings.load(), self.offers.load());
        info!(
            "📄 Page ready: {} properties, {} offers",
            self.listings.items().len(),
            self.offers.items().len()
        );
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn listings(&self) -> &ListingsState {
        &self.listings
    }

    pub fn offer_flow(&self) -> &OfferFlow {
        &self.offer_flow
    }

    pub fn offers(&self) -> &OffersFeed {
        &self.offers
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.read().clone()
    }

    fn set_notice(&self, notice: Notice) {
        *self.notice.write() = Some(notice);
    }

    // ============================================
    // ACTIONS
    // ============================================

    /// Select a loaded property and open the offer form on it. Refused
    /// while an offer is in flight so the selection keeps matching the form.
    pub fn begin_offer(&self, property_id: &str) -> AppResult<Property> {
        if self.offer_flow.is_submitting() {
            return Err(AppError::flow_busy());
        }
        let property = self.listings.find(property_id)?;
        if !self.offer_flow.open(property.clone()) {
            return Err(AppError::flow_busy());
        }
        self.listings.select(property_id)
    }

    pub fn cancel_offer(&self) {
        if self.offer_flow.cancel() {
            self.listings.clear_selection();
        }
    }

    /// Submit the open offer. On success listings and offers are reloaded;
    /// a failed reload does not undo the offer.
    pub async fn submit_offer(&self) -> SubmitOutcome {
        let outcome = self.offer_flow.submit().await;
        match &outcome {
            SubmitOutcome::Submitted(offer) => {
                self.listings.clear_selection();
                self.set_notice(Notice::success(format!(
                    "Offer submitted for property {}",
                    offer.property_id
                )));
                tokio::join!(self.listings.reload(), self.offers.reload());
            }
            SubmitOutcome::Rejected(failure) => {
                self.set_notice(Notice::error(format!("Please check the form: {}", failure.message)));
            }
            SubmitOutcome::Failed(failure) => {
                self.set_notice(Notice::error(format!("Could not send offer: {}", failure.message)));
            }
            SubmitOutcome::Unconfirmed(_) => {
                self.listings.clear_selection();
                self.set_notice(Notice::info(
                    "Offer sent, but the backend reply was unreadable. Check Recent Offers before sending again",
                ));
                tokio::join!(self.listings.reload(), self.offers.reload());
            }
            SubmitOutcome::Ignored => {}
        }
        outcome
    }

    pub async fn seed(&self) -> SeedOutcome {
        let outcome = self.listings.seed_and_reload().await;
        self.set_notice(match &outcome.trigger {
            Ok(()) => Notice::success(format!(
                "Demo data ready: {} properties listed",
                outcome.properties
            )),
            Err(failure) => Notice::error(format!("Seeding failed: {}", failure.message)),
        });
        outcome
    }

    pub async fn save_settings(&self) -> SaveOutcome {
        let outcome = self.settings.save().await;
        self.set_notice(match &outcome {
            SaveOutcome::Saved(_) => Notice::success("Settings saved"),
            SaveOutcome::Failed(failure) => {
                Notice::error(format!("Could not save settings: {}", failure.message))
            }
            SaveOutcome::Busy => Notice::info("A save is already in progress"),
        });
        outcome
    }

    /// Drop every response still in flight
    pub fn teardown(&self) {
        self.settings.teardown();
        self.listings.teardown();
        self.offer_flow.teardown();
        self.offers.teardown();
    }

    // ============================================
    // RENDERING
    // ============================================

    /// Settings the page is drawn with, and whether they are a fallback
    fn display_settings(&self) -> (Settings, bool) {
        match self.settings.current() {
            Some(settings) => (settings, false),
            None => (Settings::default(), true),
        }
    }

    pub fn render(&self) -> String {
        let (settings, degraded) = self.display_settings();
        let mut out = String::new();

        out.push_str(&self.render_header(&settings));
        if degraded {
            out.push_str("⚠️ Live settings unavailable, showing defaults\n\n");
        }
        if let Some(notice) = self.notice() {
            let _ = writeln!(out, "{}\n", notice.render());
        }
        out.push_str(&render_hero(&settings));
        out.push_str(&self.render_listings());
        out.push_str(&self.render_offer_form());
        out.push_str(&self.render_offers());
        out.push_str(&self.render_admin());
        out.push_str(&render_footer());
        out
    }

    fn render_header(&self, settings: &Settings) -> String {
        format!(
            "● {}  [{}]    Listings #listings · Admin #admin · Offers #offers\n\n",
            APP_NAME, settings.primary_color
        )
    }

    pub fn render_listings(&self) -> String {
        let mut out = String::from("## Featured Listings\nBrowse properties and submit offers instantly.\n\n");
        match self.listings.state() {
            LoadState::Loading => out.push_str("Loading listings...\n"),
            LoadState::Failed(_) => out.push_str("Listings are unavailable right now.\n"),
            LoadState::Loaded(items) if items.is_empty() => {
                out.push_str("No properties yet. Run `orangebrick seed` to add demo data.\n");
            }
            LoadState::Loaded(items) => {
                for property in &items {
                    let _ = writeln!(out, "{}\n", render_property_card(property));
                }
            }
        }
        if let SeedStatus::Failed(failure) = self.listings.seed_status() {
            let _ = writeln!(out, "Last seed attempt failed: {}", failure.message);
        }
        out.push('\n');
        out
    }

    fn render_offer_form(&self) -> String {
        match self.offer_flow.state() {
            FlowState::Closed => String::new(),
            FlowState::Open { property, form, error } => {
                let mut out = format!("## Submit Offer for {}\n", property.title);
                let _ = writeln!(out, "  Full name:    {}", form.full_name);
                let _ = writeln!(out, "  Email:        {}", form.email);
                let _ = writeln!(out, "  Phone:        {}", form.phone);
                let _ = writeln!(out, "  Offer amount: {}", form.amount);
                let _ = writeln!(out, "  Message:      {}", form.message);
                if let Some(error) = error {
                    let _ = writeln!(out, "  ❌ {}", error.message);
                }
                out.push('\n');
                out
            }
            FlowState::Submitting { property, .. } => {
                format!("## Submit Offer for {}\n  Sending offer...\n\n", property.title)
            }
        }
    }

    pub fn render_offers(&self) -> String {
        let mut out = String::from("## Recent Offers\nTrack incoming offers in real-time.\n\n");
        let items = self.offers.items();
        if items.is_empty() {
            out.push_str("No offers yet.\n");
        }
        for offer in &items {
            let _ = writeln!(out, "{}\n", render_offer_entry(offer));
        }
        out.push('\n');
        out
    }

    /// Hidden until settings have loaded, like the rest of the admin tools
    pub fn render_admin(&self) -> String {
        let Some(draft) = self.settings.draft() else {
            return String::new();
        };

        let mut out = String::from("## Admin Panel\n");
        let _ = writeln!(out, "  Primary color:   {}", draft.primary_color);
        let _ = writeln!(out, "  Accent color:    {}", draft.accent_color);
        let _ = writeln!(out, "  Hero heading:    {}", draft.hero_heading);
        let _ = writeln!(out, "  Hero subheading: {}", draft.hero_subheading);
        let _ = writeln!(out, "  Announcement:    {}", draft.announcement);

        let label = if self.settings.is_saving() {
            "Saving..."
        } else if self.settings.is_dirty() {
            "Save changes (unsaved edits)"
        } else {
            "Save changes"
        };
        let _ = writeln!(out, "  [{}]", label);

        out.push_str("  Preview\n");
        let _ = writeln!(out, "    {}", draft.hero_heading);
        let _ = writeln!(out, "    {}", draft.hero_subheading);
        out.push('\n');
        out
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn render_hero(settings: &Settings) -> String {
    let mut out = String::new();
    if !settings.announcement.is_empty() {
        let _ = writeln!(out, "  ({})", settings.announcement);
    }
    let _ = writeln!(out, "# {}", settings.hero_heading);
    let _ = writeln!(out, "{}", settings.hero_subheading);
    out.push_str("  → Browse Listings (#listings)   → Admin Panel (#admin)\n\n");
    out
}

fn render_footer() -> String {
    format!("© {} {}. All rights reserved.\n", Utc::now().year(), APP_NAME)
}
