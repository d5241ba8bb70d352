//! Offer Submission Flow
//!
//! ```text
//!            open(p)               submit() [valid]
//!  Closed ───────────► Open ───────────────────► Submitting
//!    ▲   ◄─────────────  │ ▲                         │
//!    │      cancel()     │ └─── create failed ───────┤
//!    │                   └ submit() [invalid]: stays │
//!    └──────────────────── create succeeded ─────────┘
//! ```
//!
//! Validation runs before any network call. A failed create returns to
//! `Open` with the error and the form as typed. A create the backend
//! accepted but answered unreadably closes the flow, since the offer exists.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use super::lifecycle::Lifecycle;
use crate::models::errors::{AppError, AppResult, ErrorCode, Failure};
use crate::models::types::{Offer, OfferInput, Property};
use crate::providers::backend::OfferApi;

/// Raw text of the offer form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub amount: String,
    pub message: String,
}

impl OfferForm {
    /// Parse the amount field. Must be a finite number above zero.
    pub fn parse_amount(raw: &str) -> AppResult<f64> {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
            _ => Err(AppError::invalid_amount(raw)),
        }
    }

    /// Turn the form into a request body for `property_id`
    pub fn validate(&self, property_id: &str) -> AppResult<OfferInput> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::missing_field("Full name"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::missing_field("Email"));
        }
        if !is_plausible_email(email) {
            return Err(AppError::invalid_email(email));
        }

        let amount = Self::parse_amount(&self.amount)?;

        Ok(OfferInput {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: non_empty(&self.phone),
            amount,
            message: non_empty(&self.message),
            property_id: property_id.to_string(),
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlowState {
    #[default]
    Closed,
    Open {
        property: Property,
        form: OfferForm,
        error: Option<Failure>,
    },
    Submitting {
        property: Property,
        form: OfferForm,
    },
}

impl FlowState {
    pub fn property(&self) -> Option<&Property> {
        match self {
            Self::Closed => None,
            Self::Open { property, .. } | Self::Submitting { property, .. } => Some(property),
        }
    }
}

/// Result of [`OfferFlow::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Created; the flow is closed again
    Submitted(Offer),
    /// Validation failed; nothing was sent and the form stays open
    Rejected(Failure),
    /// The backend call failed; the form is open again with the error
    Failed(Failure),
    /// Accepted by the backend but the reply was unreadable; the flow is
    /// closed so the offer is not sent twice
    Unconfirmed(Failure),
    /// Not open, or a submission is already in flight
    Ignored,
}

struct Inner {
    api: Arc<dyn OfferApi>,
    state: Mutex<FlowState>,
    lifecycle: Lifecycle,
}

#[derive(Clone)]
pub struct OfferFlow {
    inner: Arc<Inner>,
}

impl OfferFlow {
    pub fn new(api: Arc<dyn OfferApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(FlowState::Closed),
                lifecycle: Lifecycle::new(),
            }),
        }
    }

    pub fn state(&self) -> FlowState {
        self.inner.state.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.inner.state.lock(), FlowState::Open { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(*self.inner.state.lock(), FlowState::Submitting { .. })
    }

    /// Start an offer on `property` with an empty form. Ignored while a
    /// submission is in flight.
    pub fn open(&self, property: Property) -> bool {
        let mut state = self.inner.state.lock();
        if matches!(*state, FlowState::Submitting { .. }) {
            return false;
        }
        *state = FlowState::Open {
            property,
            form: OfferForm::default(),
            error: None,
        };
        true
    }

    /// Close without submitting. Ignored while a submission is in flight.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.state.lock();
        match *state {
            FlowState::Open { .. } => {
                *state = FlowState::Closed;
                true
            }
            _ => false,
        }
    }

    /// Edit the form while it is open
    pub fn update_form<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut OfferForm),
    {
        match &mut *self.inner.state.lock() {
            FlowState::Open { form, .. } => {
                f(form);
                Ok(())
            }
            _ => Err(AppError::flow_not_open()),
        }
    }

    /// Validate, then send the offer to the backend
    pub async fn submit(&self) -> SubmitOutcome {
        let (property, form, input) = {
            let mut state = self.inner.state.lock();
            let FlowState::Open { property, form, error } = &mut *state else {
                return SubmitOutcome::Ignored;
            };

            match form.validate(&property.id) {
                Ok(input) => {
                    let (property, form) = (property.clone(), form.clone());
                    *state = FlowState::Submitting {
                        property: property.clone(),
                        form: form.clone(),
                    };
                    (property, form, input)
                }
                Err(e) => {
                    info!("✋ Offer rejected before sending: {}", e);
                    let failure = e.failure();
                    *error = Some(failure.clone());
                    return SubmitOutcome::Rejected(failure);
                }
            }
        };

        let ticket = self.inner.lifecycle.begin();
        let result = self.inner.api.create_offer(&input).await;
        let current = ticket.is_current();

        match result {
            Ok(offer) => {
                info!("✅ Offer of {} submitted for {}", offer.amount, property.id);
                if current {
                    *self.inner.state.lock() = FlowState::Closed;
                }
                SubmitOutcome::Submitted(offer)
            }
            Err(e) if e.code == ErrorCode::WriteUnconfirmed => {
                warn!("⚠️ Offer sent but not confirmed: {}", e);
                if current {
                    *self.inner.state.lock() = FlowState::Closed;
                }
                SubmitOutcome::Unconfirmed(e.failure())
            }
            Err(e) => {
                warn!("⚠️ Offer submission failed: {}", e);
                let failure = e.failure();
                if current {
                    *self.inner.state.lock() = FlowState::Open {
                        property,
                        form,
                        error: Some(failure.clone()),
                    };
                }
                SubmitOutcome::Failed(failure)
            }
        }
    }

    pub fn teardown(&self) {
        self.inner.lifecycle.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{count, property, FakeBackend};
    use std::sync::atomic::Ordering;

    fn fill(form: &mut OfferForm, amount: &str) {
        form.full_name = "Ada Lovelace".into();
        form.email = "ada@example.com".into();
        form.amount = amount.into();
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(OfferForm::parse_amount("1500").unwrap(), 1500.0);
        assert_eq!(OfferForm::parse_amount(" 2500.50 ").unwrap(), 2500.5);
        for bad in ["abc", "", "   ", "-5", "0", "NaN", "inf", "1e400"] {
            let err = OfferForm::parse_amount(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationAmount, "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_validate_builds_request_body() {
        let mut form = OfferForm::default();
        fill(&mut form, "1500");
        form.phone = "  ".into();
        form.message = " Love the porch ".into();

        let input = form.validate("p1").unwrap();
        assert_eq!(input.property_id, "p1");
        assert_eq!(input.amount, 1500.0);
        assert_eq!(input.phone, None);
        assert_eq!(input.message.as_deref(), Some("Love the porch"));
    }

    #[test]
    fn test_validate_required_fields() {
        let mut form = OfferForm::default();
        fill(&mut form, "10");
        form.full_name = " ".into();
        assert_eq!(form.validate("p").unwrap_err().code, ErrorCode::ValidationMissingField);

        fill(&mut form, "10");
        form.email = "not-an-email".into();
        assert_eq!(form.validate("p").unwrap_err().code, ErrorCode::ValidationEmail);

        form.email = "a@b@c".into();
        assert_eq!(form.validate("p").unwrap_err().code, ErrorCode::ValidationEmail);
    }

    #[tokio::test]
    async fn test_open_resets_form() {
        let flow = OfferFlow::new(FakeBackend::new());
        flow.open(property("a", 1.0));
        flow.update_form(|f| fill(f, "99")).unwrap();

        flow.open(property("b", 2.0));
        match flow.state() {
            FlowState::Open { property, form, error } => {
                assert_eq!(property.id, "b");
                assert_eq!(form, OfferForm::default());
                assert_eq!(error, None);
            }
            other => panic!("expected Open, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_creates_nothing() {
        let fake = FakeBackend::new();
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("a", 1.0));
        flow.update_form(|f| fill(f, "1500")).unwrap();

        assert!(flow.cancel());
        assert_eq!(flow.state(), FlowState::Closed);
        assert_eq!(flow.submit().await, SubmitOutcome::Ignored);
        assert_eq!(count(&fake.calls.create_offer), 0);
        assert!(flow.update_form(|f| f.amount = "1".into()).is_err());
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_backend() {
        let fake = FakeBackend::new();
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("a", 1.0));
        flow.update_form(|f| fill(f, "abc")).unwrap();

        let outcome = flow.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(ref f) if f.code == ErrorCode::ValidationAmount));
        assert!(flow.is_open());
        assert_eq!(count(&fake.calls.create_offer), 0);
    }

    #[tokio::test]
    async fn test_valid_submit_creates_once_and_closes() {
        let fake = FakeBackend::new();
        let flow = OfferFlow::new(fake.clone());
        let target = property("p-42", 500_000.0);
        flow.open(target.clone());
        flow.update_form(|f| fill(f, "1500")).unwrap();

        let outcome = flow.submit().await;
        let SubmitOutcome::Submitted(offer) = outcome else {
            panic!("expected Submitted, got {:?}", outcome);
        };
        assert_eq!(offer.property_id, target.id);
        assert_eq!(flow.state(), FlowState::Closed);
        assert_eq!(count(&fake.calls.create_offer), 1);

        let created = fake.created.lock();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].property_id, "p-42");
        assert_eq!(created[0].amount, 1500.0);
    }

    #[tokio::test]
    async fn test_backend_failure_reopens_with_error() {
        let fake = FakeBackend::new();
        fake.fail_writes.store(true, Ordering::SeqCst);
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("a", 1.0));
        flow.update_form(|f| fill(f, "1500")).unwrap();

        let outcome = flow.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ref f) if f.code == ErrorCode::TransportStatus));
        match flow.state() {
            FlowState::Open { form, error, .. } => {
                assert_eq!(form.amount, "1500");
                assert!(error.is_some());
            }
            other => panic!("expected Open, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_double_submit_is_ignored() {
        let fake = FakeBackend::new();
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("a", 1.0));
        flow.update_form(|f| fill(f, "1500")).unwrap();

        fake.close_gate();
        let first = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.submit().await })
        };
        crate::core::test_support::wait_for_calls(&fake.calls.create_offer, 1).await;

        assert!(matches!(flow.state(), FlowState::Submitting { .. }));
        assert_eq!(flow.submit().await, SubmitOutcome::Ignored);
        assert!(!flow.cancel());

        fake.open_gate();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Submitted(_)));
        assert_eq!(count(&fake.calls.create_offer), 1);
    }
    #[tokio::test]
    async fn test_response_after_teardown_is_dropped() {
        let fake = FakeBackend::new();
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("p1", 1.0));
        flow.update_form(|f| fill(f, "1500")).unwrap();

        fake.close_gate();
        let handle = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.submit().await })
        };
        crate::core::test_support::wait_for_calls(&fake.calls.create_offer, 1).await;

        flow.teardown();
        fake.open_gate();
        assert!(matches!(handle.await.unwrap(), SubmitOutcome::Submitted(_)));

        match flow.state() {
            FlowState::Submitting { property, .. } => assert_eq!(property.id, "p1"),
            other => panic!("expected Submitting to be left alone, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_create_closes_flow() {
        let fake = FakeBackend::new();
        fake.unreadable_creates.store(true, Ordering::SeqCst);
        let flow = OfferFlow::new(fake.clone());
        flow.open(property("p1", 1.0));
        flow.update_form(|f| fill(f, "1500")).unwrap();

        let outcome = flow.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Unconfirmed(ref f) if f.code == ErrorCode::WriteUnconfirmed));
        assert_eq!(flow.state(), FlowState::Closed);
        assert_eq!(count(&fake.calls.create_offer), 1);
        assert_eq!(fake.created.lock().len(), 1);
        // Nothing left to resubmit
        assert_eq!(flow.submit().await, SubmitOutcome::Ignored);
    }
}
