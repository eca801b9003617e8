//! Card capture: tokenize the typed card, turn it into a PaymentMethod and
//! post its id to the server with the surrounding form.

use std::cell::Cell;

use crate::config::PAYMENT_METHOD_FIELD;
use crate::error::StripeError;
use crate::page::CardPage;
use crate::sdk::{BillingDetails, CardChange, CardTokenizer, PaymentMethod};

/// Where the card form currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    /// Waiting on Stripe.js; further submits are ignored.
    Submitting,
    /// The form was handed to the browser for navigation.
    Submitted,
    /// The last attempt failed; the customer may submit again.
    Failed,
}

/// Result of one call to [`CardCapture::submit`].
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureOutcome {
    Submitted(PaymentMethod),
    Rejected(StripeError),
    /// Another attempt was in flight or the form is already navigating.
    Ignored,
}

/// Controller for the card form.
pub struct CardCapture<T, P> {
    tokenizer: T,
    page: P,
    billing: BillingDetails,
    field_name: String,
    state: Cell<CaptureState>,
}

impl<T: CardTokenizer, P: CardPage> CardCapture<T, P> {
    pub fn new(tokenizer: T, page: P, billing: BillingDetails) -> Self {
        Self {
            tokenizer,
            page,
            billing,
            field_name: PAYMENT_METHOD_FIELD.to_owned(),
            state: Cell::new(CaptureState::Idle),
        }
    }

    /// Name of the hidden input carrying the payment method id.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state.get()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mirror the widget's validation state into the error element.
    pub fn card_changed(&self, change: &CardChange) {
        match &change.error {
            Some(err) => self.page.show_card_error(&err.message),
            None => self.page.clear_card_error(),
        }
    }

    /// Handle one form submission.
    pub async fn submit(&self) -> CaptureOutcome {
        match self.state.get() {
            CaptureState::Submitting | CaptureState::Submitted => {
                log::debug!("ignoring submit in state {:?}", self.state.get());
                return CaptureOutcome::Ignored;
            }
            CaptureState::Idle | CaptureState::Failed => {}
        }

        self.state.set(CaptureState::Submitting);
        self.page.clear_card_error();
        self.page.set_busy(true);

        let result = match self.tokenize().await {
            Ok(pm) => self
                .page
                .submit_payment_method(&self.field_name, &pm.id)
                .map(|()| pm)
                .map_err(|e| StripeError::new(e.to_string())),
            Err(err) => Err(err),
        };

        match result {
            Ok(pm) => {
                log::debug!("payment method {} attached", pm.id);
                log::info!("card accepted, submitting form");
                self.state.set(CaptureState::Submitted);
                CaptureOutcome::Submitted(pm)
            }
            Err(err) => {
                log::warn!("card submission failed: {err}");
                self.page.show_card_error(&err.message);
                self.page.set_busy(false);
                self.state.set(CaptureState::Failed);
                CaptureOutcome::Rejected(err)
            }
        }
    }

    async fn tokenize(&self) -> Result<PaymentMethod, StripeError> {
        // Never log or keep the token id.
        self.tokenizer.create_token().await?;
        log::debug!("card tokenized");
        self.tokenizer.create_payment_method(&self.billing).await
    }
}
