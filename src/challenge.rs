//! 3-D Secure challenge confirmation for a PaymentIntent the server left in
//! `requires_action`.

use std::cell::RefCell;

use crate::config::ResultDisplay;
use crate::page::ResultPage;
use crate::sdk::{IntentConfirmer, PaymentIntent};

/// Terminal outcome of the confirmation.
#[derive(Clone, Debug, PartialEq)]
pub enum ChallengeOutcome {
    Succeeded(PaymentIntent),
    /// The error is only kept for logging; the page shows a fixed message.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChallengeState {
    Idle,
    Confirming,
    Done(ChallengeOutcome),
}

/// Controller for the challenge page.
pub struct ChallengeConfirmation<C, P> {
    confirmer: C,
    page: P,
    client_secret: String,
    display: ResultDisplay,
    state: RefCell<ChallengeState>,
}

impl<C: IntentConfirmer, P: ResultPage> ChallengeConfirmation<C, P> {
    pub fn new(
        confirmer: C,
        page: P,
        client_secret: impl Into<String>,
        display: ResultDisplay,
    ) -> Self {
        Self {
            confirmer,
            page,
            client_secret: client_secret.into(),
            display,
            state: RefCell::new(ChallengeState::Idle),
        }
    }

    pub fn state(&self) -> ChallengeState {
        self.state.borrow().clone()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Run `confirmCardPayment` once and render the outcome.
    ///
    /// Later calls return `None` while the first is pending and the recorded
    /// outcome afterwards, without calling Stripe again.
    pub async fn confirm(&self) -> Option<ChallengeOutcome> {
        match self.state() {
            ChallengeState::Idle => {}
            ChallengeState::Confirming => return None,
            ChallengeState::Done(outcome) => return Some(outcome),
        }
        *self.state.borrow_mut() = ChallengeState::Confirming;

        let outcome = match self.confirmer.confirm_card_payment(&self.client_secret).await {
            Ok(intent) => {
                log::info!("payment intent {} confirmed ({})", intent.id, intent.status);
                self.page.show_result(
                    &self.display.success_message,
                    &self.display.success_class,
                );
                ChallengeOutcome::Succeeded(intent)
            }
            Err(err) => {
                log::error!("payment intent confirmation failed: {err}");
                self.page.show_result(
                    &self.display.failure_message,
                    &self.display.failure_class,
                );
                ChallengeOutcome::Failed(err.message)
            }
        };

        *self.state.borrow_mut() = ChallengeState::Done(outcome.clone());
        Some(outcome)
    }
}
