//! Vendor-facing seams used by the flow controllers.
//!
//! The controllers never talk to Stripe.js directly; they go through
//! [`CardTokenizer`] and [`IntentConfirmer`], which `client.rs` implements on
//! top of the raw bindings.

use serde::{Deserialize, Serialize};

use crate::error::StripeError;

/// Tokenizes whatever card the customer typed into the mounted widget.
#[allow(async_fn_in_trait)]
pub trait CardTokenizer {
    /// `stripe.createToken(card)`.
    async fn create_token(&self) -> Result<Token, StripeError>;

    /// `stripe.createPaymentMethod({ type: "card", card, billing_details })`.
    async fn create_payment_method(
        &self,
        billing: &BillingDetails,
    ) -> Result<PaymentMethod, StripeError>;
}

/// Runs the secondary authentication step for an existing PaymentIntent.
#[allow(async_fn_in_trait)]
pub trait IntentConfirmer {
    /// `stripe.confirmCardPayment(clientSecret)`.
    async fn confirm_card_payment(&self, client_secret: &str)
        -> Result<PaymentIntent, StripeError>;
}

/// A single-use card token, e.g. `tok_1Fxxxxxx`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Token {
    pub id: String,
}

/// Tokenized funding instrument handed to the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PaymentMethod {
    /// Identifier, e.g. `pm_1Fxxxxxx`.
    pub id: String,
    #[serde(rename = "type", default)]
    pub method_type: Option<String>,
    #[serde(default)]
    pub card: Option<CardSummary>,
}

/// Non-sensitive card details Stripe echoes back.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CardSummary {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
}

/// Minimal representation of a confirmed PaymentIntent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PaymentIntent {
    /// Stripe's identifier, e.g. `pi_1Fxxxxxx`.
    pub id: String,
    /// Status after confirmation, e.g. `"succeeded"` or `"processing"`.
    pub status: String,
}

/// `billing_details` sent along with payment method creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BillingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload of the card Element's `change` event.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CardChange {
    /// Present while the typed card is invalid.
    #[serde(default)]
    pub error: Option<StripeError>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub brand: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_change_without_error() {
        let change: CardChange = serde_json::from_value(json!({
            "elementType": "card",
            "empty": false,
            "complete": true,
            "brand": "visa",
            "value": { "postalCode": "" }
        }))
        .unwrap();

        assert!(change.error.is_none());
        assert!(change.complete);
        assert_eq!(change.brand.as_deref(), Some("visa"));
    }

    #[test]
    fn card_change_with_validation_error() {
        let change: CardChange = serde_json::from_value(json!({
            "elementType": "card",
            "empty": false,
            "complete": false,
            "error": {
                "type": "validation_error",
                "code": "invalid_number",
                "message": "Your card number is invalid."
            }
        }))
        .unwrap();

        let err = change.error.unwrap();
        assert_eq!(err.message, "Your card number is invalid.");
        assert_eq!(err.code.as_deref(), Some("invalid_number"));
    }

    #[test]
    fn billing_details_omit_missing_email() {
        assert_eq!(
            serde_json::to_value(BillingDetails::default()).unwrap(),
            json!({})
        );
        let billing = BillingDetails {
            email: Some("jenny@example.com".into()),
        };
        assert_eq!(
            serde_json::to_value(billing).unwrap(),
            json!({ "email": "jenny@example.com" })
        );
    }
}
