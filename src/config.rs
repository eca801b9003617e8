//! Configuration for the two flows.
//!
//! Both configs deserialize from a plain JS object with camelCase keys, e.g.
//!
//! ```js
//! cardWithConfig({
//!   publishableKey: "pk_test_...",
//!   customerEmail: "jenny@example.com",
//!   labels: { idle: "Subscribe" },
//! });
//! ```
//!
//! Everything except the key (and, for the challenge, the client secret) has a
//! default matching the stock page template.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::SetupError;
use crate::sdk::BillingDetails;

/// Hidden input carrying the payment method id to the server.
pub const PAYMENT_METHOD_FIELD: &str = "payment_method_id";

/// Element ids the card page template must provide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardPageIds {
    pub form: String,
    pub card_mount: String,
    pub errors: String,
    pub button: String,
}

impl Default for CardPageIds {
    fn default() -> Self {
        Self {
            form: "payment-form".into(),
            card_mount: "card-element".into(),
            errors: "card-errors".into(),
            button: "card-button".into(),
        }
    }
}

impl CardPageIds {
    /// CSS selector Stripe.js mounts the card widget into.
    pub fn card_mount_selector(&self) -> String {
        format!("#{}", self.card_mount)
    }
}

/// Submit button text while idle and while a request is in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabels {
    pub idle: String,
    pub busy: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            idle: "Pay Now".into(),
            busy: "Processing...".into(),
        }
    }
}

/// `style` option of the card Element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub base: StyleVariant,
    pub invalid: StyleVariant,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleVariant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_smoothing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(rename = "::placeholder", skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PlaceholderStyle>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderStyle {
    pub color: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            base: StyleVariant {
                color: Some("#32325d".into()),
                font_family: Some(r#""Helvetica Neue", Helvetica, sans-serif"#.into()),
                font_smoothing: Some("antialiased".into()),
                font_size: Some("16px".into()),
                placeholder: Some(PlaceholderStyle {
                    color: "#aab7c4".into(),
                }),
                ..Default::default()
            },
            invalid: StyleVariant {
                color: Some("#fa755a".into()),
                icon_color: Some("#fa755a".into()),
                ..Default::default()
            },
        }
    }
}

/// Configuration of the card capture flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardCaptureConfig {
    pub publishable_key: String,
    pub customer_email: Option<String>,
    pub ids: CardPageIds,
    pub labels: ButtonLabels,
    pub style: CardStyle,
    pub field_name: Option<String>,
    /// Hide the card widget's postal code input; Stripe.js decides when unset.
    pub hide_postal_code: Option<bool>,
}

impl CardCaptureConfig {
    pub fn new(publishable_key: impl Into<String>, customer_email: impl Into<String>) -> Self {
        let email = customer_email.into();
        Self {
            publishable_key: publishable_key.into(),
            customer_email: (!email.is_empty()).then_some(email),
            ..Default::default()
        }
    }

    pub fn from_js(value: JsValue) -> Result<Self, SetupError> {
        serde_wasm_bindgen::from_value(value).map_err(|e| SetupError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        validate_publishable_key(&self.publishable_key)?;
        if let Some(email) = &self.customer_email {
            if !email.contains('@') {
                return Err(SetupError::InvalidConfig(format!(
                    "customer email `{email}` is not an address"
                )));
            }
        }
        if self.field_name.as_deref().is_some_and(str::is_empty) {
            return Err(SetupError::InvalidConfig("field name is empty".into()));
        }
        Ok(())
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_deref().unwrap_or(PAYMENT_METHOD_FIELD)
    }

    pub fn billing_details(&self) -> BillingDetails {
        BillingDetails {
            email: self.customer_email.clone(),
        }
    }
}

/// Text and CSS class written into the result element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultDisplay {
    pub success_message: String,
    pub success_class: String,
    pub failure_message: String,
    pub failure_class: String,
}

impl Default for ResultDisplay {
    fn default() -> Self {
        Self {
            success_message: "Thank you! It may take 2-3 minutes to process the payment \
                              and upgrade your account."
                .into(),
            success_class: "text-success".into(),
            failure_message: "Error occured during payment process. Please contact me via \
                              email: eugen@django-lessons.com, I will assist you."
                .into(),
            failure_class: "text-danger".into(),
        }
    }
}

/// Configuration of the challenge confirmation flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChallengeConfig {
    pub publishable_key: String,
    pub client_secret: String,
    pub result_id: String,
    pub display: ResultDisplay,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            client_secret: String::new(),
            result_id: "3ds_result".into(),
            display: ResultDisplay::default(),
        }
    }
}

impl ChallengeConfig {
    pub fn new(publishable_key: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            client_secret: client_secret.into(),
            ..Default::default()
        }
    }

    pub fn from_js(value: JsValue) -> Result<Self, SetupError> {
        serde_wasm_bindgen::from_value(value).map_err(|e| SetupError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        validate_publishable_key(&self.publishable_key)?;
        if self.client_secret.is_empty() {
            return Err(SetupError::InvalidConfig("client secret is empty".into()));
        }
        // pi_..._secret_...
        if !self.client_secret.contains("_secret_") {
            return Err(SetupError::InvalidConfig(
                "client secret is not a PaymentIntent client secret".into(),
            ));
        }
        Ok(())
    }
}

fn validate_publishable_key(key: &str) -> Result<(), SetupError> {
    if key.trim().is_empty() {
        return Err(SetupError::InvalidConfig("publishable key is empty".into()));
    }
    if key.starts_with("sk_") || key.starts_with("rk_") {
        return Err(SetupError::SecretKey);
    }
    if !key.starts_with("pk_") {
        log::warn!("publishable key does not start with `pk_`");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_config_defaults_match_stock_template() {
        let config = CardCaptureConfig::new("pk_test_123", "jenny@example.com");

        assert_eq!(config.ids.form, "payment-form");
        assert_eq!(config.ids.card_mount_selector(), "#card-element");
        assert_eq!(config.ids.errors, "card-errors");
        assert_eq!(config.ids.button, "card-button");
        assert_eq!(config.labels.idle, "Pay Now");
        assert_eq!(config.field_name(), "payment_method_id");
        assert_eq!(
            config.billing_details().email.as_deref(),
            Some("jenny@example.com")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_email_means_no_billing_email() {
        let config = CardCaptureConfig::new("pk_test_123", "");
        assert_eq!(config.billing_details(), BillingDetails::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn secret_keys_are_rejected() {
        for key in ["sk_live_abc", "rk_test_abc"] {
            let config = CardCaptureConfig::new(key, "jenny@example.com");
            assert!(matches!(config.validate(), Err(SetupError::SecretKey)));
        }
    }

    #[test]
    fn malformed_card_config_is_rejected() {
        let config = CardCaptureConfig::new("  ", "jenny@example.com");
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let config = CardCaptureConfig::new("pk_test_123", "not-an-address");
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let mut config = CardCaptureConfig::new("pk_test_123", "jenny@example.com");
        config.field_name = Some(String::new());
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));
    }

    #[test]
    fn challenge_config_requires_intent_secret() {
        assert!(ChallengeConfig::new("pk_test_123", "pi_123_secret_456")
            .validate()
            .is_ok());
        assert!(ChallengeConfig::new("pk_test_123", "").validate().is_err());
        assert!(ChallengeConfig::new("pk_test_123", "pm_123").validate().is_err());
    }

    #[test]
    fn partial_config_object_fills_defaults() {
        let config: CardCaptureConfig = serde_json::from_value(json!({
            "publishableKey": "pk_test_123",
            "labels": { "idle": "Subscribe" },
            "ids": { "form": "subscribe-form" }
        }))
        .unwrap();

        assert_eq!(config.labels.idle, "Subscribe");
        assert_eq!(config.labels.busy, "Processing...");
        assert_eq!(config.ids.form, "subscribe-form");
        assert_eq!(config.ids.button, "card-button");
        assert_eq!(config.customer_email, None);
        assert_eq!(config.hide_postal_code, None);

        let config: CardCaptureConfig = serde_json::from_value(json!({
            "publishableKey": "pk_test_123",
            "hidePostalCode": true
        }))
        .unwrap();
        assert_eq!(config.hide_postal_code, Some(true));

        let challenge: ChallengeConfig = serde_json::from_value(json!({
            "publishableKey": "pk_test_123",
            "clientSecret": "pi_1_secret_2"
        }))
        .unwrap();
        assert_eq!(challenge.result_id, "3ds_result");
        assert_eq!(challenge.display.success_class, "text-success");
    }

    #[test]
    fn default_style_serializes_like_stripe_expects() {
        let style = serde_json::to_value(CardStyle::default()).unwrap();
        assert_eq!(
            style,
            json!({
                "base": {
                    "color": "#32325d",
                    "fontFamily": "\"Helvetica Neue\", Helvetica, sans-serif",
                    "fontSmoothing": "antialiased",
                    "fontSize": "16px",
                    "::placeholder": { "color": "#aab7c4" }
                },
                "invalid": {
                    "color": "#fa755a",
                    "iconColor": "#fa755a"
                }
            })
        );
    }
}
