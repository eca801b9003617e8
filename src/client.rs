//! High-level Rust API over the Stripe.js card Element.
//!
//! This module provides:
//! - `StripeClient` to create the Stripe instance and confirm PaymentIntents.
//! - `StripeClient::mount_card()` to create Elements and mount a styled card widget.
//! - `StripeCard` to listen for validation changes, tokenize the card and
//!   create a PaymentMethod.
//!
//! Every Stripe.js promise resolves to either `{ <payload> }` or `{ error }`;
//! [`extract_payload`] turns that into a `Result`.
//!
//! # Example Usage
//! ```rust,ignore
//! let client = StripeClient::new("pk_test_...")?;
//! let card = client.mount_card("#card-element", &CardElementOptions::default())?;
//! let listener = card.on_change(|change| log::debug!("complete: {}", change.complete))?;
//!
//! let token = card.create_token().await?;
//! let pm = card.create_payment_method(&BillingDetails::default()).await?;
//! ```

use gloo_utils::format::JsValueSerdeExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Promise, Reflect};

use crate::bindings::{new_stripe, JsCardElement, JsStripe};
use crate::config::{CardCaptureConfig, CardStyle};
use crate::error::StripeError;
use crate::sdk::{
    BillingDetails, CardChange, CardTokenizer, IntentConfirmer, PaymentIntent, PaymentMethod,
    Token,
};

/// Options for `elements.create("card", ...)`.
#[derive(Serialize, Clone, Debug, Default)]
pub struct CardElementOptions {
    pub style: CardStyle,

    /// Hide the postal code field (Stripe shows it by default).
    #[serde(rename = "hidePostalCode", skip_serializing_if = "Option::is_none")]
    pub hide_postal_code: Option<bool>,
}

impl From<&CardCaptureConfig> for CardElementOptions {
    fn from(config: &CardCaptureConfig) -> Self {
        Self {
            style: config.style.clone(),
            hide_postal_code: config.hide_postal_code,
        }
    }
}

/// A Stripe.js instance bound to one publishable key.
#[derive(Clone, Debug)]
pub struct StripeClient {
    stripe: JsStripe,
}

impl StripeClient {
    /// `Stripe(publishableKey)`. Stripe.js must already be loaded.
    pub fn new(publishable_key: &str) -> Result<Self, StripeError> {
        let stripe = new_stripe(publishable_key).map_err(StripeError::from_js)?;
        Ok(Self { stripe })
    }

    /// Create an Elements group and mount a card Element into `selector`.
    pub fn mount_card(
        &self,
        selector: &str,
        options: &CardElementOptions,
    ) -> Result<StripeCard, StripeError> {
        let elements = self.stripe.elements().map_err(StripeError::from_js)?;
        let opts_js = serde_wasm_bindgen::to_value(options)
            .map_err(|e| StripeError::new(e.to_string()))?;
        let card = elements
            .create_element("card", opts_js)
            .map_err(StripeError::from_js)?;
        card.mount(selector).map_err(StripeError::from_js)?;
        log::debug!("card element mounted into {selector}");

        Ok(StripeCard {
            stripe: self.stripe.clone(),
            card,
        })
    }
}

impl IntentConfirmer for StripeClient {
    async fn confirm_card_payment(&self, client_secret: &str) -> Result<PaymentIntent, StripeError> {
        await_payload(self.stripe.confirm_card_payment(client_secret), "paymentIntent").await
    }
}

/// A mounted card Element together with the Stripe instance that owns it.
#[derive(Clone, Debug)]
pub struct StripeCard {
    stripe: JsStripe,
    card: JsCardElement,
}

impl StripeCard {
    /// Call `handler` with every `change` event of the card widget.
    ///
    /// The handler stays registered until the returned [`ChangeListener`] is
    /// dropped; call [`ChangeListener::forget`] to keep it for the page's
    /// lifetime.
    pub fn on_change<F>(&self, mut handler: F) -> Result<ChangeListener, StripeError>
    where
        F: FnMut(CardChange) + 'static,
    {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match event.into_serde::<CardChange>() {
                Ok(change) => handler(change),
                Err(e) => log::warn!("unreadable card change event: {e}"),
            }
        });
        self.card
            .on("change", closure.as_ref().unchecked_ref())
            .map_err(StripeError::from_js)?;
        Ok(ChangeListener {
            card: self.card.clone(),
            closure: Some(closure),
        })
    }

    /// Tear the widget down so the mount point can be reused.
    pub fn unmount(&self) -> Result<(), StripeError> {
        self.card.unmount().map_err(StripeError::from_js)
    }
}

/// A `change` handler registered on a card Element.
///
/// Dropping it detaches the handler and frees whatever the handler captured.
#[derive(Debug)]
pub struct ChangeListener {
    card: JsCardElement,
    closure: Option<Closure<dyn FnMut(JsValue)>>,
}

impl ChangeListener {
    /// Leave the handler attached for the rest of the page's life.
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            if let Err(e) = self.card.off("change", closure.as_ref().unchecked_ref()) {
                log::warn!("could not detach card change handler: {}", StripeError::from_js(e));
            }
        }
    }
}

impl CardTokenizer for StripeCard {
    async fn create_token(&self) -> Result<Token, StripeError> {
        await_payload(self.stripe.create_token(&self.card), "token").await
    }

    async fn create_payment_method(
        &self,
        billing: &BillingDetails,
    ) -> Result<PaymentMethod, StripeError> {
        let data = Object::new();
        Reflect::set(&data, &"type".into(), &"card".into()).map_err(StripeError::from_js)?;
        Reflect::set(&data, &"card".into(), self.card.as_ref()).map_err(StripeError::from_js)?;
        let billing_js = serde_wasm_bindgen::to_value(billing)
            .map_err(|e| StripeError::new(e.to_string()))?;
        Reflect::set(&data, &"billing_details".into(), &billing_js)
            .map_err(StripeError::from_js)?;

        await_payload(self.stripe.create_payment_method(&data), "paymentMethod").await
    }
}

/// Await a Stripe.js promise and decode its `key` payload.
async fn await_payload<T: DeserializeOwned>(
    promise: Result<Promise, JsValue>,
    key: &str,
) -> Result<T, StripeError> {
    let promise = promise.map_err(StripeError::from_js)?;
    let result = JsFuture::from(promise)
        .await
        .map_err(StripeError::from_js)?;
    let json: JsonValue = result
        .into_serde()
        .map_err(|e| invalid_response(format!("undecodable Stripe.js result: {e}")))?;
    extract_payload(json, key)
}

/// Split a Stripe.js result object into its `error` or its `key` payload.
///
/// A non-null `error` always wins over any payload.
pub fn extract_payload<T: DeserializeOwned>(mut result: JsonValue, key: &str) -> Result<T, StripeError> {
    if let Some(error) = result.get_mut("error").filter(|e| !e.is_null()) {
        let error = error.take();
        return Err(serde_json::from_value::<StripeError>(error.clone()).unwrap_or_else(|_| {
            StripeError::new(
                error
                    .as_str()
                    .map(str::to_owned)
                    .unwrap_or_else(|| error.to_string()),
            )
        }));
    }

    match result.get_mut(key).map(JsonValue::take) {
        Some(payload) if !payload.is_null() => serde_json::from_value(payload)
            .map_err(|e| invalid_response(format!("malformed `{key}` in Stripe.js result: {e}"))),
        _ => Err(invalid_response(format!(
            "Stripe.js result carried neither `error` nor `{key}`"
        ))),
    }
}

fn invalid_response(message: String) -> StripeError {
    StripeError::new(message).with_type("invalid_response")
}
