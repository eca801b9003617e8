//! Error types shared by both payment flows.
//!
//! [`StripeError`] is whatever Stripe.js put in the `error` field of a result
//! (or threw). [`SetupError`] covers everything that can go wrong while wiring
//! a flow to the page before the customer ever touches the form.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct StripeError {
    /// Human-readable message, safe to show to the customer.
    pub message: String,
    /// Stripe's error type, e.g. `"card_error"` or `"validation_error"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"card_declined"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl StripeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            code: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Convert a caught `JsValue` (thrown exception or rejected promise)
    /// into a `StripeError` with best effort.
    pub fn from_js(value: JsValue) -> Self {
        serde_wasm_bindgen::from_value::<StripeError>(value.clone())
            .unwrap_or_else(|_| StripeError::new(js_message(&value)))
    }
}

/// Failures while attaching a flow to the page.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("browser global `{0}` is not available")]
    MissingGlobal(&'static str),

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("refusing to use a secret or restricted key in the browser")]
    SecretKey,

    #[error("Stripe.js: {0}")]
    Stripe(#[from] StripeError),

    #[error("JavaScript error: {0}")]
    Js(String),
}

impl SetupError {
    pub fn js(value: JsValue) -> Self {
        SetupError::Js(js_message(&value))
    }
}

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        wasm_bindgen::JsError::new(&err.to_string()).into()
    }
}

/// Pull a readable message out of an arbitrary JS value.
fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    web_sys::js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
