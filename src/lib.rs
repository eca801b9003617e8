//! Stripe.js card capture and 3-D Secure confirmation, compiled to wasm.
//!
//! Two independent flows:
//! - card capture: mount the card Element, tokenize on submit, create a
//!   PaymentMethod and post its id with the surrounding form;
//! - challenge confirmation: `confirmCardPayment` for a PaymentIntent and a
//!   fixed success/failure message on the page.
//!
//! Server-rendered pages call the exported [`entry`] functions; Yew apps use
//! the [`components`].

pub mod bindings;
pub mod card_capture;
pub mod challenge;
pub mod client;
pub mod components;
pub mod config;
pub mod entry;
pub mod error;
pub mod interop;
pub mod logger;
pub mod page;
pub mod sdk;

pub use bindings::*;
pub use card_capture::{CaptureOutcome, CaptureState, CardCapture};
pub use challenge::{ChallengeConfirmation, ChallengeOutcome, ChallengeState};
pub use client::{CardElementOptions, ChangeListener, StripeCard, StripeClient};
pub use components::*;
pub use config::*;
pub use error::{SetupError, StripeError};
pub use interop::*;
pub use page::{CardPage, DomCardPage, DomResultPage, ResultPage};
