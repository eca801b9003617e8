//! Functions exported to the page's JavaScript.
//!
//! A server-rendered template only needs:
//!
//! ```html
//! <script type="module">
//!   import init, { card } from "/static/pkg/yew_stripe_card.js";
//!   await init();
//!   card("{{ stripe_publishable_key }}", "{{ customer_email }}");
//! </script>
//! ```
//!
//! Configuration errors are thrown synchronously; anything that goes wrong
//! after the DOM is ready is logged to the console.

use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

use crate::card_capture::CardCapture;
use crate::challenge::ChallengeConfirmation;
use crate::client::{CardElementOptions, StripeClient};
use crate::config::{CardCaptureConfig, ChallengeConfig};
use crate::error::SetupError;
use crate::interop::{document, ensure_stripejs, on_dom_ready};
use crate::logger;
use crate::page::{DomCardPage, DomResultPage};

static INIT: Once = Once::new();

fn init_runtime() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        logger::init(log::LevelFilter::Info);
    });
}

/// Change console verbosity (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`, `"off"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    init_runtime();
    logger::init(logger::parse_level(level));
}

/// Attach the card capture flow to the stock payment form.
#[wasm_bindgen]
pub fn card(publishable_key: &str, customer_email: &str) -> Result<(), JsValue> {
    start_card_capture(CardCaptureConfig::new(publishable_key, customer_email))?;
    Ok(())
}

/// Like [`card`], configured from a JS object.
#[wasm_bindgen(js_name = cardWithConfig)]
pub fn card_with_config(config: JsValue) -> Result<(), JsValue> {
    start_card_capture(CardCaptureConfig::from_js(config)?)?;
    Ok(())
}

/// Confirm the PaymentIntent behind `client_secret` and report on the page.
#[wasm_bindgen(js_name = _3dsec)]
pub fn three_d_secure(publishable_key: &str, client_secret: &str) -> Result<(), JsValue> {
    start_challenge(ChallengeConfig::new(publishable_key, client_secret))?;
    Ok(())
}

/// Like [`three_d_secure`], configured from a JS object.
#[wasm_bindgen(js_name = challengeWithConfig)]
pub fn challenge_with_config(config: JsValue) -> Result<(), JsValue> {
    start_challenge(ChallengeConfig::from_js(config)?)?;
    Ok(())
}

pub fn start_card_capture(config: CardCaptureConfig) -> Result<(), SetupError> {
    init_runtime();
    config.validate()?;
    on_dom_ready(move || {
        spawn_local(async move {
            if let Err(e) = run_card_capture(config).await {
                log::error!("card form setup failed: {e}");
            }
        })
    })
}

pub fn start_challenge(config: ChallengeConfig) -> Result<(), SetupError> {
    init_runtime();
    config.validate()?;
    on_dom_ready(move || {
        spawn_local(async move {
            if let Err(e) = run_challenge(config).await {
                log::error!("payment confirmation setup failed: {e}");
            }
        })
    })
}

async fn run_card_capture(config: CardCaptureConfig) -> Result<(), SetupError> {
    ensure_stripejs().await?;
    let document = document()?;
    let page = DomCardPage::locate(&document, &config.ids, config.labels.clone())?;

    let client = StripeClient::new(&config.publishable_key)?;
    let options = CardElementOptions::from(&config);
    let card = client.mount_card(&config.ids.card_mount_selector(), &options)?;

    let form = page.form().clone();
    let capture = Rc::new(
        CardCapture::new(card.clone(), page, config.billing_details())
            .with_field_name(config.field_name()),
    );

    {
        let capture = capture.clone();
        card.on_change(move |change| capture.card_changed(&change))?
            .forget();
    }

    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let capture = capture.clone();
        spawn_local(async move {
            capture.submit().await;
        });
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(SetupError::js)?;
    on_submit.forget();

    log::info!("card form ready");
    Ok(())
}

async fn run_challenge(config: ChallengeConfig) -> Result<(), SetupError> {
    ensure_stripejs().await?;
    let page = DomResultPage::locate(&document()?, &config.result_id)?;
    let client = StripeClient::new(&config.publishable_key)?;

    let challenge = ChallengeConfirmation::new(client, page, config.client_secret, config.display);
    challenge.confirm().await;
    Ok(())
}
