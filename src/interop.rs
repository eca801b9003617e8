//! Loading Stripe.js v3 at runtime (no inline JS) and page lifecycle helpers.
//!
//! # Overview
//! [`ensure_stripejs`] injects a single
//! `<script id="stripejs-sdk" src="https://js.stripe.com/v3/">`
//! into `<head>` unless `window.Stripe` already exists, and resolves once the
//! script's `load` event fires. All callers on the page await the same load.
//! Server-rendered pages that already include the script tag resolve
//! immediately.
//!
//! [`use_stripejs`] wraps the same logic as a Yew hook.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_card::use_stripejs;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let stripe_ready = use_stripejs();
//!     html! {
//!         if stripe_ready {
//!             <p>{"Stripe.js loaded"}</p>
//!         } else {
//!             <p>{"Loading Stripe.js..."}</p>
//!         }
//!     }
//! }
//! ```

use std::cell::RefCell;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Promise, Reflect};
use web_sys::{Document, HtmlScriptElement, Window};
use yew::functional::hook;
use yew::prelude::*;

use crate::error::SetupError;

pub const STRIPE_JS_URL: &str = "https://js.stripe.com/v3/";
pub const STRIPE_JS_SCRIPT_ID: &str = "stripejs-sdk";

pub(crate) fn window() -> Result<Window, SetupError> {
    web_sys::window().ok_or(SetupError::MissingGlobal("window"))
}

pub(crate) fn document() -> Result<Document, SetupError> {
    window()?
        .document()
        .ok_or(SetupError::MissingGlobal("document"))
}

fn stripe_loaded(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("Stripe")).unwrap_or(false)
}

thread_local! {
    /// The load in progress (or finished) for this page; shared by every caller.
    static STRIPE_JS_LOAD: RefCell<Option<Promise>> = const { RefCell::new(None) };
}

/// Resolve once `window.Stripe` is available, loading Stripe.js if needed.
///
/// Concurrent callers share one `<script>` and one load. A failed load is
/// forgotten, so the next call injects a fresh script instead of waiting on
/// events that already fired.
pub async fn ensure_stripejs() -> Result<(), SetupError> {
    load_script_from(STRIPE_JS_URL).await
}

async fn load_script_from(url: &str) -> Result<(), SetupError> {
    let window = window()?;
    if stripe_loaded(&window) {
        return Ok(());
    }

    let attempt = match STRIPE_JS_LOAD.with(|load| load.borrow().clone()) {
        Some(pending) => pending,
        None => {
            let pending = start_load(&document()?, url)?;
            STRIPE_JS_LOAD.with(|load| *load.borrow_mut() = Some(pending.clone()));
            pending
        }
    };

    let loaded = JsFuture::from(attempt.clone()).await;
    if loaded.is_err() {
        forget_load(&attempt);
        return Err(SetupError::Js(format!("failed to load {url}")));
    }
    if !stripe_loaded(&window) {
        forget_load(&attempt);
        return Err(SetupError::MissingGlobal("Stripe"));
    }
    log::debug!("Stripe.js loaded");
    Ok(())
}

/// Inject the script with `load`/`error` listeners attached before it can fire.
fn start_load(document: &Document, url: &str) -> Result<Promise, SetupError> {
    // Left over from a wasm instance whose load state we never saw.
    if let Some(stale) = document.get_element_by_id(STRIPE_JS_SCRIPT_ID) {
        log::debug!("replacing stale #{STRIPE_JS_SCRIPT_ID}");
        stale.remove();
    }

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(SetupError::js)?
        .dyn_into()
        .map_err(|_| SetupError::Js("created <script> is not an HtmlScriptElement".into()))?;
    script.set_id(STRIPE_JS_SCRIPT_ID);
    script.set_src(url);
    script.set_defer(true);

    let mut listen_err = None;
    let pending = Promise::new(&mut |resolve, reject| {
        let attached = script
            .add_event_listener_with_callback("load", &resolve)
            .and_then(|()| script.add_event_listener_with_callback("error", &reject));
        if let Err(e) = attached {
            listen_err = Some(e);
        }
    });
    if let Some(e) = listen_err {
        return Err(SetupError::js(e));
    }

    document
        .head()
        .ok_or(SetupError::MissingGlobal("document.head"))?
        .append_child(&script)
        .map_err(SetupError::js)?;
    Ok(pending)
}

/// Drop `attempt` and its script, unless a newer attempt already replaced it.
fn forget_load(attempt: &Promise) {
    let current = STRIPE_JS_LOAD.with(|load| {
        let mut load = load.borrow_mut();
        if load.as_ref().is_some_and(|p| Object::is(p, attempt)) {
            load.take()
        } else {
            None
        }
    });
    if current.is_some() {
        if let Some(script) = document()
            .ok()
            .and_then(|d| d.get_element_by_id(STRIPE_JS_SCRIPT_ID))
        {
            script.remove();
        }
    }
}

/// Run `f` once the DOM is parsed: on `DOMContentLoaded`, or right away if
/// that already happened.
pub fn on_dom_ready<F>(f: F) -> Result<(), SetupError>
where
    F: FnOnce() + 'static,
{
    let document = document()?;
    if document.ready_state() == "loading" {
        let callback = Closure::once_into_js(f);
        document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
            .map_err(SetupError::js)?;
    } else {
        f();
    }
    Ok(())
}

/// Custom hook: load Stripe.js v3 once and track readiness.
///
/// # Returns
/// - `false` while the `<script>` is being fetched & parsed.
/// - `true` once `window.Stripe` exists.
#[hook]
pub fn use_stripejs() -> bool {
    let loaded = use_state(|| web_sys::window().is_some_and(|win| stripe_loaded(&win)));

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if !*loaded {
                wasm_bindgen_futures::spawn_local(async move {
                    match ensure_stripejs().await {
                        Ok(()) => loaded.set(true),
                        Err(e) => log::error!("Stripe.js unavailable: {e}"),
                    }
                });
            }
            || ()
        });
    }

    *loaded
}
