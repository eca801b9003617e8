use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlFormElement;
use yew::prelude::*;

use crate::card_capture::CardCapture;
use crate::client::{CardElementOptions, ChangeListener, StripeCard, StripeClient};
use crate::config::{ButtonLabels, CardCaptureConfig, CardPageIds, CardStyle};
use crate::error::SetupError;
use crate::interop::{document, use_stripejs};
use crate::page::{upsert_hidden_input, CardPage, SPINNER_CLASS};

/// Properties for the [`CardPaymentForm`] component.
///
/// * `publishable_key` – Your Stripe Publishable Key (`pk_…`).
/// * `customer_email` – Sent as the payment method's billing email.
/// * `hide_postal_code` – Hide the widget's postal code input.
/// * `action` / `method` – Where the form posts the `payment_method_id`.
/// * `children` – Extra fields rendered inside the form (CSRF token, plan picker…).
#[derive(Properties, PartialEq, Clone)]
pub struct CardPaymentFormProps {
    pub publishable_key: String,
    #[prop_or_default]
    pub customer_email: Option<String>,
    #[prop_or_default]
    pub action: String,
    #[prop_or(String::from("post"))]
    pub method: String,
    #[prop_or_default]
    pub ids: CardPageIds,
    #[prop_or_default]
    pub labels: ButtonLabels,
    #[prop_or_default]
    pub style: CardStyle,
    #[prop_or_default]
    pub hide_postal_code: Option<bool>,
    #[prop_or_default]
    pub children: Children,
}

impl CardPaymentFormProps {
    /// The same settings `cardWithConfig` takes, so both entry points share
    /// one validation.
    pub fn capture_config(&self) -> CardCaptureConfig {
        CardCaptureConfig {
            publishable_key: self.publishable_key.clone(),
            customer_email: self.customer_email.clone().filter(|e| !e.is_empty()),
            ids: self.ids.clone(),
            labels: self.labels.clone(),
            style: self.style.clone(),
            field_name: None,
            hide_postal_code: self.hide_postal_code,
        }
    }
}

/// Card page whose error text and busy flag live in Yew state.
#[derive(Clone)]
struct YewCardPage {
    error: UseStateHandle<String>,
    busy: UseStateHandle<bool>,
    form: NodeRef,
}

impl CardPage for YewCardPage {
    fn show_card_error(&self, message: &str) {
        self.error.set(message.to_owned());
    }

    fn clear_card_error(&self) {
        self.error.set(String::new());
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    fn submit_payment_method(
        &self,
        field_name: &str,
        payment_method_id: &str,
    ) -> Result<(), SetupError> {
        let form = self
            .form
            .cast::<HtmlFormElement>()
            .ok_or_else(|| SetupError::MissingElement("payment form".into()))?;
        upsert_hidden_input(&document()?, &form, field_name, payment_method_id)?;
        form.submit().map_err(SetupError::js)
    }
}

type Capture = CardCapture<StripeCard, YewCardPage>;

/// A mounted widget and the change handler feeding its controller.
struct MountedCard {
    card: StripeCard,
    listener: ChangeListener,
}

impl MountedCard {
    fn tear_down(self) {
        if let Err(e) = self.card.unmount() {
            log::warn!("card element unmount failed: {e}");
        }
        // Detaches the handler and releases its controller handle.
        drop(self.listener);
    }
}

fn mount_capture(
    config: &CardCaptureConfig,
    page: YewCardPage,
) -> Result<(MountedCard, Rc<Capture>), SetupError> {
    config.validate()?;
    let client = StripeClient::new(&config.publishable_key)?;
    let card = client.mount_card(
        &config.ids.card_mount_selector(),
        &CardElementOptions::from(config),
    )?;
    let capture = Rc::new(CardCapture::new(card.clone(), page, config.billing_details()));

    let handle = capture.clone();
    let listener = card.on_change(move |change| handle.card_changed(&change))?;
    Ok((MountedCard { card, listener }, capture))
}

/// Card form that posts a `payment_method_id` to `action`.
///
/// The widget is mounted once Stripe.js is available; later changes to the
/// key or style props are not picked up.
///
/// # Example
///
/// ```rust,ignore
/// html! {
///     <CardPaymentForm
///         publishable_key="pk_test_123"
///         customer_email={Some("jenny@example.com".to_string())}
///         action="/upgrade/"
///     >
///         <input type="hidden" name="csrfmiddlewaretoken" value={csrf} />
///     </CardPaymentForm>
/// }
/// ```
#[function_component(CardPaymentForm)]
pub fn card_payment_form(props: &CardPaymentFormProps) -> Html {
    let stripe_ready = use_stripejs();
    let error = use_state(String::new);
    let busy = use_state(|| false);
    let form_ref = use_node_ref();
    let capture = use_state(|| None::<Rc<Capture>>);

    {
        let page = YewCardPage {
            error: error.clone(),
            busy: busy.clone(),
            form: form_ref.clone(),
        };
        let capture = capture.clone();
        let props = props.clone();
        use_effect_with(stripe_ready, move |ready| {
            let mut mounted = None;
            if *ready {
                match mount_capture(&props.capture_config(), page.clone()) {
                    Ok((card, c)) => {
                        mounted = Some(card);
                        capture.set(Some(c));
                    }
                    Err(e) => {
                        log::error!("card form setup failed: {e}");
                        page.show_card_error(&e.to_string());
                    }
                }
            }
            move || {
                if let Some(card) = mounted {
                    card.tear_down();
                }
            }
        });
    }

    let onsubmit = {
        let capture = capture.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(capture) = (*capture).clone() {
                spawn_local(async move {
                    capture.submit().await;
                });
            }
        })
    };

    html! {
        <form
            id={props.ids.form.clone()}
            ref={form_ref}
            action={props.action.clone()}
            method={props.method.clone()}
            {onsubmit}
        >
            { for props.children.iter() }
            <div id={props.ids.card_mount.clone()} />
            <div id={props.ids.errors.clone()} role="alert">{ (*error).clone() }</div>
            <button
                id={props.ids.button.clone()}
                type="submit"
                disabled={*busy || capture.is_none()}
            >
                if *busy {
                    <span class={SPINNER_CLASS} role="status" aria-hidden="true"></span>
                    { props.labels.busy.clone() }
                } else {
                    { props.labels.idle.clone() }
                }
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(publishable_key: &str, customer_email: Option<&str>) -> CardPaymentFormProps {
        CardPaymentFormProps {
            publishable_key: publishable_key.into(),
            customer_email: customer_email.map(str::to_owned),
            action: "/upgrade/".into(),
            method: "post".into(),
            ids: CardPageIds::default(),
            labels: ButtonLabels::default(),
            style: CardStyle::default(),
            hide_postal_code: Some(true),
            children: Children::default(),
        }
    }

    #[test]
    fn secret_key_prop_is_rejected() {
        let config = props("sk_live_123", Some("jenny@example.com")).capture_config();
        assert!(matches!(config.validate(), Err(SetupError::SecretKey)));
    }

    #[test]
    fn props_map_onto_capture_config() {
        let config = props("pk_test_123", Some("")).capture_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.customer_email, None);
        assert_eq!(config.field_name(), "payment_method_id");
        assert_eq!(config.hide_postal_code, Some(true));
    }
}
