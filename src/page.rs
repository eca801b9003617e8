//! The host page as seen by the flow controllers.
//!
//! Controllers only talk to [`CardPage`] and [`ResultPage`]; the DOM-backed
//! implementations here locate the template's elements by id once and then
//! mutate them in place.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use crate::config::{ButtonLabels, CardPageIds};
use crate::error::SetupError;

/// Everything the card capture flow needs from its page.
pub trait CardPage {
    /// Write `message` into the card error element.
    fn show_card_error(&self, message: &str);

    /// Empty the card error element.
    fn clear_card_error(&self);

    /// Disable the submit control and show the spinner, or restore it.
    fn set_busy(&self, busy: bool);

    /// Put `payment_method_id` into the hidden field `field_name` and submit
    /// the form for real.
    fn submit_payment_method(
        &self,
        field_name: &str,
        payment_method_id: &str,
    ) -> Result<(), SetupError>;
}

/// Element receiving the outcome of the challenge confirmation.
pub trait ResultPage {
    /// Overwrite the result text and add `class` to the element.
    fn show_result(&self, message: &str, class: &str);
}

/// Classes of the spinner shown inside the busy submit button.
pub const SPINNER_CLASS: &str = "spinner-border spinner-border-sm";

/// Card page backed by the server-rendered template.
#[derive(Clone, Debug)]
pub struct DomCardPage {
    document: Document,
    form: HtmlFormElement,
    errors: Element,
    button: HtmlButtonElement,
    labels: ButtonLabels,
}

impl DomCardPage {
    pub fn locate(
        document: &Document,
        ids: &CardPageIds,
        labels: ButtonLabels,
    ) -> Result<Self, SetupError> {
        // The widget mount point is only checked for presence; Stripe.js owns it.
        element_by_id(document, &ids.card_mount)?;

        Ok(Self {
            document: document.clone(),
            form: typed_element(document, &ids.form, "form")?,
            errors: element_by_id(document, &ids.errors)?,
            button: typed_element(document, &ids.button, "button")?,
            labels,
        })
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }
}

impl CardPage for DomCardPage {
    fn show_card_error(&self, message: &str) {
        self.errors.set_text_content(Some(message));
    }

    fn clear_card_error(&self) {
        self.errors.set_text_content(Some(""));
    }

    fn set_busy(&self, busy: bool) {
        self.button.set_disabled(busy);
        if busy {
            self.button.set_text_content(None);
            let spinner = self.document.create_element("span").and_then(|span| {
                span.set_class_name(SPINNER_CLASS);
                span.set_attribute("role", "status")?;
                span.set_attribute("aria-hidden", "true")?;
                self.button.append_child(&span)?;
                let label = self.document.create_text_node(&self.labels.busy);
                self.button.append_child(&label)
            });
            if let Err(e) = spinner {
                log::warn!("could not render busy indicator: {}", SetupError::js(e));
                self.button.set_text_content(Some(&self.labels.busy));
            }
        } else {
            self.button.set_text_content(Some(&self.labels.idle));
        }
    }

    fn submit_payment_method(
        &self,
        field_name: &str,
        payment_method_id: &str,
    ) -> Result<(), SetupError> {
        upsert_hidden_input(&self.document, &self.form, field_name, payment_method_id)?;
        // `submit()` navigates without firing the form's submit listeners.
        self.form.submit().map_err(SetupError::js)
    }
}

/// Result element of the challenge page.
#[derive(Clone, Debug)]
pub struct DomResultPage {
    target: Element,
}

impl DomResultPage {
    pub fn locate(document: &Document, id: &str) -> Result<Self, SetupError> {
        Ok(Self {
            target: element_by_id(document, id)?,
        })
    }
}

impl ResultPage for DomResultPage {
    fn show_result(&self, message: &str, class: &str) {
        self.target.set_text_content(Some(message));
        if let Err(e) = self.target.class_list().add_1(class) {
            log::warn!("could not add class `{class}`: {}", SetupError::js(e));
        }
    }
}

/// Set the hidden input `name` on `form` to `value`, creating it if needed.
///
/// Repeated calls leave exactly one such input on the form.
pub fn upsert_hidden_input(
    document: &Document,
    form: &HtmlFormElement,
    name: &str,
    value: &str,
) -> Result<HtmlInputElement, SetupError> {
    let selector = format!("input[type=\"hidden\"][name=\"{name}\"]");
    let existing = form.query_selector(&selector).map_err(SetupError::js)?;

    let input = match existing.and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
        Some(input) => input,
        None => {
            let input: HtmlInputElement = document
                .create_element("input")
                .map_err(SetupError::js)?
                .dyn_into()
                .map_err(|_| SetupError::Js("created <input> is not an HtmlInputElement".into()))?;
            input.set_type("hidden");
            input.set_name(name);
            form.append_child(&input).map_err(SetupError::js)?;
            input
        }
    };
    input.set_value(value);
    Ok(input)
}

pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element, SetupError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::MissingElement(id.to_owned()))
}

fn typed_element<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, SetupError> {
    element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| SetupError::WrongElement {
            id: id.to_owned(),
            expected,
        })
}
