//! DOM tests for the page implementations. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use yew_stripe_card::page::upsert_hidden_input;
use yew_stripe_card::{
    ButtonLabels, CardPage, CardPageIds, DomCardPage, DomResultPage, ResultPage, SetupError,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Fresh copy of the stock card template under a unique prefix.
fn card_template(prefix: &str) -> CardPageIds {
    let ids = CardPageIds {
        form: format!("{prefix}-form"),
        card_mount: format!("{prefix}-card"),
        errors: format!("{prefix}-errors"),
        button: format!("{prefix}-button"),
    };
    let container = document().create_element("div").unwrap();
    container.set_inner_html(&format!(
        r#"<form id="{}" action="about:blank" method="post">
             <div id="{}"></div>
             <div id="{}"></div>
             <button id="{}" type="submit">Pay Now</button>
           </form>"#,
        ids.form, ids.card_mount, ids.errors, ids.button
    ));
    document().body().unwrap().append_child(&container).unwrap();
    ids
}

fn hidden_inputs(form: &HtmlFormElement, name: &str) -> Vec<HtmlInputElement> {
    let list = form
        .query_selector_all(&format!("input[type=\"hidden\"][name=\"{name}\"]"))
        .unwrap();
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|node| node.dyn_into::<HtmlInputElement>().unwrap())
        .collect()
}

#[wasm_bindgen_test]
fn hidden_input_is_upserted() {
    let ids = card_template("upsert");
    let form: HtmlFormElement = document()
        .get_element_by_id(&ids.form)
        .unwrap()
        .dyn_into()
        .unwrap();

    upsert_hidden_input(&document(), &form, "payment_method_id", "pm_1").unwrap();
    upsert_hidden_input(&document(), &form, "payment_method_id", "pm_2").unwrap();

    let inputs = hidden_inputs(&form, "payment_method_id");
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].value(), "pm_2");
}

/// Point the template's form at a throwaway frame so `submit()` does not
/// navigate the test page away.
fn submit_into_frame(ids: &CardPageIds) -> HtmlFormElement {
    let frame_name = format!("{}-sink", ids.form);
    let frame = document().create_element("iframe").unwrap();
    frame.set_attribute("name", &frame_name).unwrap();
    document().body().unwrap().append_child(&frame).unwrap();

    let form: HtmlFormElement = document()
        .get_element_by_id(&ids.form)
        .unwrap()
        .dyn_into()
        .unwrap();
    form.set_target(&frame_name);
    form
}

#[wasm_bindgen_test]
fn submitting_the_payment_method_keeps_one_hidden_field() {
    let ids = card_template("submit");
    let form = submit_into_frame(&ids);
    let page = DomCardPage::locate(&document(), &ids, ButtonLabels::default()).unwrap();

    let listener_calls = Rc::new(Cell::new(0));
    let counter = listener_calls.clone();
    let on_submit = Closure::<dyn FnMut()>::new(move || counter.set(counter.get() + 1));
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .unwrap();

    page.submit_payment_method("payment_method_id", "pm_first").unwrap();
    page.submit_payment_method("payment_method_id", "pm_second").unwrap();

    let inputs = hidden_inputs(&form, "payment_method_id");
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].value(), "pm_second");
    // Programmatic submission must not loop back into the capture listener.
    assert_eq!(listener_calls.get(), 0);

    form.remove_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .unwrap();
}

#[wasm_bindgen_test]
fn busy_state_disables_button_and_shows_spinner() {
    let ids = card_template("busy");
    let page = DomCardPage::locate(&document(), &ids, ButtonLabels::default()).unwrap();
    let button: HtmlButtonElement = document()
        .get_element_by_id(&ids.button)
        .unwrap()
        .dyn_into()
        .unwrap();

    page.set_busy(true);
    assert!(button.disabled());
    assert!(button.query_selector(".spinner-border").unwrap().is_some());
    assert_eq!(button.text_content().unwrap(), "Processing...");

    page.set_busy(false);
    assert!(!button.disabled());
    assert_eq!(button.inner_html(), "Pay Now");
}

#[wasm_bindgen_test]
fn card_errors_are_written_and_cleared() {
    let ids = card_template("errors");
    let page = DomCardPage::locate(&document(), &ids, ButtonLabels::default()).unwrap();
    let errors = document().get_element_by_id(&ids.errors).unwrap();

    page.show_card_error("Your card number is invalid.");
    assert_eq!(errors.text_content().unwrap(), "Your card number is invalid.");

    page.clear_card_error();
    assert_eq!(errors.text_content().unwrap(), "");
}

#[wasm_bindgen_test]
fn locate_reports_missing_and_mistyped_elements() {
    let ids = card_template("locate");

    let missing = CardPageIds {
        errors: "nowhere".into(),
        ..ids.clone()
    };
    assert!(matches!(
        DomCardPage::locate(&document(), &missing, ButtonLabels::default()),
        Err(SetupError::MissingElement(id)) if id == "nowhere"
    ));

    let mistyped = CardPageIds {
        button: ids.errors.clone(),
        ..ids
    };
    assert!(matches!(
        DomCardPage::locate(&document(), &mistyped, ButtonLabels::default()),
        Err(SetupError::WrongElement { expected: "button", .. })
    ));
}

#[wasm_bindgen_test]
fn result_page_sets_text_and_class() {
    let target = document().create_element("p").unwrap();
    target.set_id("result-under-test");
    document().body().unwrap().append_child(&target).unwrap();

    let page = DomResultPage::locate(&document(), "result-under-test").unwrap();
    page.show_result("Thank you!", "text-success");

    assert_eq!(target.text_content().unwrap(), "Thank you!");
    assert!(target.class_list().contains("text-success"));
}
