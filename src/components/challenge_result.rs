use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::challenge::{ChallengeConfirmation, ChallengeOutcome};
use crate::client::StripeClient;
use crate::config::{ChallengeConfig, ResultDisplay};
use crate::error::SetupError;
use crate::interop::use_stripejs;
use crate::page::ResultPage;

#[derive(Properties, PartialEq, Clone)]
pub struct ChallengeResultProps {
    pub publishable_key: String,
    /// PaymentIntent client secret (`pi_…_secret_…`) from the backend.
    pub client_secret: String,
    #[prop_or(String::from("3ds_result"))]
    pub id: String,
    #[prop_or_default]
    pub display: ResultDisplay,
    /// Shown until Stripe answers.
    #[prop_or_default]
    pub pending_message: Option<String>,
    #[prop_or_default]
    pub on_outcome: Callback<ChallengeOutcome>,
}

impl ChallengeResultProps {
    /// The same settings `challengeWithConfig` takes, so both entry points
    /// share one validation.
    pub fn challenge_config(&self) -> ChallengeConfig {
        ChallengeConfig {
            publishable_key: self.publishable_key.clone(),
            client_secret: self.client_secret.clone(),
            result_id: self.id.clone(),
            display: self.display.clone(),
        }
    }
}

/// (message, class) rendered into the result element.
#[derive(Clone)]
struct YewResultPage {
    shown: UseStateHandle<Option<(String, String)>>,
}

impl ResultPage for YewResultPage {
    fn show_result(&self, message: &str, class: &str) {
        self.shown.set(Some((message.to_owned(), class.to_owned())));
    }
}

fn show_failure(
    page: &YewResultPage,
    display: &ResultDisplay,
    on_outcome: &Callback<ChallengeOutcome>,
    error: SetupError,
) {
    page.show_result(&display.failure_message, &display.failure_class);
    on_outcome.emit(ChallengeOutcome::Failed(error.to_string()));
}

/// Runs `stripe.confirmCardPayment` once on mount and shows the outcome.
#[function_component(ChallengeResult)]
pub fn challenge_result(props: &ChallengeResultProps) -> Html {
    let stripe_ready = use_stripejs();
    let shown = use_state(|| None::<(String, String)>);

    {
        let page = YewResultPage {
            shown: shown.clone(),
        };
        let props = props.clone();
        use_effect_with(stripe_ready, move |ready| {
            if *ready {
                spawn_local(async move {
                    let config = props.challenge_config();
                    let client = match config
                        .validate()
                        .and_then(|()| StripeClient::new(&config.publishable_key).map_err(SetupError::from))
                    {
                        Ok(client) => client,
                        Err(e) => {
                            log::error!("3-D Secure setup failed: {e}");
                            show_failure(&page, &config.display, &props.on_outcome, e);
                            return;
                        }
                    };
                    let challenge = ChallengeConfirmation::new(
                        client,
                        page,
                        config.client_secret,
                        config.display,
                    );
                    if let Some(outcome) = challenge.confirm().await {
                        props.on_outcome.emit(outcome);
                    }
                });
            }
            || ()
        });
    }

    let (text, class) = match &*shown {
        Some((text, class)) => (text.clone(), class.clone()),
        None => (props.pending_message.clone().unwrap_or_default(), String::new()),
    };

    html! {
        <p id={props.id.clone()} class={classes!(class)}>{ text }</p>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(publishable_key: &str, client_secret: &str) -> ChallengeResultProps {
        ChallengeResultProps {
            publishable_key: publishable_key.into(),
            client_secret: client_secret.into(),
            id: "3ds_result".into(),
            display: ResultDisplay::default(),
            pending_message: None,
            on_outcome: Callback::noop(),
        }
    }

    #[test]
    fn secret_key_prop_is_rejected() {
        let config = props("sk_test_123", "pi_1_secret_2").challenge_config();
        assert!(matches!(config.validate(), Err(SetupError::SecretKey)));
    }

    #[test]
    fn props_map_onto_challenge_config() {
        let config = props("pk_test_123", "pi_1_secret_2").challenge_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.result_id, "3ds_result");
        assert_eq!(config.display, ResultDisplay::default());
    }
}
