//! Yew components for apps that render the payment pages themselves.

mod card_form;
mod challenge_result;

pub use card_form::{CardPaymentForm, CardPaymentFormProps};
pub use challenge_result::{ChallengeResult, ChallengeResultProps};
