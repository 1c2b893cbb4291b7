//! Single merchant update form

use log::info;
use std::sync::Arc;

use super::dialog::Dialog;
use super::guard::{SubmitControl, SubmitGuard};
use super::validation::{MerchantForm, ValidationErrors, validate};
use crate::api::MerchantApi;

pub struct SingleUpdateForm<A: MerchantApi> {
    api: Arc<A>,
    guard: SubmitGuard,
    values: MerchantForm,
}

impl<A: MerchantApi> SingleUpdateForm<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            guard: SubmitGuard::new(),
            values: MerchantForm::default(),
        }
    }

    /// Values currently held by the form
    pub fn values(&self) -> &MerchantForm {
        &self.values
    }

    /// Validate and submit `form`.
    ///
    /// Invalid input is returned as field errors without touching the network.
    /// The values are kept on failure and cleared on success.
    pub async fn submit(&mut self, form: MerchantForm) -> Result<Dialog, ValidationErrors> {
        self.values = form;
        let valid = validate(&self.values)?;

        let Some(_permit) = self.guard.try_begin() else {
            return Ok(Dialog::in_progress());
        };

        let (merchant_id, data) = valid.into_parts();
        info!("Submitting update for merchant {}", merchant_id);

        let outcome = self.api.update_merchant(&merchant_id, &data).await;
        let dialog = Dialog::for_single(&merchant_id, &outcome);
        if outcome.is_success() {
            self.values = MerchantForm::default();
        }
        Ok(dialog)
    }

    pub fn control(&self) -> SubmitControl {
        self.guard.control()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CanonicalField, UploadOutcome};
    use crate::forms::dialog::FollowUp;
    use crate::forms::test_support::FakeApi;

    fn filled_form() -> MerchantForm {
        MerchantForm {
            merchant_id: "1480000789".to_string(),
            contact_person_name: "Jane Smith".to_string(),
            contact_person_email: "jane.smith@example.com".to_string(),
            contact_person_phone: "0592345678".to_string(),
            contact_person_relation: "Manager".to_string(),
            incorporation_date: "2023-01-20".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_network() {
        let api = Arc::new(FakeApi::succeeding());
        let mut form = SingleUpdateForm::new(Arc::clone(&api));

        let mut input = filled_form();
        input.contact_person_email = "not-an-email".to_string();
        let errors = form.submit(input).await.unwrap_err();

        assert_eq!(errors.get(CanonicalField::ContactPersonEmail), Some("Invalid email"));
        assert_eq!(api.calls(), 0);
        assert_eq!(form.values().contact_person_email, "not-an-email");
    }

    #[tokio::test]
    async fn test_success_sends_payload_and_clears_values() {
        let api = Arc::new(FakeApi::succeeding());
        let mut form = SingleUpdateForm::new(Arc::clone(&api));

        let dialog = form.submit(filled_form()).await.unwrap();

        assert_eq!(dialog.title, "Update Successful");
        assert_eq!(dialog.message, "Merchant 1480000789 was successfully updated.");
        assert_eq!(dialog.follow_up, Some(FollowUp::UpdateAnother));
        assert_eq!(form.values(), &MerchantForm::default());

        let updated = api.updated.lock().unwrap();
        assert_eq!(updated[0].0, "1480000789");
        assert_eq!(updated[0].1.contact_person_name, "Jane Smith");
        assert_eq!(updated[0].1.incorporation_date, "2023-01-20");
    }

    #[tokio::test]
    async fn test_failure_keeps_values() {
        let api = Arc::new(FakeApi::replying(UploadOutcome::transport_failure()));
        let mut form = SingleUpdateForm::new(Arc::clone(&api));

        let dialog = form.submit(filled_form()).await.unwrap();

        assert_eq!(dialog.title, "Update Failed");
        assert_eq!(dialog.message, "An unexpected error occurred");
        assert_eq!(dialog.dismiss_label(), "Try Again");
        assert_eq!(form.values(), &filled_form());
        assert!(form.control().is_enabled());
    }
}
