//! `update` command: single merchant update

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use is_terminal::IsTerminal;
use std::sync::Arc;

use crate::api::{CanonicalField, MerchantClient};
use crate::cli::UpdateArgs;
use crate::cli::output::{
    PROGRESS_PERIOD, print_dialog, print_validation_errors, spawn_progress, unexpected_dialog,
};
use crate::config::Config;
use crate::forms::{DialogKind, MerchantForm, SingleUpdateForm};

fn prompt_for(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::MerchantId => "Merchant ID",
        CanonicalField::ContactPersonName => "Contact Person Name",
        CanonicalField::ContactPersonEmail => "Contact Person Email",
        CanonicalField::ContactPersonPhone => "Contact Person Phone",
        CanonicalField::ContactPersonRelation => "Contact Person Relation",
        CanonicalField::IncorporationDate => "Incorporation Date (YYYY-MM-DD)",
    }
}

fn form_from_args(args: UpdateArgs) -> MerchantForm {
    MerchantForm {
        merchant_id: args.merchant_id.unwrap_or_default(),
        contact_person_name: args.name.unwrap_or_default(),
        contact_person_email: args.email.unwrap_or_default(),
        contact_person_phone: args.phone.unwrap_or_default(),
        contact_person_relation: args.relation.unwrap_or_default(),
        incorporation_date: args.incorporation_date.unwrap_or_default(),
    }
}

/// Ask for every field that is still blank
fn prompt_missing(form: &mut MerchantForm, theme: &ColorfulTheme) -> Result<()> {
    for field in CanonicalField::ALL {
        if !form.get(field).trim().is_empty() {
            continue;
        }
        let value: String = Input::with_theme(theme)
            .with_prompt(prompt_for(field))
            .allow_empty(true)
            .interact_text()?;
        form.set(field, value);
    }
    Ok(())
}

/// Handle the update command. Returns whether the final dialog was a success.
pub async fn handle_update_command(args: UpdateArgs, config: &Config) -> Result<bool> {
    let interactive = std::io::stdin().is_terminal();
    let theme = ColorfulTheme::default();

    let client = Arc::new(MerchantClient::new(&config.api)?);
    let mut form = SingleUpdateForm::new(client);
    let mut input = form_from_args(args);

    loop {
        if interactive {
            if let Err(e) = prompt_missing(&mut input, &theme) {
                print_dialog(&unexpected_dialog(&e));
                return Ok(false);
            }
        }

        let ticker = spawn_progress(form.control(), PROGRESS_PERIOD);
        let submitted = form.submit(input.clone()).await;
        ticker.await.ok();

        let dialog = match submitted {
            Ok(dialog) => dialog,
            Err(errors) => {
                print_validation_errors(&errors);
                if !interactive {
                    return Ok(false);
                }
                for (field, _) in errors.iter() {
                    input.set(field, "");
                }
                continue;
            }
        };

        print_dialog(&dialog);
        if !interactive {
            return Ok(dialog.is_success());
        }

        let again = match (dialog.kind, dialog.follow_up) {
            (DialogKind::Success, Some(follow_up)) => Confirm::with_theme(&theme)
                .with_prompt(format!("{}?", follow_up.label()))
                .default(false)
                .interact()?,
            (DialogKind::Error, _) => Confirm::with_theme(&theme)
                .with_prompt(dialog.dismiss_label())
                .default(true)
                .interact()?,
            (DialogKind::Success, None) => false,
        };
        if !again {
            return Ok(dialog.is_success());
        }
        if dialog.is_success() {
            input = form.values().clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_flags() {
        let form = form_from_args(UpdateArgs {
            merchant_id: Some("1480000493".to_string()),
            email: Some("john.doe@example.com".to_string()),
            ..Default::default()
        });

        assert_eq!(form.merchant_id, "1480000493");
        assert_eq!(form.contact_person_email, "john.doe@example.com");
        assert_eq!(form.contact_person_name, "");
    }
}
