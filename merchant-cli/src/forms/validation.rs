//! Client-side validation of the single update form

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::api::{CanonicalField, MerchantData, MerchantRecord};
use crate::sheet::format_date;

/// Same acceptance rule browsers apply to `type="email"` inputs
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

/// Raw values as entered by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantForm {
    pub merchant_id: String,
    pub contact_person_name: String,
    pub contact_person_email: String,
    pub contact_person_phone: String,
    pub contact_person_relation: String,
    pub incorporation_date: String,
}

impl MerchantForm {
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::MerchantId => &self.merchant_id,
            CanonicalField::ContactPersonName => &self.contact_person_name,
            CanonicalField::ContactPersonEmail => &self.contact_person_email,
            CanonicalField::ContactPersonPhone => &self.contact_person_phone,
            CanonicalField::ContactPersonRelation => &self.contact_person_relation,
            CanonicalField::IncorporationDate => &self.incorporation_date,
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CanonicalField::MerchantId => self.merchant_id = value,
            CanonicalField::ContactPersonName => self.contact_person_name = value,
            CanonicalField::ContactPersonEmail => self.contact_person_email = value,
            CanonicalField::ContactPersonPhone => self.contact_person_phone = value,
            CanonicalField::ContactPersonRelation => self.contact_person_relation = value,
            CanonicalField::IncorporationDate => self.incorporation_date = value,
        }
    }
}

/// Per-field messages, in form order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(CanonicalField, &'static str)>,
}

impl ValidationErrors {
    /// Message for one field, if it failed
    pub fn get(&self, field: CanonicalField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &'static str)> + '_ {
        self.errors.iter().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|(_, m)| *m).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that passed validation, ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMerchant(MerchantRecord);

impl ValidMerchant {
    pub fn merchant_id(&self) -> &str {
        &self.0.merchant_id
    }

    pub fn record(&self) -> &MerchantRecord {
        &self.0
    }

    pub fn into_parts(self) -> (String, MerchantData) {
        self.0.into_parts()
    }
}

fn required_message(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::MerchantId => "Merchant ID is required",
        CanonicalField::ContactPersonName => "Contact person name is required",
        CanonicalField::ContactPersonEmail => "Contact person email is required",
        CanonicalField::ContactPersonPhone => "Contact person phone is required",
        CanonicalField::ContactPersonRelation => "Contact person relation is required",
        CanonicalField::IncorporationDate => "Incorporation date is required",
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Check every field. Values are trimmed; the date is coerced to `YYYY-MM-DD` when recognizable.
pub fn validate(form: &MerchantForm) -> Result<ValidMerchant, ValidationErrors> {
    let mut errors = Vec::new();
    let mut record = MerchantRecord::default();

    for field in CanonicalField::ALL {
        let value = form.get(field).trim();
        if value.is_empty() {
            errors.push((field, required_message(field)));
            continue;
        }
        if field == CanonicalField::ContactPersonEmail && !is_valid_email(value) {
            errors.push((field, "Invalid email"));
            continue;
        }

        let value = if field == CanonicalField::IncorporationDate {
            format_date(value)
        } else {
            value.to_string()
        };
        record.set(field, value);
    }

    if errors.is_empty() {
        Ok(ValidMerchant(record))
    } else {
        log::debug!("Form rejected with {} field error(s)", errors.len());
        Err(ValidationErrors { errors })
    }
}
