//! Merchant record types shared by the spreadsheet pipeline and the API client

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six merchant attributes the portal recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    MerchantId,
    ContactPersonName,
    ContactPersonEmail,
    ContactPersonPhone,
    ContactPersonRelation,
    IncorporationDate,
}

impl CanonicalField {
    /// All fields in template column order
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::MerchantId,
        CanonicalField::ContactPersonName,
        CanonicalField::ContactPersonEmail,
        CanonicalField::ContactPersonPhone,
        CanonicalField::ContactPersonRelation,
        CanonicalField::IncorporationDate,
    ];

    /// Header text as it appears in the template and on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::MerchantId => "merchantId",
            Self::ContactPersonName => "contactPersonName",
            Self::ContactPersonEmail => "contactPersonEmail",
            Self::ContactPersonPhone => "contactPersonPhone",
            Self::ContactPersonRelation => "contactPersonRelation",
            Self::IncorporationDate => "incorporationDate",
        }
    }

    /// Human-readable column label used in previews
    pub fn label(&self) -> &'static str {
        match self {
            Self::MerchantId => "Merchant ID",
            Self::ContactPersonName => "Contact Name",
            Self::ContactPersonEmail => "Email",
            Self::ContactPersonPhone => "Phone",
            Self::ContactPersonRelation => "Relation",
            Self::IncorporationDate => "Incorporation Date",
        }
    }

    /// Case-insensitive exact match against a spreadsheet header
    pub fn matches_header(&self, header: &str) -> bool {
        header.to_lowercase() == self.name().to_lowercase()
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully normalized merchant row. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRecord {
    pub merchant_id: String,
    pub contact_person_name: String,
    pub contact_person_email: String,
    pub contact_person_phone: String,
    pub contact_person_relation: String,
    pub incorporation_date: String,
}

impl MerchantRecord {
    /// Get a field by its canonical identity
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

    /// Set a field by its canonical identity
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

    /// Split into the record id and the update payload
    pub fn into_parts(self) -> (String, MerchantData) {
        (
            self.merchant_id,
            MerchantData {
                contact_person_name: self.contact_person_name,
                contact_person_email: self.contact_person_email,
                contact_person_phone: self.contact_person_phone,
                contact_person_relation: self.contact_person_relation,
                incorporation_date: self.incorporation_date,
            },
        )
    }
}

/// Body of `PUT /merchant/update/{merchantId}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantData {
    pub contact_person_name: String,
    pub contact_person_email: String,
    pub contact_person_phone: String,
    pub contact_person_relation: String,
    pub incorporation_date: String,
}

/// A spreadsheet selected for bulk upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type sent with the multipart part, derived from the extension
    pub fn mime_type(&self) -> &'static str {
        let lower = self.file_name.to_lowercase();
        if lower.ends_with(".xls") {
            "application/vnd.ms-excel"
        } else if lower.ends_with(".ods") {
            "application/vnd.oasis.opendocument.spreadsheet"
        } else if lower.ends_with(".xlsb") {
            "application/vnd.ms-excel.sheet.binary.macroEnabled.12"
        } else {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
    }
}
