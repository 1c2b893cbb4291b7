//! Outcome dialogs shown after a submission attempt

use std::fmt;

use crate::api::UploadOutcome;
use crate::sheet::{SheetError, TEMPLATE_FILE_NAME};

/// Visual treatment of a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Success,
    Error,
}

/// Optional "do another" action offered after a success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    UploadAnother,
    UpdateAnother,
}

impl FollowUp {
    pub fn label(&self) -> &'static str {
        match self {
            FollowUp::UploadAnother => "Upload Another",
            FollowUp::UpdateAnother => "Update Another",
        }
    }
}

impl fmt::Display for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A modal result: title, message, treatment and an optional follow-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
    pub follow_up: Option<FollowUp>,
}

impl Dialog {
    fn success(title: &str, message: impl Into<String>, follow_up: FollowUp) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            kind: DialogKind::Success,
            follow_up: Some(follow_up),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            kind: DialogKind::Error,
            follow_up: None,
        }
    }

    /// Result of a bulk upload
    pub fn for_bulk(outcome: &UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Success { .. } => Self::success(
                "Upload Successful",
                "Your merchants were successfully updated.",
                FollowUp::UploadAnother,
            ),
            UploadOutcome::Failure { message, .. } => Self::error("Upload Failed", message.clone()),
        }
    }

    /// Result of a single-record update
    pub fn for_single(merchant_id: &str, outcome: &UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Success { .. } => Self::success(
                "Update Successful",
                format!("Merchant {} was successfully updated.", merchant_id),
                FollowUp::UpdateAnother,
            ),
            UploadOutcome::Failure { message, .. } => Self::error("Update Failed", message.clone()),
        }
    }

    /// Spreadsheet that could not be decoded or had no rows
    pub fn for_sheet_error(error: &SheetError) -> Self {
        match error {
            SheetError::Empty(_) => Self::error(
                "Empty File",
                "The Excel file does not contain any data. Please check the file and try again.",
            ),
            SheetError::Unreadable(_) | SheetError::NoSheets => Self::error(
                "Invalid File",
                format!(
                    "The Excel file format is invalid. Please use the provided {} file.",
                    TEMPLATE_FILE_NAME
                ),
            ),
        }
    }

    pub fn missing_file() -> Self {
        Self::error("Missing File", "Please select an Excel file before uploading.")
    }

    pub fn in_progress() -> Self {
        Self::error(
            "Upload In Progress",
            "A submission is already in progress. Please wait for it to finish.",
        )
    }

    pub fn unexpected() -> Self {
        Self::error(
            "Error",
            "An unexpected error occurred. Please try again later.",
        )
    }

    pub fn is_success(&self) -> bool {
        self.kind == DialogKind::Success
    }

    /// Label of the button that closes the dialog
    pub fn dismiss_label(&self) -> &'static str {
        match (self.kind, self.follow_up) {
            (DialogKind::Success, Some(_)) => "Close",
            (DialogKind::Success, None) => "Continue",
            (DialogKind::Error, _) => "Try Again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> UploadOutcome {
        UploadOutcome::Failure {
            message: message.to_string(),
            status_code: Some(400),
            errors: Vec::new(),
        }
    }

    fn success() -> UploadOutcome {
        UploadOutcome::Success {
            status_code: Some(200),
            payload: None,
        }
    }

    #[test]
    fn test_bulk_dialogs() {
        let ok = Dialog::for_bulk(&success());
        assert_eq!(ok.title, "Upload Successful");
        assert_eq!(ok.follow_up, Some(FollowUp::UploadAnother));
        assert_eq!(ok.dismiss_label(), "Close");

        let failed = Dialog::for_bulk(&failure("Row 2: bad id"));
        assert_eq!(failed.title, "Upload Failed");
        assert_eq!(failed.message, "Row 2: bad id");
        assert_eq!(failed.kind, DialogKind::Error);
        assert_eq!(failed.dismiss_label(), "Try Again");
    }

    #[test]
    fn test_single_dialogs_name_the_merchant() {
        let ok = Dialog::for_single("1480000493", &success());
        assert_eq!(ok.title, "Update Successful");
        assert_eq!(ok.message, "Merchant 1480000493 was successfully updated.");
        assert_eq!(ok.follow_up, Some(FollowUp::UpdateAnother));

        let failed = Dialog::for_single("1480000493", &failure("Merchant not found"));
        assert_eq!(failed.title, "Update Failed");
        assert_eq!(failed.message, "Merchant not found");
    }

    #[test]
    fn test_sheet_error_dialogs() {
        let empty = Dialog::for_sheet_error(&SheetError::Empty("MerchantData".to_string()));
        assert_eq!(empty.title, "Empty File");

        let invalid = Dialog::for_sheet_error(&SheetError::Unreadable("zip".to_string()));
        assert_eq!(invalid.title, "Invalid File");
        assert!(invalid.message.contains("merchant-template.xlsx"));
    }

    #[test]
    fn test_success_without_follow_up_continues() {
        let mut dialog = Dialog::for_bulk(&success());
        dialog.follow_up = None;
        assert_eq!(dialog.dismiss_label(), "Continue");
    }
}
