//! Bulk upload form: select a spreadsheet, preview it, post it

use log::{debug, info, warn};
use std::sync::Arc;

use super::dialog::Dialog;
use super::guard::{SubmitControl, SubmitGuard};
use crate::api::{MerchantApi, MerchantRecord, UploadFile};
use crate::sheet::{self, TEMPLATE_FILE_NAME};

/// A decoded file waiting to be submitted
#[derive(Debug, Clone)]
struct Selection {
    file: UploadFile,
    records: Vec<MerchantRecord>,
}

pub struct BulkUploadForm<A: MerchantApi> {
    api: Arc<A>,
    guard: SubmitGuard,
    preview_rows: usize,
    selection: Option<Selection>,
}

/// True when the file carries the template's name
fn uses_template_name(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == TEMPLATE_FILE_NAME)
}

impl<A: MerchantApi> BulkUploadForm<A> {
    pub fn new(api: Arc<A>, preview_rows: usize) -> Self {
        Self {
            api,
            guard: SubmitGuard::new(),
            preview_rows,
            selection: None,
        }
    }

    /// Decode and normalize `file`, keeping it for submission.
    ///
    /// Returns the preview rows, or the Invalid/Empty File dialog after resetting.
    pub fn select_file(&mut self, file: UploadFile) -> Result<&[MerchantRecord], Dialog> {
        self.reset();

        if !uses_template_name(&file.file_name) {
            warn!(
                "For best results, use the provided {} file",
                TEMPLATE_FILE_NAME
            );
        }

        let decoded = match sheet::decode_workbook(&file.bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Rejected {}: {}", file.file_name, e);
                return Err(Dialog::for_sheet_error(&e));
            }
        };

        let records = sheet::normalize_rows(&decoded.rows);
        info!(
            "Selected {} with {} row(s) from sheet '{}'",
            file.file_name,
            records.len(),
            decoded.sheet_name
        );

        let selection = self.selection.insert(Selection { file, records });
        Ok(sheet::preview::sample(&selection.records, self.preview_rows))
    }

    /// Post the selected file's original bytes. A success clears the selection.
    ///
    /// The submit permit is released when this returns.
    pub async fn submit(&mut self) -> Dialog {
        let Some(_permit) = self.guard.try_begin() else {
            return Dialog::in_progress();
        };
        let Some(selection) = &self.selection else {
            return Dialog::missing_file();
        };
        if selection.records.is_empty() {
            self.reset();
            return Dialog::for_sheet_error(&sheet::SheetError::Empty(String::new()));
        }

        let outcome = self.api.update_multiple(&selection.file).await;
        let dialog = Dialog::for_bulk(&outcome);
        if outcome.is_success() {
            self.reset();
        }
        dialog
    }

    pub fn reset(&mut self) {
        self.selection = None;
    }

    pub fn preview(&self) -> &[MerchantRecord] {
        match &self.selection {
            Some(selection) => sheet::preview::sample(&selection.records, self.preview_rows),
            None => &[],
        }
    }

    /// Number of normalized rows in the selected file
    pub fn row_count(&self) -> usize {
        self.selection.as_ref().map_or(0, |s| s.records.len())
    }

    pub fn control(&self) -> SubmitControl {
        self.guard.control()
    }
}
