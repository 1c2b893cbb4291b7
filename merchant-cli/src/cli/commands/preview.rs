//! `preview` command: show normalized rows without uploading

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use super::upload::read_upload_file;
use crate::api::MerchantRecord;
use crate::cli::OutputFormat;
use crate::cli::output::print_dialog;
use crate::forms::Dialog;
use crate::sheet::{self, preview};

/// Handle the preview command. Returns false when the file could not be decoded.
pub fn handle_preview_command(path: &Path, rows: usize, format: OutputFormat) -> Result<bool> {
    let file = read_upload_file(path)?;

    let decoded = match sheet::decode_workbook(&file.bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("Preview of {} failed: {}", file.file_name, e);
            print_dialog(&Dialog::for_sheet_error(&e));
            return Ok(false);
        }
    };

    let records = sheet::normalize_rows(&decoded.rows);
    let sample = preview::sample(&records, rows);

    let formatted = format_output(sample, format)?;
    if format == OutputFormat::Table {
        println!(
            "Sheet: {}",
            decoded.sheet_name.bright_green()
        );
        println!("{}", formatted);
        println!("{}", preview::footer(sample.len(), records.len()).dimmed());
    } else {
        print!("{}", formatted);
    }

    Ok(true)
}

/// Format preview rows according to the requested output format
fn format_output(records: &[MerchantRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(preview::render_table(records)),
        OutputFormat::Json => preview::render_json(records)
            .map(|json| json + "\n")
            .context("Failed to format JSON output"),
        OutputFormat::Csv => preview::render_csv(records),
    }
}
