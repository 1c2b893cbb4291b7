//! Downloadable bulk-upload template workbook

use anyhow::{Context, Result};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::Path;

use super::decoder::PREFERRED_SHEET;
use crate::api::CanonicalField;

/// File name the bulk form expects users to start from
pub const TEMPLATE_FILE_NAME: &str = "merchant-template.xlsx";

const HEADER_ROW_HEIGHT: f64 = 25.0;
const COLUMN_WIDTHS: [f64; 6] = [15.0, 25.0, 30.0, 20.0, 20.0, 18.0];
const DATE_FORMAT: &str = "yyyy-mm-dd";

const EXAMPLE_ROWS: [[&str; 6]; 2] = [
    [
        "1480000493",
        "John Doe",
        "john.doe@example.com",
        "+2348012345678",
        "CEO",
        "2022-05-15",
    ],
    [
        "1480000789",
        "Jane Smith",
        "jane.smith@example.com",
        "0592345678",
        "Manager",
        "2023-01-20",
    ],
];

/// Build the template workbook in memory
pub fn build_template() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(PREFERRED_SHEET)?;

    write_header(worksheet)?;
    write_examples(worksheet)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    workbook
        .save_to_buffer()
        .context("Failed to build template workbook")
}

/// Build the template and save it to `path`
pub fn write_template(path: &Path) -> Result<()> {
    let bytes = build_template()?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to save template: {}", path.display()))?;
    log::info!("Wrote template to {}", path.display());
    Ok(())
}

fn write_header(ws: &mut Worksheet) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, field) in CanonicalField::ALL.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, field.name(), &bold)?;
    }
    ws.set_row_height(0, HEADER_ROW_HEIGHT)?;
    Ok(())
}

fn write_examples(ws: &mut Worksheet) -> Result<()> {
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let text_format = Format::new().set_num_format("@");
    let date_col = (CanonicalField::ALL.len() - 1) as u16;

    for (idx, values) in EXAMPLE_ROWS.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            ws.write_string(row, col as u16, *value)?;
        }
    }

    // First example carries a real date cell so the decoder's date path is exercised
    let first_date = ExcelDateTime::parse_from_str(EXAMPLE_ROWS[0][5])?;
    ws.write_datetime_with_format(1, date_col, &first_date, &date_format)?;

    // Blank row for the user to fill in
    let blank_row = (EXAMPLE_ROWS.len() + 1) as u32;
    for col in 0..date_col {
        ws.write_blank(blank_row, col, &text_format)?;
    }
    ws.write_blank(blank_row, date_col, &date_format)?;

    Ok(())
}
