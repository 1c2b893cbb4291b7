//! Decode uploaded spreadsheet bytes into header-keyed rows
//!
//! Sheet selection:
//! - a sheet named "MerchantData" wins wherever it sits in the workbook
//! - otherwise the first sheet
//!
//! Row 0 holds the headers. A missing header cell at absolute column `i`
//! becomes `Column{i}`. Body rows start at row 1; rows with no values are skipped.

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;
use std::io::Cursor;

/// Sheet name written by the template and preferred on upload
pub const PREFERRED_SHEET: &str = "MerchantData";

const HEADER_ROW: u32 = 0;
const FIRST_BODY_ROW: u32 = 1;

/// Why a spreadsheet could not be turned into rows
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("the file could not be read as a spreadsheet: {0}")]
    Unreadable(String),

    #[error("the workbook contains no sheets")]
    NoSheets,

    #[error("sheet '{0}' contains no data rows")]
    Empty(String),
}

/// A single decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            // Whole numbers print without a fractional part so ids survive intact
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One body row: `(header, value)` pairs in sheet column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

impl<H: Into<String>> FromIterator<(H, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (H, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(h, v)| (h.into(), v)).collect(),
        }
    }
}

/// Result of decoding the selected sheet
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Decode an uploaded workbook (xlsx, xls, xlsb or ods, sniffed from the bytes)
pub fn decode_workbook(bytes: &[u8]) -> Result<DecodedSheet, SheetError> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = select_sheet(&sheet_names)
        .ok_or(SheetError::NoSheets)?
        .to_string();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Unreadable(format!("sheet '{}': {}", sheet_name, e)))?;

    let (headers, rows) = extract_rows(&range);
    log::debug!(
        "Decoded sheet '{}' with headers {:?} and {} data rows",
        sheet_name,
        headers,
        rows.len()
    );

    if rows.is_empty() {
        return Err(SheetError::Empty(sheet_name));
    }

    Ok(DecodedSheet {
        sheet_name,
        headers,
        rows,
    })
}

/// Prefer the template sheet, else the first one
fn select_sheet(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|name| name.as_str() == PREFERRED_SHEET)
        .or_else(|| names.first())
        .map(String::as_str)
}

fn extract_rows(range: &Range<Data>) -> (Vec<String>, Vec<RawRow>) {
    let (Some((_, first_col)), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return (Vec::new(), Vec::new());
    };

    let headers: Vec<String> = (first_col..=last_col)
        .map(|col| {
            let value = range
                .get_value((HEADER_ROW, col))
                .map(cell_to_value)
                .unwrap_or(CellValue::Empty);
            if value.is_empty() {
                format!("Column{}", col)
            } else {
                value.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for row in FIRST_BODY_ROW..=last_row {
        let raw: RawRow = (first_col..=last_col)
            .zip(headers.iter())
            .map(|(col, header)| {
                let value = range
                    .get_value((row, col))
                    .map(cell_to_value)
                    .unwrap_or(CellValue::Empty);
                (header.clone(), value)
            })
            .collect();

        if !raw.is_blank() {
            rows.push(raw);
        }
    }

    (headers, rows)
}

/// Convert a calamine cell to a decoded value
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if !dt.is_duration() => CellValue::Text(format_datetime(ndt)),
            _ => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, XlsxError};

    fn workbook_bytes<F>(build: F) -> Vec<u8>
    where
        F: FnOnce(&mut Workbook) -> Result<(), XlsxError>,
    {
        let mut workbook = Workbook::new();
        build(&mut workbook).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_prefers_merchant_data_sheet() {
        let bytes = workbook_bytes(|wb| {
            let notes = wb.add_worksheet();
            notes.set_name("Instructions")?;
            notes.write_string(0, 0, "readme")?;
            notes.write_string(1, 0, "fill in the MerchantData sheet")?;

            let data = wb.add_worksheet();
            data.set_name(PREFERRED_SHEET)?;
            data.write_string(0, 0, "merchantId")?;
            data.write_string(1, 0, "1480000493")?;
            Ok(())
        });

        let decoded = decode_workbook(&bytes).unwrap();
        assert_eq!(decoded.sheet_name, PREFERRED_SHEET);
        assert_eq!(decoded.headers, vec!["merchantId"]);
        assert_eq!(decoded.rows.len(), 1);
    }

    #[test]
    fn test_falls_back_to_first_sheet() {
        let bytes = workbook_bytes(|wb| {
            let first = wb.add_worksheet();
            first.set_name("Merchants")?;
            first.write_string(0, 0, "merchantId")?;
            first.write_number(1, 0, 1480000789.0)?;

            let second = wb.add_worksheet();
            second.set_name("Archive")?;
            second.write_string(0, 0, "merchantId")?;
            second.write_string(1, 0, "ignored")?;
            Ok(())
        });

        let decoded = decode_workbook(&bytes).unwrap();
        assert_eq!(decoded.sheet_name, "Merchants");
        let cells: Vec<_> = decoded.rows[0].iter().collect();
        assert_eq!(cells, vec![("merchantId", &CellValue::Number(1480000789.0))]);
    }

    #[test]
    fn test_missing_header_cell_gets_synthetic_name() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "merchantId")?;
            ws.write_string(0, 2, "contactPersonName")?;
            ws.write_string(1, 0, "1480000493")?;
            ws.write_string(1, 1, "orphan")?;
            ws.write_string(1, 2, "John Doe")?;
            Ok(())
        });

        let decoded = decode_workbook(&bytes).unwrap();
        assert_eq!(
            decoded.headers,
            vec!["merchantId", "Column1", "contactPersonName"]
        );

        let expected: RawRow = vec![
            ("merchantId", text("1480000493")),
            ("Column1", text("orphan")),
            ("contactPersonName", text("John Doe")),
        ]
        .into_iter()
        .collect();
        assert_eq!(decoded.rows[0], expected);
    }

    #[test]
    fn test_blank_rows_are_skipped_and_short_rows_padded() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "merchantId")?;
            ws.write_string(0, 1, "contactPersonPhone")?;
            ws.write_string(1, 0, "1")?;
            ws.write_string(3, 0, "2")?;
            ws.write_string(3, 1, "0592345678")?;
            Ok(())
        });

        let decoded = decode_workbook(&bytes).unwrap();
        assert_eq!(decoded.rows.len(), 2);

        let first: Vec<_> = decoded.rows[0].iter().collect();
        assert_eq!(first[1], ("contactPersonPhone", &CellValue::Empty));
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.set_name(PREFERRED_SHEET)?;
            ws.write_string(0, 0, "merchantId")?;
            ws.write_string(0, 1, "contactPersonName")?;
            Ok(())
        });

        match decode_workbook(&bytes) {
            Err(SheetError::Empty(name)) => assert_eq!(name, PREFERRED_SHEET),
            other => panic!("expected empty sheet error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_workbook_is_empty() {
        let bytes = workbook_bytes(|wb| {
            wb.add_worksheet();
            Ok(())
        });
        assert!(matches!(decode_workbook(&bytes), Err(SheetError::Empty(_))));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let result = decode_workbook(b"merchantId,contactPersonName\n1,John\n");
        assert!(matches!(result, Err(SheetError::Unreadable(_))));

        assert!(matches!(decode_workbook(&[]), Err(SheetError::Unreadable(_))));
    }

    #[test]
    fn test_select_sheet() {
        let names = vec!["A".to_string(), "MerchantData".to_string()];
        assert_eq!(select_sheet(&names), Some("MerchantData"));

        let names = vec!["merchantdata".to_string(), "B".to_string()];
        assert_eq!(select_sheet(&names), Some("merchantdata"));

        assert_eq!(select_sheet(&[]), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(1480000493.0).to_string(), "1480000493");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert!(text("   ").is_empty());
    }
}
