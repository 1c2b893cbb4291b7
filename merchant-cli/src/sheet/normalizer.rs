//! Map decoded rows onto the canonical merchant schema

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::decoder::RawRow;
use crate::api::{CanonicalField, MerchantRecord};

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static YEAR_FIRST_SLASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").unwrap());

/// Date-time layouts tried before falling back to date-only layouts
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%B %d, %Y", "%d-%b-%Y"];

/// Build a record from one row. First case-insensitive header match wins;
/// fields without a matching column are left empty.
pub fn normalize_row(row: &RawRow) -> MerchantRecord {
    let mut record = MerchantRecord::default();

    for field in CanonicalField::ALL {
        let value = row
            .iter()
            .find(|(header, _)| field.matches_header(header))
            .map(|(_, value)| value.to_string())
            .unwrap_or_default();

        let value = if field == CanonicalField::IncorporationDate {
            format_date(&value)
        } else {
            value
        };
        record.set(field, value);
    }

    record
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<MerchantRecord> {
    rows.iter().map(normalize_row).collect()
}

/// Best-effort coercion of an incorporation date to `YYYY-MM-DD`.
///
/// Tried in order:
/// 1. already `YYYY-MM-DD`: unchanged
/// 2. a recognizable date or date-time: reformatted
/// 3. three `/`-separated parts: day/month/year when the first part is above 12,
///    month/day/year otherwise (ambiguous when both are 12 or less)
/// 4. anything else: unchanged
pub fn format_date(input: &str) -> String {
    if input.is_empty() || ISO_DATE.is_match(input) {
        return input.to_string();
    }

    if let Some(date) = parse_generic(input.trim()) {
        return date.format("%Y-%m-%d").to_string();
    }

    reorder_slashed(input).unwrap_or_else(|| input.to_string())
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if YEAR_FIRST_SLASHED.is_match(s) {
        return NaiveDate::parse_from_str(s, "%Y/%m/%d").ok();
    }

    None
}

fn reorder_slashed(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }

    let day_first = parts[0].parse::<u32>().is_ok_and(|n| n > 12);
    let (month, day) = if day_first {
        (parts[1], parts[0])
    } else {
        (parts[0], parts[1])
    };

    Some(format!("{}-{:0>2}-{:0>2}", parts[2], month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::decoder::CellValue;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(h, v)| (h.to_string(), CellValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn test_headers_match_regardless_of_case() {
        let record = normalize_row(&row(&[
            ("MERCHANTID", "1480000493"),
            ("ContactPersonName", "John Doe"),
            ("contactpersonemail", "john.doe@example.com"),
            ("CONTACTPERSONPHONE", "+2348012345678"),
            ("contactPersonRelation", "CEO"),
            ("IncorporationDate", "2022-05-15"),
        ]));

        assert_eq!(record.merchant_id, "1480000493");
        assert_eq!(record.contact_person_name, "John Doe");
        assert_eq!(record.contact_person_email, "john.doe@example.com");
        assert_eq!(record.contact_person_phone, "+2348012345678");
        assert_eq!(record.contact_person_relation, "CEO");
        assert_eq!(record.incorporation_date, "2022-05-15");
    }

    #[test]
    fn test_absent_columns_become_empty_strings() {
        let record = normalize_row(&row(&[("Notes", "ignored"), ("Column3", "x")]));
        assert_eq!(record, MerchantRecord::default());

        for field in CanonicalField::ALL {
            assert_eq!(record.get(field), "");
        }
    }

    #[test]
    fn test_first_matching_column_wins() {
        let record = normalize_row(&row(&[
            ("merchantId", "first"),
            ("MerchantID", "second"),
        ]));
        assert_eq!(record.merchant_id, "first");
    }

    #[test]
    fn test_numeric_cells_are_stringified() {
        let raw: RawRow = vec![
            ("merchantId", CellValue::Number(1480000493.0)),
            ("contactPersonPhone", CellValue::Number(592345678.0)),
            ("contactPersonName", CellValue::Empty),
        ]
        .into_iter()
        .collect();

        let record = normalize_row(&raw);
        assert_eq!(record.merchant_id, "1480000493");
        assert_eq!(record.contact_person_phone, "592345678");
        assert_eq!(record.contact_person_name, "");
    }

    #[test]
    fn test_iso_dates_pass_through() {
        assert_eq!(format_date("2023-01-15"), "2023-01-15");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_slashed_dates() {
        assert_eq!(format_date("15/01/2023"), "2023-01-15");
        assert_eq!(format_date("01/15/2023"), "2023-01-15");
        assert_eq!(format_date("1/5/2023"), "2023-01-05");
        // Both parts <= 12: read as month/day/year
        assert_eq!(format_date("03/04/2023"), "2023-03-04");
    }

    #[test]
    fn test_generic_dates_are_reformatted() {
        assert_eq!(format_date("2023-01-15T10:30:00"), "2023-01-15");
        assert_eq!(format_date("2023-01-15 08:00:00"), "2023-01-15");
        assert_eq!(format_date("2023-01-15T23:30:00-05:00"), "2023-01-16");
        assert_eq!(format_date("2023/1/15"), "2023-01-15");
        assert_eq!(format_date("2023-1-5"), "2023-01-05");
        assert_eq!(format_date("15 January 2023"), "2023-01-15");
        assert_eq!(format_date("January 15, 2023"), "2023-01-15");
        assert_eq!(format_date("15-Jan-2023"), "2023-01-15");
    }

    #[test]
    fn test_unrecognized_dates_are_left_alone() {
        assert_eq!(format_date("sometime in 2023"), "sometime in 2023");
        assert_eq!(format_date("15/01"), "15/01");
        assert_eq!(format_date("1/2/3/4"), "1/2/3/4");
    }

    #[test]
    fn test_date_coercion_only_touches_incorporation_date() {
        let record = normalize_row(&row(&[
            ("contactPersonRelation", "15/01/2023"),
            ("incorporationDate", "15/01/2023"),
        ]));
        assert_eq!(record.contact_person_relation, "15/01/2023");
        assert_eq!(record.incorporation_date, "2023-01-15");
    }
}
