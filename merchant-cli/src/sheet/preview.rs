//! Sample rendering of normalized rows before an upload

use anyhow::{Context, Result};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::{CanonicalField, MerchantRecord};

/// Cells wider than this are cut and end in an ellipsis
const MAX_CELL_WIDTH: usize = 30;
const ELLIPSIS: char = '…';

/// First `limit` records
pub fn sample(records: &[MerchantRecord], limit: usize) -> &[MerchantRecord] {
    &records[..records.len().min(limit)]
}

/// Fixed-width text table with the preview column labels
pub fn render_table(records: &[MerchantRecord]) -> String {
    let labels: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.label()).collect();
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            CanonicalField::ALL
                .iter()
                .map(|field| truncate(record.get(*field), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(label.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &labels, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

/// Note shown under a preview
pub fn footer(shown: usize, total: usize) -> String {
    if shown < total {
        format!(
            "Showing the first {} of {} rows of your data. Verify it looks correct before uploading.",
            shown, total
        )
    } else {
        format!(
            "Showing all {} rows of your data. Verify it looks correct before uploading.",
            total
        )
    }
}

pub fn render_json(records: &[MerchantRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to format JSON preview")
}

pub fn render_csv(records: &[MerchantRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        let headers: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.name()).collect();
        writer.write_record(&headers)?;
    }
    for record in records {
        writer
            .serialize(record)
            .context("Failed to write CSV preview row")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV preview")?;
    String::from_utf8(bytes).context("CSV preview is not valid UTF-8")
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            format!("{}{}", cell, " ".repeat(width.saturating_sub(cell.width())))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Cut `s` to at most `max` display columns, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> MerchantRecord {
        MerchantRecord {
            merchant_id: id.to_string(),
            contact_person_name: name.to_string(),
            contact_person_email: format!("{}@example.com", id),
            incorporation_date: "2023-01-15".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sample_limits_rows() {
        let records: Vec<_> = (0..8).map(|i| record(&i.to_string(), "x")).collect();
        assert_eq!(sample(&records, 5).len(), 5);
        assert_eq!(sample(&records[..3], 5).len(), 3);
    }

    #[test]
    fn test_table_uses_labels_and_aligns() {
        let table = render_table(&[record("1480000493", "John Doe")]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Merchant ID | Contact Name | Email"));
        assert!(lines[0].ends_with("Incorporation Date"));
        assert!(lines[2].starts_with("1480000493  | John Doe     |"));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let long = "A".repeat(50);
        let cut = truncate(&long, MAX_CELL_WIDTH);
        assert_eq!(cut.width(), MAX_CELL_WIDTH);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(truncate("short", MAX_CELL_WIDTH), "short");
    }

    #[test]
    fn test_footer_wording() {
        assert_eq!(
            footer(5, 12),
            "Showing the first 5 of 12 rows of your data. Verify it looks correct before uploading."
        );
        assert!(footer(2, 2).starts_with("Showing all 2 rows"));
    }

    #[test]
    fn test_csv_uses_canonical_headers() {
        let csv = render_csv(&[record("1", "Jane Smith")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("merchantId,contactPersonName,contactPersonEmail,contactPersonPhone,contactPersonRelation,incorporationDate")
        );
        assert_eq!(lines.next(), Some("1,Jane Smith,1@example.com,,,2023-01-15"));

        let empty = render_csv(&[]).unwrap();
        assert!(empty.starts_with("merchantId,"));
    }

    #[test]
    fn test_json_preview() {
        let json = render_json(&[record("1", "Jane Smith")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["merchantId"], "1");
        assert_eq!(parsed[0]["contactPersonPhone"], "");
    }
}
