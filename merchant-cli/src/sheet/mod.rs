//! Spreadsheet pipeline: decode, normalize, preview and the upload template

pub mod decoder;
pub mod normalizer;
pub mod preview;
pub mod template;

pub use decoder::{SheetError, decode_workbook};
pub use normalizer::{format_date, normalize_rows};
pub use template::{TEMPLATE_FILE_NAME, write_template};
