//! Table serialization
//!
//! Writes a [`MetadataTable`] as comma-separated text or as an xlsx
//! workbook. Column and row order are kept exactly; missing cells are empty
//! strings in CSV and blank cells in xlsx.

use super::flatten::{Cell, MetadataTable};
use crate::domain::{IsaLinkError, Result};
use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::str::FromStr;

/// Name of the single worksheet in xlsx output
pub const XLSX_SHEET_NAME: &str = "Metadata";

const XLSX_MAX_ROWS: usize = 1_048_576;
const XLSX_MAX_COLUMNS: usize = 16_384;
/// Longest string an xlsx cell holds, in characters
pub const XLSX_MAX_STRING_LEN: usize = 32_767;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    /// Single worksheet; cell text is limited to [`XLSX_MAX_STRING_LEN`]
    /// characters
    Xlsx,
}

impl TableFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        }
    }

    /// Content type of the uploaded artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            TableFormat::Csv => "text/csv",
            TableFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Descriptive label of the uploaded artifact
    pub fn description(&self) -> String {
        format!(
            "Exported image metadata as {}",
            self.extension().to_uppercase()
        )
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TableFormat {
    type Err = IsaLinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "excel" => Ok(TableFormat::Xlsx),
            other => Err(IsaLinkError::Validation(format!(
                "Invalid export format '{other}'. Must be one of: csv, xlsx"
            ))),
        }
    }
}

/// Serializes tables in one format
#[derive(Debug, Clone, Copy, Default)]
pub struct TableSerializer {
    format: TableFormat,
}

impl TableSerializer {
    /// Create a serializer for `format`
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    /// Selected format
    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Serialize a table to bytes
    ///
    /// # Errors
    ///
    /// Returns [`IsaLinkError::Serialization`] if the table cannot be encoded,
    /// including tables larger than an xlsx worksheet and values longer than
    /// an xlsx cell holds.
    pub fn serialize(&self, table: &MetadataTable) -> Result<Vec<u8>> {
        let bytes = match self.format {
            TableFormat::Csv => to_csv(table)?,
            TableFormat::Xlsx => to_xlsx(table)?,
        };
        tracing::debug!(
            format = %self.format,
            rows = table.len(),
            columns = table.columns().len(),
            bytes = bytes.len(),
            "Serialized metadata table"
        );
        Ok(bytes)
    }
}

fn to_csv(table: &MetadataTable) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(Cell::to_string))?;
    }

    wtr.into_inner()
        .map_err(|e| IsaLinkError::Serialization(format!("Failed to finish CSV: {e}")))
}

fn to_xlsx(table: &MetadataTable) -> Result<Vec<u8>> {
    if table.columns().len() > XLSX_MAX_COLUMNS || table.len() + 1 > XLSX_MAX_ROWS {
        return Err(IsaLinkError::Serialization(format!(
            "Table of {} rows and {} columns does not fit in a worksheet",
            table.len(),
            table.columns().len()
        )));
    }

    check_text_lengths(table)?;

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet().set_name(XLSX_SHEET_NAME)?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row_num, col, text)?;
                }
                Cell::Integer(value) => {
                    worksheet.write_number(row_num, col, *value as f64)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn check_text_lengths(table: &MetadataTable) -> Result<()> {
    for row in table.rows() {
        for (name, cell) in table.columns().iter().zip(row) {
            if let Cell::Text(text) = cell {
                let len = text.chars().count();
                if len > XLSX_MAX_STRING_LEN {
                    let image = row.first().map(Cell::to_string).unwrap_or_default();
                    return Err(IsaLinkError::Serialization(format!(
                        "Value of '{name}' on image '{image}' has {len} characters; \
                         xlsx cells hold at most {XLSX_MAX_STRING_LEN}"
                    )));
                }
            }
        }
    }
    Ok(())
}
