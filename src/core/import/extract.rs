//! Whole-file metadata extraction
//!
//! Wraps workbook reading and namespace building. A file that cannot be read
//! never aborts the caller: the failure is logged and reported as
//! [`Extraction::Failed`], which callers treat as "no metadata".

use super::builder::{NamespaceBuilder, DEFAULT_VALUE_SEPARATOR};
use super::workbook::read_workbook;
use crate::config::ImportConfig;
use crate::domain::{MetadataRecord, Workbook, DEFAULT_NAMESPACE_PREFIX};

/// Settings that shape the namespace record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    /// Prefix of every namespace key
    pub namespace_prefix: String,

    /// Separator between positional values
    pub value_separator: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            namespace_prefix: DEFAULT_NAMESPACE_PREFIX.to_string(),
            value_separator: DEFAULT_VALUE_SEPARATOR.to_string(),
        }
    }
}

impl From<&ImportConfig> for ExtractionSettings {
    fn from(config: &ImportConfig) -> Self {
        Self {
            namespace_prefix: config.namespace_prefix.clone(),
            value_separator: config.value_separator.clone(),
        }
    }
}

/// Outcome of extracting metadata from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// At least one namespace was found
    Extracted(MetadataRecord),

    /// The workbook was readable but has no section headers
    Empty,

    /// The workbook could not be read; carries the reason
    Failed(String),
}

impl Extraction {
    /// Returns the record when something was extracted
    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Extraction::Extracted(record) => Some(record),
            _ => None,
        }
    }

    /// True unless a record was extracted
    pub fn is_empty(&self) -> bool {
        !matches!(self, Extraction::Extracted(_))
    }
}

/// Builds the record for an already-read workbook
pub fn extract_from_workbook(workbook: &Workbook, settings: &ExtractionSettings) -> Extraction {
    let mut builder = NamespaceBuilder::new(
        settings.namespace_prefix.as_str(),
        settings.value_separator.as_str(),
    );
    builder.consume_workbook(workbook);
    let record = builder.finish();

    if record.is_empty() {
        Extraction::Empty
    } else {
        tracing::info!(
            sheets = workbook.sheets.len(),
            namespaces = record.len(),
            attributes = record.attribute_count(),
            "Extracted metadata"
        );
        Extraction::Extracted(record)
    }
}

/// Extracts the namespace record from workbook bytes
///
/// # Examples
///
/// ```
/// use isalink::core::import::extract::{extract_metadata, Extraction, ExtractionSettings};
///
/// let outcome = extract_metadata(b"not a workbook", &ExtractionSettings::default());
/// assert!(matches!(outcome, Extraction::Failed(_)));
/// ```
pub fn extract_metadata(bytes: &[u8], settings: &ExtractionSettings) -> Extraction {
    match read_workbook(bytes) {
        Ok(workbook) => extract_from_workbook(&workbook, settings),
        Err(e) => {
            tracing::error!(error = %e, size = bytes.len(), "Error reading workbook");
            Extraction::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sheet;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    #[test]
    fn test_extract_from_workbook_empty_when_no_headers() {
        let workbook = Workbook::new(vec![Sheet::from_rows(
            "Study",
            [vec!["Title", "X"], vec!["123", "Y"]],
        )]);
        let outcome = extract_from_workbook(&workbook, &ExtractionSettings::default());
        assert_eq!(outcome, Extraction::Empty);
        assert!(outcome.is_empty());
        assert!(outcome.record().is_none());
    }

    #[test]
    fn test_extract_metadata_from_xlsx_bytes() {
        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Assay").unwrap();
        sheet.write_string(0, 0, "MEASUREMENT").unwrap();
        sheet.write_string(1, 0, "Type").unwrap();
        sheet.write_string(1, 1, "imaging").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let outcome = extract_metadata(&bytes, &ExtractionSettings::default());
        let record = outcome.record().expect("record extracted");
        assert_eq!(
            record.get("ARC:ISA:ASSAY:MEASUREMENT").unwrap()["Type"],
            "imaging"
        );
    }

    #[test]
    fn test_extract_metadata_unreadable_bytes_fail_softly() {
        let outcome = extract_metadata(&[0u8; 16], &ExtractionSettings::default());
        match outcome {
            Extraction::Failed(reason) => assert!(reason.contains("Unreadable workbook")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
