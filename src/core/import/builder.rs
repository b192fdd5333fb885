//! Folds classified rows into a [`MetadataRecord`]
//!
//! A header opens (or reopens) the namespace `<prefix>:<SHEET>:<HEADER>`.
//! Data rows set attributes in the open namespace. A header that appears a
//! second time merges into the same namespace; keys are last-write-wins.

use super::parser::{RowEvent, SheetParser};
use crate::domain::{namespace_key, MetadataRecord, Workbook, DEFAULT_NAMESPACE_PREFIX};

/// Default separator between positional values
pub const DEFAULT_VALUE_SEPARATOR: &str = ", ";

/// Accumulates namespaces across all sheets of a workbook
#[derive(Debug)]
pub struct NamespaceBuilder {
    prefix: String,
    separator: String,
    record: MetadataRecord,
    active: Option<String>,
}

impl Default for NamespaceBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE_PREFIX, DEFAULT_VALUE_SEPARATOR)
    }
}

impl NamespaceBuilder {
    /// Creates a builder with a namespace prefix and value separator
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            record: MetadataRecord::new(),
            active: None,
        }
    }

    /// Applies the events of one sheet
    pub fn consume_sheet<I>(&mut self, sheet_name: &str, events: I)
    where
        I: IntoIterator<Item = RowEvent>,
    {
        self.active = None;
        for event in events {
            match event {
                RowEvent::Header(header) => {
                    let namespace = namespace_key(&self.prefix, sheet_name, &header);
                    self.record.namespace_mut(&namespace);
                    self.active = Some(namespace);
                }
                RowEvent::DataRow { key, values } => {
                    // The parser never emits data rows outside a section
                    if let Some(namespace) = &self.active {
                        self.record
                            .set(namespace, key, values.join(&self.separator));
                    }
                }
            }
        }
    }

    /// Parses every sheet of a workbook and applies the events
    pub fn consume_workbook(&mut self, workbook: &Workbook) {
        let mut parser = SheetParser::new();
        for sheet in &workbook.sheets {
            let events = parser.parse_sheet(sheet);
            self.consume_sheet(&sheet.name, events);
        }
    }

    /// Returns the finished record
    pub fn finish(self) -> MetadataRecord {
        self.record
    }
}

/// Builds the metadata record for a whole workbook with default settings
///
/// # Examples
///
/// ```
/// use isalink::core::import::builder::build_record;
/// use isalink::domain::{Sheet, Workbook};
///
/// let workbook = Workbook::new(vec![Sheet::from_rows(
///     "STUDY",
///     [vec!["GENERAL"], vec!["Title", "X"]],
/// )]);
/// let record = build_record(&workbook);
/// assert_eq!(record.get("ARC:ISA:STUDY:GENERAL").unwrap()["Title"], "X");
/// ```
pub fn build_record(workbook: &Workbook) -> MetadataRecord {
    let mut builder = NamespaceBuilder::default();
    builder.consume_workbook(workbook);
    builder.finish()
}
