//! Row classification for ISA-style sheets
//!
//! A sheet is a sequence of sections. A row whose first cell is upper-case
//! text opens a section; rows below it are `key, value, value, ...` lines
//! belonging to that section until the next header.

use crate::domain::Sheet;

/// One classified row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// Section header; carries the trimmed first cell
    Header(String),

    /// Attribute line inside an open section
    DataRow {
        /// Trimmed first cell, never empty
        key: String,
        /// Remaining cells, each trimmed, positions preserved
        values: Vec<String>,
    },
}

/// Returns true when a trimmed first cell opens a new section
///
/// The text needs at least one upper-case character and no lower-case one, so
/// `"INVESTIGATION CONTACTS"` and `"STUDY 1"` qualify while `"123"`, `"!!"`
/// and `"Title"` do not.
///
/// # Examples
///
/// ```
/// use isalink::core::import::parser::is_section_header;
///
/// assert!(is_section_header("GENERAL"));
/// assert!(!is_section_header("123"));
/// assert!(!is_section_header("Title"));
/// ```
pub fn is_section_header(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// Per-sheet row classifier
///
/// Holds the "current section" cursor for one sheet. A fresh parser (or
/// [`SheetParser::reset`]) starts with no section open, so rows above the
/// first header are dropped.
#[derive(Debug, Default)]
pub struct SheetParser {
    current_section: Option<String>,
}

impl SheetParser {
    /// Creates a parser with no section open
    pub fn new() -> Self {
        Self::default()
    }

    /// Header text of the section currently open, if any
    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    /// Closes any open section
    pub fn reset(&mut self) {
        self.current_section = None;
    }

    /// Classifies one row
    ///
    /// Returns `None` for rows that contribute nothing: rows before the first
    /// header and rows whose first cell is empty.
    pub fn classify(&mut self, row: &[String]) -> Option<RowEvent> {
        let first = row.first().map(|c| c.trim()).unwrap_or_default();

        if is_section_header(first) {
            self.current_section = Some(first.to_string());
            return Some(RowEvent::Header(first.to_string()));
        }

        if self.current_section.is_none() || first.is_empty() {
            return None;
        }

        let values = row
            .iter()
            .skip(1)
            .map(|cell| cell.trim().to_string())
            .collect();

        Some(RowEvent::DataRow {
            key: first.to_string(),
            values,
        })
    }

    /// Classifies every row of a sheet
    ///
    /// The parser is reset first; section state never carries over from a
    /// previous sheet.
    pub fn parse_sheet(&mut self, sheet: &Sheet) -> Vec<RowEvent> {
        self.reset();
        let events: Vec<RowEvent> = sheet
            .rows
            .iter()
            .filter_map(|row| self.classify(row))
            .collect();

        tracing::debug!(
            sheet = %sheet.name,
            rows = sheet.rows.len(),
            events = events.len(),
            "Classified sheet rows"
        );

        events
    }
}
