//! In-memory workbook model
//!
//! A workbook is read completely before parsing starts. Every cell is already
//! rendered to a string; empty cells are empty strings.

use serde::{Deserialize, Serialize};

/// One named sheet: ordered rows of string cells
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as stored in the workbook
    pub name: String,

    /// Rows in sheet order
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Creates a sheet from a name and rows
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Builds a sheet from string slices, mostly for tests and fixtures
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Returns true if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered collection of sheets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in workbook order
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates a workbook from sheets
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Looks up a sheet by exact name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_from_rows() {
        let sheet = Sheet::from_rows("Study", [vec!["GENERAL"], vec!["Title", "X"]]);
        assert_eq!(sheet.name, "Study");
        assert_eq!(sheet.rows[1], vec!["Title".to_string(), "X".to_string()]);
        assert!(!sheet.is_empty());
    }

    #[test]
    fn test_workbook_lookup() {
        let workbook = Workbook::new(vec![
            Sheet::new("Investigation", vec![]),
            Sheet::new("Study", vec![]),
        ]);
        assert_eq!(workbook.sheet_names(), vec!["Investigation", "Study"]);
        assert!(workbook.sheet("Study").is_some());
        assert!(workbook.sheet("Assay").is_none());
    }
}
