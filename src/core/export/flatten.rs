//! Table flattening
//!
//! Turns collected image attributes into one rectangular table: the fixed
//! geometry columns first, then the union of all annotation keys in
//! first-seen order.

use super::collector::EntityAttributes;
use indexmap::IndexSet;
use std::fmt;

/// Fixed leading columns, in order
pub const FIXED_COLUMNS: [&str; 6] = [
    "ImageName",
    "PixelSizeX",
    "PixelSizeY",
    "PixelSizeZ",
    "Channels",
    "TimeAxis",
];

/// One table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Image name or annotation value
    Text(String),
    /// Geometry value, written as a number in xlsx
    Integer(i64),
    /// Key the image does not carry
    Empty,
}

impl Cell {
    /// True for a missing value
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Empty => Ok(()),
        }
    }
}

/// A flattened export table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl MetadataTable {
    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in input order; every row has one cell per column
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let column = self.column_index(name)?;
        self.rows.get(row)?.get(column)
    }
}

/// Builds a [`MetadataTable`] from collected attributes
#[derive(Debug, Default, Clone, Copy)]
pub struct TableFlattener;

impl TableFlattener {
    /// Create a flattener
    pub fn new() -> Self {
        Self
    }

    /// Flatten a batch into a table
    ///
    /// Produces exactly one row per entity, in input order. A key that
    /// matches a fixed column name replaces that cell with the annotation
    /// text instead of adding a column.
    ///
    /// # Examples
    ///
    /// ```
    /// use isalink::core::export::collector::AttributeCollector;
    /// use isalink::core::export::flatten::TableFlattener;
    /// use isalink::domain::{ImageRecord, RasterSize};
    ///
    /// let images = vec![ImageRecord::new(1, "a.tif", RasterSize::new(64, 64, 1, 1, 1))
    ///     .with_key_values([("dye", "GFP")])];
    /// let table = TableFlattener::new().flatten(&AttributeCollector::new().collect(&images));
    /// assert_eq!(table.columns().len(), 7);
    /// ```
    pub fn flatten(&self, entities: &[EntityAttributes]) -> MetadataTable {
        let mut columns: IndexSet<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for entity in entities {
            for key in entity.key_values.keys() {
                columns.insert(key.clone());
            }
        }

        let rows = entities
            .iter()
            .map(|entity| {
                let mut row = vec![
                    Cell::Text(entity.name.clone()),
                    Cell::Integer(i64::from(entity.size.x)),
                    Cell::Integer(i64::from(entity.size.y)),
                    Cell::Integer(i64::from(entity.size.z)),
                    Cell::Integer(i64::from(entity.size.c)),
                    Cell::Integer(i64::from(entity.size.t)),
                ];
                row.resize(columns.len(), Cell::Empty);
                for (key, value) in &entity.key_values {
                    if let Some(index) = columns.get_index_of(key.as_str()) {
                        row[index] = Cell::Text(value.clone());
                    }
                }
                row
            })
            .collect();

        MetadataTable {
            columns: columns.into_iter().collect(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::collector::AttributeCollector;
    use crate::domain::{ImageRecord, RasterSize};
    use pretty_assertions::assert_eq;

    fn flatten(images: &[ImageRecord]) -> MetadataTable {
        TableFlattener::new().flatten(&AttributeCollector::new().collect(images))
    }

    fn size() -> RasterSize {
        RasterSize::new(512, 256, 3, 2, 10)
    }

    #[test]
    fn test_missing_keys_leave_empty_cells() {
        let table = flatten(&[
            ImageRecord::new(1, "A", size()).with_key_values([("dye", "GFP")]),
            ImageRecord::new(2, "B", size()),
        ]);

        assert_eq!(table.len(), 2);
        let mut expected: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        expected.push("dye".to_string());
        assert_eq!(table.columns(), expected.as_slice());
        assert_eq!(table.cell(0, "dye"), Some(&Cell::Text("GFP".to_string())));
        assert_eq!(table.cell(1, "dye"), Some(&Cell::Empty));
    }

    #[test]
    fn test_fixed_columns_are_typed() {
        let table = flatten(&[ImageRecord::new(1, "A", size())]);
        assert_eq!(table.rows()[0], vec![
            Cell::Text("A".to_string()),
            Cell::Integer(512),
            Cell::Integer(256),
            Cell::Integer(3),
            Cell::Integer(2),
            Cell::Integer(10),
        ]);
    }

    #[test]
    fn test_variable_columns_in_first_seen_order() {
        let table = flatten(&[
            ImageRecord::new(1, "A", size()).with_key_values([("stage", "G1"), ("dye", "GFP")]),
            ImageRecord::new(2, "B", size()).with_key_values([("objective", "60x"), ("dye", "RFP")]),
        ]);
        assert_eq!(&table.columns()[6..], &["stage", "dye", "objective"]);
        assert_eq!(table.cell(1, "stage"), Some(&Cell::Empty));
        assert_eq!(table.cell(1, "dye"), Some(&Cell::Text("RFP".to_string())));
    }

    #[test]
    fn test_key_matching_fixed_column_overwrites_cell() {
        let table = flatten(&[
            ImageRecord::new(1, "A", size()).with_key_values([("Channels", "DAPI+GFP")]),
        ]);
        assert_eq!(table.columns().len(), FIXED_COLUMNS.len());
        assert_eq!(
            table.cell(0, "Channels"),
            Some(&Cell::Text("DAPI+GFP".to_string()))
        );
    }

    #[test]
    fn test_empty_batch_has_header_only() {
        let table = flatten(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), FIXED_COLUMNS.len());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Integer(7).to_string(), "7");
        assert_eq!(Cell::Empty.to_string(), "");
        assert!(Cell::Empty.is_empty());
    }
}
