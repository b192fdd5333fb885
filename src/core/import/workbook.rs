//! Workbook reading
//!
//! Turns raw file bytes into the string grid model in [`crate::domain::sheet`].
//! The container format (xlsx, xlsm, xlsb, xls, ods) is detected from the
//! bytes.

use crate::domain::{IsaLinkError, Result, Sheet, Workbook};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;

/// Reads every sheet of a workbook held in memory
///
/// # Errors
///
/// Returns [`IsaLinkError::Parse`] if the bytes are not a supported workbook
/// or a sheet cannot be decoded.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut source = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IsaLinkError::Parse(format!("Unreadable workbook: {e}")))?;

    let mut sheets = Vec::new();
    for name in source.sheet_names() {
        let range = source
            .worksheet_range(&name)
            .map_err(|e| IsaLinkError::Parse(format!("Failed to read sheet '{name}': {e}")))?;
        let rows = range_to_rows(&range);
        tracing::debug!(sheet = %name, rows = rows.len(), "Read sheet");
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Reads a workbook from a local file
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, otherwise the same
/// errors as [`read_workbook`].
pub fn read_workbook_file(path: impl AsRef<Path>) -> Result<Workbook> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        IsaLinkError::Io(format!("Failed to read workbook {}: {}", path.display(), e))
    })?;
    read_workbook(&bytes)
}

/// Converts a used range to rows anchored at column A
///
/// Every row has the full width of the range, so trailing empty cells are
/// kept as empty strings.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((_, start_col)) = range.start() else {
        return Vec::new();
    };
    let pad = start_col as usize;

    range
        .rows()
        .map(|row| {
            let mut cells = Vec::with_capacity(pad + row.len());
            cells.resize(pad, String::new());
            cells.extend(row.iter().map(render_cell));
            cells
        })
        .collect()
}

/// Renders one cell as text
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_float(*f),
        Data::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| render_float(dt.as_f64())),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Whole numbers lose their decimal part
fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
