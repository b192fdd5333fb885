//! Import path: workbook → namespaced key-value annotations
//!
//! This module provides:
//! - Workbook reading into a string grid
//! - Row classification into section headers and data rows
//! - Folding of classified rows into a [`crate::domain::MetadataRecord`]
//! - Annotation writing and import coordination

pub mod builder;
pub mod coordinator;
pub mod extract;
pub mod parser;
pub mod workbook;
pub mod writer;

pub use builder::{build_record, NamespaceBuilder, DEFAULT_VALUE_SEPARATOR};
pub use coordinator::{ImportCoordinator, ImportRequest, NO_METADATA_MESSAGE};
pub use extract::{extract_from_workbook, extract_metadata, Extraction, ExtractionSettings};
pub use parser::{is_section_header, RowEvent, SheetParser};
pub use workbook::{read_workbook, read_workbook_file};
pub use writer::AnnotationWriter;
