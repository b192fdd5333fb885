//! Export path: images → table → artifact
//!
//! This module provides:
//! - Attribute collection from image records
//! - Table flattening with fixed and discovered columns
//! - CSV and xlsx serialization
//! - Artifact naming and export coordination

pub mod collector;
pub mod coordinator;
pub mod flatten;
pub mod naming;
pub mod serializer;

pub use collector::{AttributeCollector, EntityAttributes};
pub use coordinator::{resolve_format, ExportCoordinator, ExportRequest, ExportSettings};
pub use flatten::{Cell, MetadataTable, TableFlattener, FIXED_COLUMNS};
pub use naming::artifact_file_name;
pub use serializer::{TableFormat, TableSerializer};
