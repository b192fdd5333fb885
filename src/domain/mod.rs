//! Domain models and types for isalink.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`ObjectId`], [`EntityKind`], [`EntityRef`])
//! - **Workbook model** ([`Sheet`], [`Workbook`])
//! - **Metadata record** ([`MetadataRecord`]) produced by the import path
//! - **Repository models** ([`ImageRecord`], [`Annotation`], [`Artifact`])
//! - **Error types** ([`IsaLinkError`], [`ResolutionError`], [`RepositoryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use isalink::domain::{EntityKind, EntityRef, MetadataRecord};
//!
//! let target = EntityRef::new(EntityKind::Dataset, 12);
//! let mut record = MetadataRecord::new();
//! record.set("ARC:ISA:STUDY:GENERAL", "Title", "Mitosis time-lapse");
//!
//! assert_eq!(target.to_string(), "Dataset ID 12");
//! assert_eq!(record.len(), 1);
//! ```

pub mod entity;
pub mod errors;
pub mod ids;
pub mod metadata;
pub mod result;
pub mod sheet;

// Re-export commonly used types for convenience
pub use entity::{
    Annotation, Artifact, EntitySummary, FileAnnotationInfo, ImageRecord, KeyValueAnnotation,
    RasterSize,
};
pub use errors::{IsaLinkError, RepositoryError, ResolutionError};
pub use ids::{EntityKind, EntityRef, ObjectId};
pub use metadata::{namespace_key, Attributes, MetadataRecord, DEFAULT_NAMESPACE_PREFIX};
pub use result::Result;
pub use sheet::{Sheet, Workbook};
