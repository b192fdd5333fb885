//! Local directory repository
//!
//! A repository laid out on disk as a `catalog.json` document plus the files
//! its file annotations point at. Uploaded artifacts land under
//! [`repository::ARTIFACT_DIR`].

pub mod catalog;
pub mod repository;

pub use catalog::{AnnotationBody, AnnotationEntry, Catalog, ContainerEntry, ImageEntry};
pub use repository::LocalRepository;
