// isalink - ISA metadata bridge for image repositories
// Copyright (c) 2025 isalink Contributors
// Licensed under the MIT License

//! # isalink - ISA metadata bridge for image repositories
//!
//! isalink turns ISA-style (Investigation/Study/Assay) spreadsheets into
//! namespaced key-value annotations on image repository containers, and
//! exports image geometry plus key-value annotations back to CSV or xlsx.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Parsing** workbooks whose sections start at upper-case header rows
//! - **Building** a `namespace → key → value` record per workbook
//! - **Writing** one key-value annotation per namespace
//! - **Flattening** image attributes into a table and serializing it
//!
//! ## Architecture
//!
//! isalink follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (import, export, status)
//! - [`adapters`] - Repository collaborators (local directory, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use isalink::core::import::{extract_from_workbook, ExtractionSettings};
//! use isalink::domain::{Sheet, Workbook};
//!
//! let workbook = Workbook::new(vec![Sheet::from_rows(
//!     "Study",
//!     [vec!["GENERAL"], vec!["Title", "X"], vec!["DESIGN"], vec!["Type", "Y"]],
//! )]);
//!
//! let outcome = extract_from_workbook(&workbook, &ExtractionSettings::default());
//! let record = outcome.record().expect("two namespaces");
//! assert_eq!(record.get("ARC:ISA:STUDY:GENERAL").unwrap()["Title"], "X");
//! assert_eq!(record.get("ARC:ISA:STUDY:DESIGN").unwrap()["Type"], "Y");
//! ```
//!
//! ## Import
//!
//! ```rust,no_run
//! use isalink::adapters::local::LocalRepository;
//! use isalink::core::import::{ExtractionSettings, ImportCoordinator, ImportRequest};
//! use isalink::domain::{EntityKind, ObjectId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(LocalRepository::open_at("./repository", "catalog.json")?);
//! let coordinator = ImportCoordinator::new(repository, ExtractionSettings::default());
//! let request = ImportRequest::new(EntityKind::Project, vec![ObjectId::new(1)], ObjectId::new(7));
//!
//! let status = coordinator.run(&request).await?;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Export
//!
//! ```rust,no_run
//! use isalink::adapters::local::LocalRepository;
//! use isalink::core::export::{ExportCoordinator, ExportRequest, ExportSettings, TableFormat};
//! use isalink::domain::{EntityKind, ObjectId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(LocalRepository::open_at("./repository", "catalog.json")?);
//! let coordinator = ExportCoordinator::new(repository, ExportSettings::default());
//! let request = ExportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], TableFormat::Xlsx);
//!
//! let status = coordinator.run(&request).await?;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! isalink uses the [`domain::IsaLinkError`] type for all errors. Unresolved
//! identifiers are not errors at the operation level: they end the operation
//! with a rejected [`core::status::OperationStatus`] before anything is
//! written.
//!
//! ## Logging
//!
//! isalink uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting import");
//! warn!(file_id = 7, "No metadata extracted");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
