//! Core business logic for isalink.
//!
//! # Modules
//!
//! - [`import`] - Workbook parsing and annotation writing
//! - [`export`] - Attribute collection, table flattening and serialization
//! - [`status`] - The status every operation ends with
//!
//! # Import Workflow
//!
//! 1. **Resolve**: Check the target and the source file exist
//! 2. **Read**: Fetch the workbook bytes and decode every sheet
//! 3. **Parse**: Classify rows and fold them into namespaces
//! 4. **Write**: Create one key-value annotation per namespace
//!
//! # Example
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
//!
//! let request = ImportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], ObjectId::new(7));
//! let status = coordinator.run(&request).await?;
//!
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod import;
pub mod status;
