//! Repository integrations for isalink.
//!
//! This module provides the collaborator traits and their implementations:
//!
//! - [`repository`] - Collaborator traits and the session guard
//! - [`local`] - Directory-backed repository used by the CLI
//! - [`memory`] - In-memory repository for tests and dry runs
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the metadata engine from
//! any particular repository API and enable testing with in-memory fakes.
//!
//! ```rust,no_run
//! use isalink::adapters::local::LocalRepository;
//! use isalink::adapters::repository::RepositoryService;
//! use isalink::domain::{EntityKind, ObjectId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = LocalRepository::open_at("./repository", "catalog.json")?;
//! let dataset = repository
//!     .resolve_entity(EntityKind::Dataset, ObjectId::new(2))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod local;
pub mod memory;
pub mod repository;
