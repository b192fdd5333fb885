//! Repository collaborator interfaces
//!
//! This module provides the traits every repository backend implements,
//! plus the guard that scopes a session to one operation.

pub mod traits;

pub use traits::{ObjectMetadataSource, RepositoryService, RepositorySession, SessionGuard};
