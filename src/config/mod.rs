//! Configuration management for isalink.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! isalink uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ISALINK_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`RepositoryConfig`] - Location of the local repository catalog
//! - [`ImportConfig`] - Namespace prefix and value separator
//! - [`ExportConfig`] - Table format and artifact naming
//! - [`LoggingConfig`] - Optional file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [repository]
//! root = "${ISALINK_REPOSITORY_DIR}"
//!
//! [import]
//! namespace_prefix = "ARC:ISA"
//!
//! [export]
//! format = "xlsx"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use isalink::config::load_config;
//!
//! # fn example() {
//! match load_config("isalink.toml") {
//!     Ok(config) => println!("Repository: {}", config.repository.root.display()),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApplicationConfig, ExportConfig, ImportConfig, IsaLinkConfig, LoggingConfig, RepositoryConfig,
};
