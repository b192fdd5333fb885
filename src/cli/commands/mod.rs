//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod import;
pub mod init;
pub mod inspect;
pub mod validate;

use crate::adapters::local::LocalRepository;
use crate::config::{load_config, IsaLinkConfig};
use crate::core::status::OperationStatus;
use std::sync::Arc;

/// Load the configuration or report the exit code to use
fn load_or_exit(config_path: &str) -> Result<IsaLinkConfig, i32> {
    load_config(config_path).map_err(|e| {
        crate::log_error_with_context!(&e, "Failed to load configuration");
        eprintln!("Configuration error: {e}");
        2
    })
}

/// Open the configured repository or report the exit code to use
fn open_or_exit(config: &IsaLinkConfig) -> Result<Arc<LocalRepository>, i32> {
    LocalRepository::open(&config.repository)
        .map(Arc::new)
        .map_err(|e| {
            crate::log_error_with_context!(&e, "Failed to open repository");
            eprintln!("Failed to open repository: {e}");
            5
        })
}

/// Print the status line and return its exit code
fn report(status: &OperationStatus) -> i32 {
    if status.is_ok() {
        println!("{status}");
    } else {
        eprintln!("{status}");
    }
    status.exit_code()
}
