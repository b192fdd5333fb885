//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//! - Helper macros for operation boundaries and errors
//!
//! # Example
//!
//! ```no_run
//! use isalink::logging::init_logging;
//! use isalink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an import or export
///
/// # Example
///
/// ```no_run
/// use isalink::log_operation_start;
/// use isalink::domain::EntityKind;
///
/// log_operation_start!("import", EntityKind::Dataset, 2);
/// ```
#[macro_export]
macro_rules! log_operation_start {
    ($operation:expr, $kind:expr, $ids:expr) => {
        tracing::info!(
            operation = $operation,
            kind = %$kind,
            ids = ?$ids,
            "Starting operation"
        );
    };
}

/// Log the completion of an import or export
///
/// # Example
///
/// ```no_run
/// use isalink::log_operation_complete;
/// use std::time::Duration;
///
/// log_operation_complete!("export", 12, Duration::from_millis(250));
/// ```
#[macro_export]
macro_rules! log_operation_complete {
    ($operation:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            operation = $operation,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Operation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use isalink::log_error_with_context;
/// use isalink::domain::IsaLinkError;
///
/// let error = IsaLinkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
