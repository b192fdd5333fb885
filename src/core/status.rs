//! Operation status and reporting
//!
//! Both operations end in one human-readable status line. The structured
//! fields next to it let callers and tests look at what happened without
//! parsing the message.

use crate::domain::{ObjectId, ResolutionError};
use std::fmt;
use std::time::Duration;

/// How an operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Work was done
    Success,

    /// Nothing to do: no metadata parsed or no images found
    Empty,

    /// An identifier did not resolve; nothing was written
    Rejected,
}

/// Status of an import or export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    /// How the operation ended
    pub outcome: Outcome,

    /// Human-readable status line
    pub message: String,

    /// Number of namespaces parsed from the workbook
    pub namespaces: usize,

    /// Number of annotations created
    pub annotations_created: usize,

    /// Number of images written to the table
    pub images_exported: usize,

    /// Identifier of the uploaded artifact
    pub artifact: Option<ObjectId>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl OperationStatus {
    fn with_outcome(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
            namespaces: 0,
            annotations_created: 0,
            images_exported: 0,
            artifact: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Status of an operation that did its work
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Success, message)
    }

    /// Informational status for an empty result
    pub fn empty(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Empty, message)
    }

    /// Status of an operation stopped by an unresolved identifier
    pub fn rejected(error: &ResolutionError) -> Self {
        Self::with_outcome(Outcome::Rejected, error.to_string())
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True when the operation was not rejected
    pub fn is_ok(&self) -> bool {
        self.outcome != Outcome::Rejected
    }

    /// Process exit code for this status
    ///
    /// Empty results are not errors and exit with 0.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            Outcome::Success | Outcome::Empty => 0,
            Outcome::Rejected => 3,
        }
    }

    /// Log the status
    pub fn log(&self) {
        match self.outcome {
            Outcome::Success => tracing::info!(
                namespaces = self.namespaces,
                annotations_created = self.annotations_created,
                images_exported = self.images_exported,
                artifact = ?self.artifact.map(ObjectId::get),
                duration_ms = self.duration.as_millis() as u64,
                "{}",
                self.message
            ),
            Outcome::Empty => tracing::info!("{}", self.message),
            Outcome::Rejected => tracing::warn!("{}", self.message),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
