//! Import coordinator - orchestrates workbook → annotations
//!
//! The target and the file are resolved before the file is read, and the file
//! is parsed completely before the first annotation is written. A run that is
//! rejected has therefore written nothing.
//!
//! Only the first identifier of a request is imported into; any further
//! identifiers are ignored.

use super::extract::{extract_metadata, Extraction, ExtractionSettings};
use super::writer::AnnotationWriter;
use crate::adapters::repository::{RepositoryService, RepositorySession, SessionGuard};
use crate::core::status::OperationStatus;
use crate::domain::{EntityKind, EntityRef, ObjectId, ResolutionError, Result};
use std::sync::Arc;
use std::time::Instant;

/// Status line when the workbook yields no namespaces
pub const NO_METADATA_MESSAGE: &str = "No metadata extracted from Excel file.";

/// Input of one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// `Project`, `Dataset` or `Screen`
    pub kind: EntityKind,

    /// Target identifiers; the first one receives the annotations
    pub ids: Vec<ObjectId>,

    /// File annotation holding the workbook
    pub file_id: ObjectId,

    /// Parse and resolve, but write nothing
    pub dry_run: bool,
}

impl ImportRequest {
    /// Create a request that writes
    pub fn new(kind: EntityKind, ids: Vec<ObjectId>, file_id: ObjectId) -> Self {
        Self {
            kind,
            ids,
            file_id,
            dry_run: false,
        }
    }

    /// Set dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The identifier that receives the annotations
    pub fn target_id(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }
}

/// Import coordinator
pub struct ImportCoordinator<R>
where
    R: RepositoryService + RepositorySession + 'static,
{
    repository: Arc<R>,
    settings: ExtractionSettings,
}

impl<R> ImportCoordinator<R>
where
    R: RepositoryService + RepositorySession + 'static,
{
    /// Create a new import coordinator
    pub fn new(repository: Arc<R>, settings: ExtractionSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Execute the import
    ///
    /// This is the main entry point. It:
    /// 1. Checks the identifiers and the target kind
    /// 2. Resolves the first identifier, then the source file
    /// 3. Reads and parses the workbook
    /// 4. Creates one annotation per namespace on the target
    ///
    /// An unreadable or header-less workbook ends with an informational
    /// status.
    ///
    /// # Errors
    ///
    /// Repository read and write errors propagate unchanged.
    pub async fn run(&self, request: &ImportRequest) -> Result<OperationStatus> {
        let start_time = Instant::now();
        let _session = SessionGuard::new(self.repository.clone());
        crate::log_operation_start!("import", request.kind, &request.ids);

        let status = match self.resolve(request).await? {
            Ok(target) => self.import(request, &target).await?,
            Err(rejection) => OperationStatus::rejected(&rejection),
        };

        let status = status.with_duration(start_time.elapsed());
        crate::log_operation_complete!("import", status.annotations_created, status.duration);
        status.log();
        Ok(status)
    }

    async fn resolve(
        &self,
        request: &ImportRequest,
    ) -> Result<std::result::Result<EntityRef, ResolutionError>> {
        let Some(id) = request.target_id() else {
            return Ok(Err(ResolutionError::NoIdentifiers));
        };
        if !EntityKind::IMPORT_TARGETS.contains(&request.kind) {
            return Ok(Err(ResolutionError::UnsupportedKind {
                kind: request.kind,
                operation: "import",
            }));
        }
        if request.ids.len() > 1 {
            tracing::warn!(
                target_id = %id,
                ignored = ?&request.ids[1..],
                "Only the first ID receives the metadata"
            );
        }

        let Some(summary) = self.repository.resolve_entity(request.kind, id).await? else {
            return Ok(Err(ResolutionError::EntityNotFound {
                kind: request.kind,
                id,
            }));
        };
        tracing::debug!(entity = %summary.target, name = %summary.name, "Resolved target");

        match self.repository.resolve_file(request.file_id).await? {
            Some(file) => {
                tracing::debug!(file_id = %file.id, file_name = %file.file_name, "Resolved file");
                Ok(Ok(summary.target))
            }
            None => Ok(Err(ResolutionError::FileNotFound(request.file_id))),
        }
    }

    async fn import(&self, request: &ImportRequest, target: &EntityRef) -> Result<OperationStatus> {
        let bytes = self.repository.read_file(request.file_id).await?;

        let record = match extract_metadata(&bytes, &self.settings) {
            Extraction::Extracted(record) => record,
            Extraction::Empty => return Ok(OperationStatus::empty(NO_METADATA_MESSAGE)),
            Extraction::Failed(reason) => {
                return Ok(OperationStatus::empty(format!(
                    "{}: {}",
                    NO_METADATA_MESSAGE.trim_end_matches('.'),
                    reason
                )))
            }
        };

        if request.dry_run {
            let mut status = OperationStatus::success(format!(
                "Dry run: {} namespaces parsed for {}; nothing written.",
                record.len(),
                target
            ));
            status.namespaces = record.len();
            return Ok(status);
        }

        let created = AnnotationWriter::new(self.repository.as_ref())
            .write(target, &record)
            .await
            .map_err(|e| {
                crate::log_error_with_context!(&e, "Failed to write annotations");
                e
            })?;

        let mut status = OperationStatus::success(format!("Metadata imported for {target}."));
        status.namespaces = record.len();
        status.annotations_created = created.len();
        Ok(status)
    }
}
