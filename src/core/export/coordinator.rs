//! Export coordinator - orchestrates images → table → artifact
//!
//! The coordinator resolves every source identifier before anything is
//! serialized or uploaded, and holds the repository session for the whole
//! run so it is released on every exit path.

use super::collector::AttributeCollector;
use super::flatten::TableFlattener;
use super::naming::artifact_file_name;
use super::serializer::{TableFormat, TableSerializer};
use crate::adapters::repository::{
    ObjectMetadataSource, RepositoryService, RepositorySession, SessionGuard,
};
use crate::config::ExportConfig;
use crate::core::status::OperationStatus;
use crate::domain::{Artifact, EntityKind, ImageRecord, ObjectId, ResolutionError, Result};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Default namespace of exported artifacts
pub const DEFAULT_ARTIFACT_NAMESPACE: &str = "omero.script_results";

/// Default base name when no entity name applies
pub const DEFAULT_FALLBACK_FILE_NAME: &str = "MetadataImages";

/// Input of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// `Dataset` or `Image`
    pub kind: EntityKind,

    /// Source identifiers, in order
    pub ids: Vec<ObjectId>,

    /// Output format
    pub format: TableFormat,
}

impl ExportRequest {
    /// Create a request
    pub fn new(kind: EntityKind, ids: Vec<ObjectId>, format: TableFormat) -> Self {
        Self { kind, ids, format }
    }
}

/// Naming settings for exported artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Namespace of the uploaded artifact
    pub artifact_namespace: String,

    /// Base file name when no entity name applies
    pub fallback_file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            artifact_namespace: DEFAULT_ARTIFACT_NAMESPACE.to_string(),
            fallback_file_name: DEFAULT_FALLBACK_FILE_NAME.to_string(),
        }
    }
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            artifact_namespace: config.artifact_namespace.clone(),
            fallback_file_name: config.fallback_file_name.clone(),
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator<R>
where
    R: RepositoryService + ObjectMetadataSource + RepositorySession + 'static,
{
    repository: Arc<R>,
    settings: ExportSettings,
    collector: AttributeCollector,
    flattener: TableFlattener,
}

impl<R> ExportCoordinator<R>
where
    R: RepositoryService + ObjectMetadataSource + RepositorySession + 'static,
{
    /// Create a new export coordinator
    pub fn new(repository: Arc<R>, settings: ExportSettings) -> Self {
        Self {
            repository,
            settings,
            collector: AttributeCollector::new(),
            flattener: TableFlattener::new(),
        }
    }

    /// Execute the export
    ///
    /// This is the main entry point. It:
    /// 1. Checks the source kind
    /// 2. Lists the images behind every identifier, aborting on the first
    ///    one that does not resolve
    /// 3. Collects, flattens and serializes the table
    /// 4. Uploads it as one artifact
    ///
    /// No images at all, including an empty identifier list, is an
    /// informational status, not an error.
    ///
    /// # Errors
    ///
    /// Repository, serialization and upload errors propagate unchanged.
    pub async fn run(&self, request: &ExportRequest) -> Result<OperationStatus> {
        let start_time = Instant::now();
        let _session = SessionGuard::new(self.repository.clone());
        crate::log_operation_start!("export", request.kind, &request.ids);

        let status = match self.resolve(request).await? {
            Ok((images, first_dataset_name)) => {
                self.export(request, images, first_dataset_name).await?
            }
            Err(rejection) => OperationStatus::rejected(&rejection),
        };

        let status = status.with_duration(start_time.elapsed());
        crate::log_operation_complete!("export", status.images_exported, status.duration);
        status.log();
        Ok(status)
    }

    /// Gather the images of every identifier
    ///
    /// The outer `Result` carries repository failures, the inner one the
    /// first identifier that did not resolve.
    async fn resolve(
        &self,
        request: &ExportRequest,
    ) -> Result<std::result::Result<(Vec<ImageRecord>, Option<String>), ResolutionError>> {
        if !EntityKind::EXPORT_SOURCES.contains(&request.kind) {
            return Ok(Err(ResolutionError::UnsupportedKind {
                kind: request.kind,
                operation: "export",
            }));
        }
        let mut images = Vec::new();
        let mut first_dataset_name = None;
        for (index, id) in request.ids.iter().enumerate() {
            let Some(found) = self.repository.list_images(request.kind, *id).await? else {
                return Ok(Err(ResolutionError::EntityNotFound {
                    kind: request.kind,
                    id: *id,
                }));
            };
            if request.kind == EntityKind::Dataset && index == 0 {
                first_dataset_name = self
                    .repository
                    .resolve_entity(request.kind, *id)
                    .await?
                    .map(|summary| summary.name);
            }
            tracing::debug!(kind = %request.kind, id = %id, images = found.len(), "Listed images");
            images.extend(found);
        }

        Ok(Ok((images, first_dataset_name)))
    }

    async fn export(
        &self,
        request: &ExportRequest,
        images: Vec<ImageRecord>,
        first_dataset_name: Option<String>,
    ) -> Result<OperationStatus> {
        if images.is_empty() {
            return Ok(OperationStatus::empty("No images found."));
        }

        let attributes = self.collector.collect(&images);
        let table = self.flattener.flatten(&attributes);
        let bytes = TableSerializer::new(request.format).serialize(&table)?;

        let file_name = artifact_file_name(
            request.kind,
            first_dataset_name.as_deref(),
            &images,
            &self.settings.fallback_file_name,
            request.format,
        );
        let artifact = Artifact {
            file_name: file_name.clone(),
            mime_type: request.format.mime_type().to_string(),
            namespace: self.settings.artifact_namespace.clone(),
            description: request.format.description(),
            bytes,
        };

        let artifact_id = self.repository.upload_artifact(artifact).await.map_err(|e| {
            crate::log_error_with_context!(&e, "Failed to upload export artifact");
            e
        })?;

        let mut status = OperationStatus::success(format!(
            "Exported metadata for {} images to {} (artifact {}).",
            table.len(),
            file_name,
            artifact_id
        ));
        status.images_exported = table.len();
        status.artifact = Some(artifact_id);
        Ok(status)
    }
}

/// Parse a format name, falling back to the configured default
///
/// # Errors
///
/// Returns a validation error for an unknown format name.
pub fn resolve_format(requested: Option<&str>, config: &ExportConfig) -> Result<TableFormat> {
    TableFormat::from_str(requested.unwrap_or(config.format.as_str()))
}
