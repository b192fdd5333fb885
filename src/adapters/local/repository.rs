//! Directory-backed repository
//!
//! Reads the catalog once on open and keeps it behind a mutex. Every write
//! is applied to a copy first, persisted, and only then becomes visible, so a
//! failed write leaves both the file and the in-memory view untouched.

use super::catalog::{AnnotationBody, AnnotationEntry, Catalog};
use crate::adapters::repository::{ObjectMetadataSource, RepositoryService, RepositorySession};
use crate::config::RepositoryConfig;
use crate::domain::{
    Artifact, EntityKind, EntityRef, EntitySummary, FileAnnotationInfo, ImageRecord, IsaLinkError,
    ObjectId, RepositoryError, Result,
};
use async_trait::async_trait;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Directory holding uploaded artifacts, relative to the root
pub const ARTIFACT_DIR: &str = "artifacts";

/// Repository stored as a catalog file plus referenced files
#[derive(Debug)]
pub struct LocalRepository {
    root: PathBuf,
    catalog_path: PathBuf,
    catalog: Mutex<Catalog>,
    closed: AtomicBool,
}

impl LocalRepository {
    /// Open the repository described by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is missing or invalid.
    pub fn open(config: &RepositoryConfig) -> Result<Self> {
        Self::open_at(&config.root, &config.catalog_file)
    }

    /// Open a repository rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is missing or invalid.
    pub fn open_at(root: impl AsRef<Path>, catalog_file: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let catalog_path = root.join(catalog_file);
        let catalog = Catalog::load(&catalog_path)?;

        tracing::info!(
            catalog = %catalog_path.display(),
            projects = catalog.projects.len(),
            datasets = catalog.datasets.len(),
            screens = catalog.screens.len(),
            images = catalog.images.len(),
            annotations = catalog.annotations.len(),
            "Opened local repository"
        );

        Ok(Self {
            root,
            catalog_path,
            catalog: Mutex::new(catalog),
            closed: AtomicBool::new(false),
        })
    }

    /// Create an empty repository, keeping an existing catalog untouched
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or catalog cannot be written.
    pub fn create(root: impl AsRef<Path>, catalog_file: &str) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root.join(ARTIFACT_DIR))?;
        let catalog_path = root.join(catalog_file);
        if !catalog_path.exists() {
            Catalog::default().save(&catalog_path)?;
        }
        Self::open_at(root, catalog_file)
    }

    /// Repository root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(RepositoryError::SessionClosed.into());
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Catalog>> {
        self.catalog.lock().map_err(|_| {
            IsaLinkError::from(RepositoryError::CatalogUnavailable(
                "catalog lock poisoned".to_string(),
            ))
        })
    }

    /// Apply `change` to a copy of the catalog, persist it, then publish it
    fn update<T>(&self, change: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T> {
        self.ensure_open()?;
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        next.save(&self.catalog_path)?;
        *guard = next;
        Ok(value)
    }
}

/// Keeps artifact file names portable
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "artifact".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl RepositoryService for LocalRepository {
    async fn resolve_entity(
        &self,
        kind: EntityKind,
        id: ObjectId,
    ) -> Result<Option<EntitySummary>> {
        self.ensure_open()?;
        let catalog = self.lock()?;
        Ok(catalog.entity_name(kind, id).map(|name| EntitySummary {
            target: EntityRef::new(kind, id),
            name: name.to_string(),
        }))
    }

    async fn resolve_file(&self, id: ObjectId) -> Result<Option<FileAnnotationInfo>> {
        self.ensure_open()?;
        let catalog = self.lock()?;
        Ok(catalog.annotation(id).and_then(AnnotationEntry::file_info))
    }

    async fn read_file(&self, id: ObjectId) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let path = {
            let catalog = self.lock()?;
            let relative = catalog
                .annotation(id)
                .and_then(AnnotationEntry::file_path)
                .ok_or_else(|| {
                    RepositoryError::ReadFailed(format!("annotation {id} is not a file"))
                })?;
            self.root.join(relative)
        };

        tracing::debug!(file_id = %id, path = %path.display(), "Reading file annotation");
        fs::read(&path).map_err(|e| {
            RepositoryError::ReadFailed(format!("{}: {}", path.display(), e)).into()
        })
    }

    async fn create_key_value_annotation(
        &self,
        target: &EntityRef,
        namespace: &str,
        pairs: Vec<(String, String)>,
    ) -> Result<ObjectId> {
        self.update(|catalog| {
            if catalog.entity_name(target.kind, target.id).is_none() {
                return Err(
                    RepositoryError::WriteFailed(format!("{target} does not exist")).into(),
                );
            }

            let id = catalog.allocate_id()?;
            catalog.annotations.push(AnnotationEntry {
                id,
                created_at: Some(Utc::now()),
                body: AnnotationBody::KeyValue {
                    namespace: Some(namespace.to_string()),
                    pairs,
                },
            });
            catalog.link(target.kind, target.id, id);
            Ok(id)
        })
    }

    async fn upload_artifact(&self, artifact: Artifact) -> Result<ObjectId> {
        self.update(|catalog| {
            let id = catalog.allocate_id()?;
            let relative = format!(
                "{}/{}_{}",
                ARTIFACT_DIR,
                id,
                sanitize_file_name(&artifact.file_name)
            );
            let path = self.root.join(&relative);

            let write = || -> std::io::Result<()> {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, &artifact.bytes)
            };
            write().map_err(|e| {
                IsaLinkError::from(RepositoryError::UploadFailed(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;

            tracing::debug!(
                artifact_id = %id,
                path = %path.display(),
                bytes = artifact.bytes.len(),
                "Stored artifact"
            );

            catalog.annotations.push(AnnotationEntry {
                id,
                created_at: Some(Utc::now()),
                body: AnnotationBody::File {
                    file_name: artifact.file_name.clone(),
                    path: relative,
                    mime_type: Some(artifact.mime_type.clone()),
                    namespace: Some(artifact.namespace.clone()),
                    description: Some(artifact.description.clone()),
                },
            });
            Ok(id)
        })
    }
}

#[async_trait]
impl ObjectMetadataSource for LocalRepository {
    async fn list_images(
        &self,
        kind: EntityKind,
        id: ObjectId,
    ) -> Result<Option<Vec<ImageRecord>>> {
        self.ensure_open()?;
        let catalog = self.lock()?;
        let images = match kind {
            EntityKind::Image => catalog
                .image(id)
                .map(|entry| vec![catalog.image_record(entry)]),
            EntityKind::Dataset => catalog.container(kind, id).map(|dataset| {
                dataset
                    .children
                    .iter()
                    .filter_map(|child| catalog.image(*child))
                    .map(|entry| catalog.image_record(entry))
                    .collect()
            }),
            EntityKind::Project | EntityKind::Screen => None,
        };
        Ok(images)
    }
}

impl RepositorySession for LocalRepository {
    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(root = %self.root.display(), "Closed local repository");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Mitosis DS.csv"), "Mitosis_DS.csv");
        assert_eq!(sanitize_file_name("../x"), ".._x");
        assert_eq!(sanitize_file_name(".."), "artifact");
        assert_eq!(sanitize_file_name("cell-01_a.xlsx"), "cell-01_a.xlsx");
    }
}
