//! In-memory repository
//!
//! A thread-safe fake of the repository collaborators. It records every
//! annotation it creates, every artifact it receives and every session
//! close, so tests can assert on side effects without a backend.

use crate::adapters::repository::{ObjectMetadataSource, RepositoryService, RepositorySession};
use crate::domain::{
    Annotation, Artifact, EntityKind, EntityRef, EntitySummary, FileAnnotationInfo, ImageRecord,
    KeyValueAnnotation, ObjectId, RepositoryError, Result,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// An annotation created through [`RepositoryService::create_key_value_annotation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAnnotation {
    /// Identifier handed back to the caller
    pub id: ObjectId,

    /// Entity the annotation is linked to
    pub target: EntityRef,

    /// Annotation namespace
    pub namespace: String,

    /// Ordered key/value pairs
    pub pairs: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entities: HashMap<(EntityKind, ObjectId), String>,
    files: HashMap<ObjectId, (FileAnnotationInfo, Vec<u8>)>,
    dataset_images: HashMap<ObjectId, Vec<ObjectId>>,
    images: IndexMap<ObjectId, ImageRecord>,
    created: Vec<CreatedAnnotation>,
    uploads: Vec<(ObjectId, Artifact)>,
    last_id: u64,
    fail_writes: bool,
}

impl MemoryState {
    fn reserve(&mut self, id: ObjectId) {
        self.last_id = self.last_id.max(id.get());
    }

    fn allocate(&mut self) -> Result<ObjectId> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or(RepositoryError::IdsExhausted)?;
        self.last_id = next;
        Ok(ObjectId::new(next))
    }

    fn register_image(&mut self, image: ImageRecord) {
        self.reserve(image.id);
        self.entities
            .insert((EntityKind::Image, image.id), image.name.clone());
        self.images.insert(image.id, image);
    }
}

/// In-memory repository
///
/// # Examples
///
/// ```
/// use isalink::adapters::memory::InMemoryRepository;
/// use isalink::domain::EntityKind;
///
/// let repository = InMemoryRepository::new()
///     .with_entity(EntityKind::Project, 1, "Mitosis")
///     .with_file(7, "isa.xlsx", Vec::new());
/// assert_eq!(repository.close_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
    closes: AtomicUsize,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut MemoryState {
        self.state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(RepositoryError::SessionClosed.into());
        }
        Ok(())
    }

    /// Register a named entity
    pub fn with_entity(
        mut self,
        kind: EntityKind,
        id: impl Into<ObjectId>,
        name: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let state = self.state_mut();
        state.reserve(id);
        state.entities.insert((kind, id), name.into());
        self
    }

    /// Register a file annotation with its bytes
    pub fn with_file(
        mut self,
        id: impl Into<ObjectId>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let id = id.into();
        let info = FileAnnotationInfo {
            id,
            file_name: file_name.into(),
            mime_type: None,
            namespace: None,
            description: None,
        };
        let state = self.state_mut();
        state.reserve(id);
        state.files.insert(id, (info, bytes));
        self
    }

    /// Register a standalone image
    pub fn with_image(mut self, image: ImageRecord) -> Self {
        self.state_mut().register_image(image);
        self
    }

    /// Register a dataset together with its child images
    pub fn with_dataset(
        mut self,
        id: impl Into<ObjectId>,
        name: impl Into<String>,
        images: Vec<ImageRecord>,
    ) -> Self {
        let id = id.into();
        let state = self.state_mut();
        state.reserve(id);
        state.entities.insert((EntityKind::Dataset, id), name.into());
        let children = images.iter().map(|image| image.id).collect();
        for image in images {
            state.register_image(image);
        }
        state.dataset_images.insert(id, children);
        self
    }

    /// Make every subsequent write fail
    pub fn with_failing_writes(mut self) -> Self {
        self.state_mut().fail_writes = true;
        self
    }

    /// Annotations created so far, in creation order
    pub fn created_annotations(&self) -> Vec<CreatedAnnotation> {
        self.lock().created.clone()
    }

    /// Artifacts uploaded so far, with their identifiers
    pub fn uploads(&self) -> Vec<(ObjectId, Artifact)> {
        self.lock().uploads.clone()
    }

    /// Number of times `close` was called
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryService for InMemoryRepository {
    async fn resolve_entity(
        &self,
        kind: EntityKind,
        id: ObjectId,
    ) -> Result<Option<EntitySummary>> {
        self.ensure_open()?;
        let state = self.lock();
        Ok(state.entities.get(&(kind, id)).map(|name| EntitySummary {
            target: EntityRef::new(kind, id),
            name: name.clone(),
        }))
    }

    async fn resolve_file(&self, id: ObjectId) -> Result<Option<FileAnnotationInfo>> {
        self.ensure_open()?;
        Ok(self.lock().files.get(&id).map(|(info, _)| info.clone()))
    }

    async fn read_file(&self, id: ObjectId) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.lock()
            .files
            .get(&id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| RepositoryError::ReadFailed(format!("file {id} does not exist")).into())
    }

    async fn create_key_value_annotation(
        &self,
        target: &EntityRef,
        namespace: &str,
        pairs: Vec<(String, String)>,
    ) -> Result<ObjectId> {
        self.ensure_open()?;
        let mut state = self.lock();
        if state.fail_writes {
            return Err(RepositoryError::WriteFailed(format!(
                "refusing to annotate {target}"
            ))
            .into());
        }
        if !state.entities.contains_key(&(target.kind, target.id)) {
            return Err(RepositoryError::WriteFailed(format!("{target} does not exist")).into());
        }

        let id = state.allocate()?;
        if target.kind == EntityKind::Image {
            if let Some(image) = state.images.get_mut(&target.id) {
                image.annotations.push(Annotation::KeyValue(KeyValueAnnotation::new(
                    Some(namespace.to_string()),
                    pairs.clone(),
                )));
            }
        }
        state.created.push(CreatedAnnotation {
            id,
            target: *target,
            namespace: namespace.to_string(),
            pairs,
        });
        Ok(id)
    }

    async fn upload_artifact(&self, artifact: Artifact) -> Result<ObjectId> {
        self.ensure_open()?;
        let mut state = self.lock();
        if state.fail_writes {
            return Err(RepositoryError::UploadFailed(format!(
                "refusing to store {}",
                artifact.file_name
            ))
            .into());
        }

        let id = state.allocate()?;
        let info = FileAnnotationInfo {
            id,
            file_name: artifact.file_name.clone(),
            mime_type: Some(artifact.mime_type.clone()),
            namespace: Some(artifact.namespace.clone()),
            description: Some(artifact.description.clone()),
        };
        state.files.insert(id, (info, artifact.bytes.clone()));
        state.uploads.push((id, artifact));
        Ok(id)
    }
}

#[async_trait]
impl ObjectMetadataSource for InMemoryRepository {
    async fn list_images(
        &self,
        kind: EntityKind,
        id: ObjectId,
    ) -> Result<Option<Vec<ImageRecord>>> {
        self.ensure_open()?;
        let state = self.lock();
        let images = match kind {
            EntityKind::Dataset => state.dataset_images.get(&id).map(|children| {
                children
                    .iter()
                    .filter_map(|child| state.images.get(child).cloned())
                    .collect()
            }),
            EntityKind::Image => state.images.get(&id).map(|image| vec![image.clone()]),
            _ => None,
        };
        Ok(images)
    }
}

impl RepositorySession for InMemoryRepository {
    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}
