//! On-disk catalog model
//!
//! The catalog is a single JSON document describing every entity of a local
//! repository, the annotations that exist and which entity links to which
//! annotation. File annotations point at files relative to the repository
//! root.

use crate::domain::{
    Annotation, EntityKind, FileAnnotationInfo, ImageRecord, IsaLinkError, KeyValueAnnotation,
    ObjectId, RasterSize, RepositoryError, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Project, dataset or screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub id: ObjectId,
    pub name: String,

    /// Child identifiers (datasets of a project, images of a dataset)
    #[serde(default)]
    pub children: Vec<ObjectId>,

    #[serde(default)]
    pub annotation_ids: Vec<ObjectId>,
}

/// Image with raster geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: ObjectId,
    pub name: String,
    pub size: RasterSize,

    #[serde(default)]
    pub annotation_ids: Vec<ObjectId>,
}

/// Stored annotation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationBody {
    KeyValue {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        #[serde(default)]
        pairs: Vec<(String, String)>,
    },
    File {
        file_name: String,
        /// Location relative to the repository root
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Tag {
        text: String,
    },
    Comment {
        text: String,
    },
}

/// One annotation of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub body: AnnotationBody,
}

impl AnnotationEntry {
    /// Domain view of this annotation
    pub fn to_annotation(&self) -> Annotation {
        match &self.body {
            AnnotationBody::KeyValue { namespace, pairs } => {
                Annotation::KeyValue(KeyValueAnnotation::new(namespace.clone(), pairs.clone()))
            }
            AnnotationBody::File {
                file_name,
                mime_type,
                namespace,
                description,
                ..
            } => Annotation::File(FileAnnotationInfo {
                id: self.id,
                file_name: file_name.clone(),
                mime_type: mime_type.clone(),
                namespace: namespace.clone(),
                description: description.clone(),
            }),
            AnnotationBody::Tag { text } => Annotation::Tag { text: text.clone() },
            AnnotationBody::Comment { text } => Annotation::Comment { text: text.clone() },
        }
    }

    /// File metadata, for file annotations only
    pub fn file_info(&self) -> Option<FileAnnotationInfo> {
        match self.to_annotation() {
            Annotation::File(info) => Some(info),
            _ => None,
        }
    }

    /// Stored path of a file annotation
    pub fn file_path(&self) -> Option<&str> {
        match &self.body {
            AnnotationBody::File { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }
}

/// The whole catalog document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Next identifier to hand out
    #[serde(default)]
    pub next_id: u64,

    #[serde(default)]
    pub projects: Vec<ContainerEntry>,

    #[serde(default)]
    pub datasets: Vec<ContainerEntry>,

    #[serde(default)]
    pub screens: Vec<ContainerEntry>,

    #[serde(default)]
    pub images: Vec<ImageEntry>,

    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
}

impl Catalog {
    /// Read and parse a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::CatalogUnavailable`] if the file cannot be
    /// read and [`RepositoryError::CatalogCorrupt`] if it is not a catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RepositoryError::CatalogUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let catalog: Catalog = serde_json::from_str(&contents).map_err(|e| {
            RepositoryError::CatalogCorrupt(format!("{}: {}", path.display(), e))
        })?;
        Ok(catalog)
    }

    /// Write the catalog through a temporary file and rename it into place
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::WriteFailed`] if any step fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp_path, path)
        };
        write().map_err(|e| {
            IsaLinkError::from(RepositoryError::WriteFailed(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })
    }

    /// Hand out a fresh identifier
    ///
    /// Never reuses an identifier already present in the catalog, even when
    /// `next_id` was edited by hand. Fails once `u64::MAX` is in use.
    pub fn allocate_id(&mut self) -> Result<ObjectId> {
        let floor = self
            .max_id()
            .checked_add(1)
            .ok_or(RepositoryError::IdsExhausted)?;
        let next = self.next_id.max(floor);
        self.next_id = next.saturating_add(1);
        Ok(ObjectId::new(next))
    }

    fn max_id(&self) -> u64 {
        let containers = self
            .projects
            .iter()
            .chain(&self.datasets)
            .chain(&self.screens)
            .map(|c| c.id.get());
        let images = self.images.iter().map(|i| i.id.get());
        let annotations = self.annotations.iter().map(|a| a.id.get());
        containers.chain(images).chain(annotations).max().unwrap_or(0)
    }

    fn containers(&self, kind: EntityKind) -> Option<&Vec<ContainerEntry>> {
        match kind {
            EntityKind::Project => Some(&self.projects),
            EntityKind::Dataset => Some(&self.datasets),
            EntityKind::Screen => Some(&self.screens),
            EntityKind::Image => None,
        }
    }

    fn containers_mut(&mut self, kind: EntityKind) -> Option<&mut Vec<ContainerEntry>> {
        match kind {
            EntityKind::Project => Some(&mut self.projects),
            EntityKind::Dataset => Some(&mut self.datasets),
            EntityKind::Screen => Some(&mut self.screens),
            EntityKind::Image => None,
        }
    }

    /// Look up a project, dataset or screen
    pub fn container(&self, kind: EntityKind, id: ObjectId) -> Option<&ContainerEntry> {
        self.containers(kind)?.iter().find(|c| c.id == id)
    }

    /// Look up an image
    pub fn image(&self, id: ObjectId) -> Option<&ImageEntry> {
        self.images.iter().find(|i| i.id == id)
    }

    /// Look up an annotation
    pub fn annotation(&self, id: ObjectId) -> Option<&AnnotationEntry> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Display name of any entity
    pub fn entity_name(&self, kind: EntityKind, id: ObjectId) -> Option<&str> {
        match kind {
            EntityKind::Image => self.image(id).map(|i| i.name.as_str()),
            _ => self.container(kind, id).map(|c| c.name.as_str()),
        }
    }

    /// Link an annotation to an entity
    ///
    /// Returns false when the entity does not exist.
    pub fn link(&mut self, kind: EntityKind, id: ObjectId, annotation_id: ObjectId) -> bool {
        let links = match kind {
            EntityKind::Image => self
                .images
                .iter_mut()
                .find(|i| i.id == id)
                .map(|i| &mut i.annotation_ids),
            _ => self
                .containers_mut(kind)
                .and_then(|list| list.iter_mut().find(|c| c.id == id))
                .map(|c| &mut c.annotation_ids),
        };
        match links {
            Some(links) => {
                links.push(annotation_id);
                true
            }
            None => false,
        }
    }

    /// Build the domain record of an image, with its linked annotations
    ///
    /// Links to annotations missing from the catalog are skipped.
    pub fn image_record(&self, entry: &ImageEntry) -> ImageRecord {
        let mut record = ImageRecord::new(entry.id, entry.name.clone(), entry.size);
        record.annotations = entry
            .annotation_ids
            .iter()
            .filter_map(|id| self.annotation(*id))
            .map(AnnotationEntry::to_annotation)
            .collect();
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        serde_json::from_str(
            r#"{
                "datasets": [{"id": 2, "name": "Mitosis", "children": [10]}],
                "images": [{
                    "id": 10,
                    "name": "cell.tif",
                    "size": {"x": 256, "y": 256, "z": 5, "c": 2, "t": 30},
                    "annotation_ids": [50, 99]
                }],
                "annotations": [
                    {"id": 50, "type": "key_value", "pairs": [["dye", "GFP"]]},
                    {"id": 7, "type": "file", "file_name": "isa.xlsx", "path": "files/isa.xlsx"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_sample_catalog() {
        let catalog = sample();
        assert_eq!(catalog.entity_name(EntityKind::Dataset, ObjectId::new(2)), Some("Mitosis"));
        assert_eq!(catalog.entity_name(EntityKind::Image, ObjectId::new(10)), Some("cell.tif"));
        assert!(catalog.container(EntityKind::Project, ObjectId::new(2)).is_none());

        let file = catalog.annotation(ObjectId::new(7)).unwrap();
        assert_eq!(file.file_path(), Some("files/isa.xlsx"));
        assert_eq!(file.file_info().unwrap().file_name, "isa.xlsx");
    }

    #[test]
    fn test_allocate_id_skips_existing() {
        let mut catalog = sample();
        assert_eq!(catalog.allocate_id().unwrap(), ObjectId::new(51));
        assert_eq!(catalog.allocate_id().unwrap(), ObjectId::new(52));
    }

    #[test]
    fn test_allocate_id_fails_when_exhausted() {
        let mut catalog = sample();
        catalog.images[0].id = ObjectId::new(u64::MAX - 1);
        assert_eq!(catalog.allocate_id().unwrap(), ObjectId::new(u64::MAX));
        assert_eq!(catalog.next_id, u64::MAX);

        catalog.annotations[0].id = ObjectId::new(u64::MAX);
        let err = catalog.allocate_id().unwrap_err();
        assert!(matches!(
            err,
            IsaLinkError::Repository(RepositoryError::IdsExhausted)
        ));
    }

    #[test]
    fn test_image_record_skips_dangling_links() {
        let catalog = sample();
        let record = catalog.image_record(catalog.image(ObjectId::new(10)).unwrap());
        assert_eq!(record.size.t, 30);
        assert_eq!(record.annotations.len(), 1);
        assert!(record.annotations[0].as_key_value().is_some());
    }

    #[test]
    fn test_link_unknown_entity() {
        let mut catalog = sample();
        assert!(!catalog.link(EntityKind::Screen, ObjectId::new(2), ObjectId::new(50)));
        assert!(catalog.link(EntityKind::Dataset, ObjectId::new(2), ObjectId::new(50)));
        assert_eq!(catalog.datasets[0].annotation_ids, vec![ObjectId::new(50)]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = sample();

        catalog.save(&path).unwrap();
        assert!(!dir.path().join("catalog.json.tmp").exists());
        assert_eq!(Catalog::load(&path).unwrap(), catalog);
    }

    #[test]
    fn test_load_corrupt_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Catalog::load(&path),
            Err(IsaLinkError::Repository(RepositoryError::CatalogCorrupt(_)))
        ));
    }
}
