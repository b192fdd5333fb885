//! Repository entity and annotation models
//!
//! These are the shapes the repository collaborators hand back: resolved
//! entities, file annotations, images with their raster geometry and whatever
//! annotations are already linked to them.

use crate::domain::ids::{EntityRef, ObjectId};
use serde::{Deserialize, Serialize};

/// A resolved entity with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Kind and identifier
    pub target: EntityRef,

    /// Display name
    pub name: String,
}

/// A file artifact stored in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnnotationInfo {
    /// Annotation identifier
    pub id: ObjectId,

    /// Original file name
    pub file_name: String,

    /// Content type, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Annotation namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Key-value annotation: a namespace plus ordered pairs
///
/// Pairs are kept as a list because the repository model allows repeated
/// keys inside one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyValueAnnotation {
    /// Annotation namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Ordered key/value pairs
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}

impl KeyValueAnnotation {
    /// Creates an annotation from a namespace and pairs
    pub fn new(namespace: Option<String>, pairs: Vec<(String, String)>) -> Self {
        Self { namespace, pairs }
    }
}

/// Any annotation linked to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// Key-value (map) annotation
    KeyValue(KeyValueAnnotation),
    /// File attachment
    File(FileAnnotationInfo),
    /// Tag
    Tag { text: String },
    /// Free-text comment
    Comment { text: String },
}

impl Annotation {
    /// Returns the key-value payload, if this is a key-value annotation
    pub fn as_key_value(&self) -> Option<&KeyValueAnnotation> {
        match self {
            Annotation::KeyValue(kv) => Some(kv),
            _ => None,
        }
    }
}

/// Raster dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RasterSize {
    /// Width in pixels
    pub x: u32,
    /// Height in pixels
    pub y: u32,
    /// Number of focal planes
    pub z: u32,
    /// Number of channels
    pub c: u32,
    /// Number of time points
    pub t: u32,
}

impl RasterSize {
    /// Creates a raster size
    pub fn new(x: u32, y: u32, z: u32, c: u32, t: u32) -> Self {
        Self { x, y, z, c, t }
    }
}

/// An image with geometry and linked annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Image identifier
    pub id: ObjectId,

    /// Display name
    pub name: String,

    /// Raster dimensions
    pub size: RasterSize,

    /// Linked annotations in link order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ImageRecord {
    /// Creates an image without annotations
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>, size: RasterSize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a key-value annotation built from string pairs
    pub fn with_key_values<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.annotations
            .push(Annotation::KeyValue(KeyValueAnnotation::new(None, pairs)));
        self
    }
}

/// A named file produced by an export, ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name
    pub file_name: String,

    /// Content type tag
    pub mime_type: String,

    /// Annotation namespace
    pub namespace: String,

    /// Descriptive label
    pub description: String,

    /// File content
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_as_key_value() {
        let kv = Annotation::KeyValue(KeyValueAnnotation::new(
            Some("ns".to_string()),
            vec![("dye".to_string(), "GFP".to_string())],
        ));
        assert!(kv.as_key_value().is_some());

        let tag = Annotation::Tag {
            text: "mitosis".to_string(),
        };
        assert!(tag.as_key_value().is_none());
    }

    #[test]
    fn test_annotation_serialization_is_tagged() {
        let tag = Annotation::Tag {
            text: "mitosis".to_string(),
        };
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["type"], "tag");

        let kv = Annotation::KeyValue(KeyValueAnnotation::new(
            None,
            vec![("a".to_string(), "b".to_string())],
        ));
        let json = serde_json::to_string(&kv).unwrap();
        let back: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kv);
    }

    #[test]
    fn test_image_record_builder() {
        let image = ImageRecord::new(3, "cells.tif", RasterSize::new(512, 512, 1, 3, 1))
            .with_key_values([("dye", "GFP")]);
        assert_eq!(image.annotations.len(), 1);
        assert_eq!(image.size.c, 3);
    }
}
