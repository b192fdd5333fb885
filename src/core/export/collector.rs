//! Attribute collection
//!
//! Reads what the export table needs from each image: its name, raster
//! geometry and the key/value pairs of every key-value annotation linked to
//! it.

use crate::domain::{Attributes, ImageRecord, ObjectId, RasterSize};

/// Everything the table knows about one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAttributes {
    /// Image identifier
    pub id: ObjectId,

    /// Display name
    pub name: String,

    /// Raster dimensions
    pub size: RasterSize,

    /// Merged key/value pairs in first-seen key order
    pub key_values: Attributes,
}

/// Collects per-image attributes
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeCollector;

impl AttributeCollector {
    /// Create a collector
    pub fn new() -> Self {
        Self
    }

    /// Collect one image
    ///
    /// Pairs from all key-value annotations are merged into one mapping;
    /// a key seen again replaces the earlier value but keeps its position.
    /// Other annotation types are ignored.
    pub fn collect_one(&self, image: &ImageRecord) -> EntityAttributes {
        let mut key_values = Attributes::new();
        for (key, value) in image
            .annotations
            .iter()
            .filter_map(|annotation| annotation.as_key_value())
            .flat_map(|kv| kv.pairs.iter())
        {
            key_values.insert(key.clone(), value.clone());
        }

        EntityAttributes {
            id: image.id,
            name: image.name.clone(),
            size: image.size,
            key_values,
        }
    }

    /// Collect a batch, preserving input order
    pub fn collect(&self, images: &[ImageRecord]) -> Vec<EntityAttributes> {
        let collected: Vec<EntityAttributes> =
            images.iter().map(|image| self.collect_one(image)).collect();
        tracing::debug!(
            images = collected.len(),
            keys = collected.iter().map(|e| e.key_values.len()).sum::<usize>(),
            "Collected image attributes"
        );
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, FileAnnotationInfo};

    fn size() -> RasterSize {
        RasterSize::new(1024, 768, 12, 3, 40)
    }

    #[test]
    fn test_collect_geometry() {
        let image = ImageRecord::new(5, "cell.tif", size());
        let collected = AttributeCollector::new().collect_one(&image);
        assert_eq!(collected.name, "cell.tif");
        assert_eq!(collected.size.z, 12);
        assert!(collected.key_values.is_empty());
    }

    #[test]
    fn test_collect_merges_key_value_annotations_last_write_wins() {
        let image = ImageRecord::new(5, "cell.tif", size())
            .with_key_values([("dye", "GFP"), ("objective", "60x")])
            .with_annotation(Annotation::Tag {
                text: "ignored".to_string(),
            })
            .with_annotation(Annotation::File(FileAnnotationInfo {
                id: ObjectId::new(9),
                file_name: "notes.txt".to_string(),
                mime_type: None,
                namespace: None,
                description: None,
            }))
            .with_key_values([("dye", "mCherry"), ("stage", "metaphase")]);

        let collected = AttributeCollector::new().collect_one(&image);
        let entries: Vec<(&str, &str)> = collected
            .key_values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("dye", "mCherry"), ("objective", "60x"), ("stage", "metaphase")]
        );
    }

    #[test]
    fn test_collect_keeps_input_order() {
        let images = vec![
            ImageRecord::new(2, "b.tif", size()),
            ImageRecord::new(1, "a.tif", size()),
        ];
        let collected = AttributeCollector::new().collect(&images);
        assert_eq!(collected[0].name, "b.tif");
        assert_eq!(collected[1].name, "a.tif");
    }
}
