//! Annotation writing
//!
//! Each namespace of a record becomes one new key-value annotation on the
//! target. Namespaces are written in record order. Nothing is deduplicated:
//! importing the same workbook twice creates every annotation twice.

use crate::adapters::repository::RepositoryService;
use crate::domain::{EntityRef, MetadataRecord, ObjectId, Result};

/// Writes metadata records through a repository
pub struct AnnotationWriter<'a, R: RepositoryService + ?Sized> {
    repository: &'a R,
}

impl<'a, R: RepositoryService + ?Sized> AnnotationWriter<'a, R> {
    /// Create a writer over `repository`
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Create one annotation per namespace on `target`
    ///
    /// Returns the new annotation identifiers in creation order.
    ///
    /// # Errors
    ///
    /// The first repository error stops the write and is returned as is;
    /// annotations created before it remain.
    pub async fn write(
        &self,
        target: &EntityRef,
        record: &MetadataRecord,
    ) -> Result<Vec<ObjectId>> {
        let mut created = Vec::with_capacity(record.len());
        for (namespace, attributes) in record {
            let pairs: Vec<(String, String)> = attributes
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let id = self
                .repository
                .create_key_value_annotation(target, namespace, pairs)
                .await?;
            tracing::debug!(
                entity = %target,
                namespace = %namespace,
                annotation_id = %id,
                pairs = attributes.len(),
                "Created key-value annotation"
            );
            created.push(id);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRepository;
    use crate::domain::EntityKind;
    use pretty_assertions::assert_eq;

    fn record() -> MetadataRecord {
        let mut record = MetadataRecord::new();
        record.set("ARC:ISA:STUDY:GENERAL", "Title", "X");
        record.set("ARC:ISA:STUDY:GENERAL", "Date", "2024");
        record.set("ARC:ISA:STUDY:DESIGN", "Type", "Y");
        record
    }

    #[tokio::test]
    async fn test_write_one_annotation_per_namespace_in_order() {
        let repository = InMemoryRepository::new().with_entity(EntityKind::Project, 1, "P");
        let target = EntityRef::new(EntityKind::Project, 1);

        let ids = AnnotationWriter::new(&repository)
            .write(&target, &record())
            .await
            .unwrap();

        let created = repository.created_annotations();
        assert_eq!(ids.len(), 2);
        assert_eq!(created[0].namespace, "ARC:ISA:STUDY:GENERAL");
        assert_eq!(
            created[0].pairs,
            vec![
                ("Title".to_string(), "X".to_string()),
                ("Date".to_string(), "2024".to_string())
            ]
        );
        assert_eq!(created[1].namespace, "ARC:ISA:STUDY:DESIGN");
        assert_eq!(created[1].target, target);
    }

    #[tokio::test]
    async fn test_write_is_not_idempotent() {
        let repository = InMemoryRepository::new().with_entity(EntityKind::Dataset, 2, "D");
        let target = EntityRef::new(EntityKind::Dataset, 2);
        let writer = AnnotationWriter::new(&repository);

        writer.write(&target, &record()).await.unwrap();
        writer.write(&target, &record()).await.unwrap();
        assert_eq!(repository.created_annotations().len(), 4);
    }

    #[tokio::test]
    async fn test_write_error_propagates() {
        let repository = InMemoryRepository::new()
            .with_entity(EntityKind::Dataset, 2, "D")
            .with_failing_writes();
        let result = AnnotationWriter::new(&repository)
            .write(&EntityRef::new(EntityKind::Dataset, 2), &record())
            .await;
        assert!(result.is_err());
    }
}
