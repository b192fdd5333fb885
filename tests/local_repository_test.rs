//! Import and export against a directory-backed repository

use isalink::adapters::local::{Catalog, LocalRepository};
use isalink::adapters::repository::{RepositoryService, RepositorySession};
use isalink::core::export::{ExportCoordinator, ExportRequest, ExportSettings, TableFormat};
use isalink::core::import::{ExtractionSettings, ImportCoordinator, ImportRequest};
use isalink::domain::{EntityKind, IsaLinkError, ObjectId, RepositoryError};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "next_id": 100,
  "projects": [{ "id": 1, "name": "Cell cycle", "children": [2] }],
  "datasets": [{ "id": 2, "name": "Mitosis", "children": [10, 11] }],
  "images": [
    { "id": 10, "name": "A.tif", "size": { "x": 512, "y": 512, "z": 3, "c": 2, "t": 1 },
      "annotation_ids": [50] },
    { "id": 11, "name": "B.tif", "size": { "x": 256, "y": 256, "z": 1, "c": 1, "t": 5 } }
  ],
  "annotations": [
    { "id": 7, "type": "file", "file_name": "isa.xlsx", "path": "uploads/isa.xlsx" },
    { "id": 50, "type": "key_value", "pairs": [["dye", "GFP"]] }
  ]
}"#;

fn investigation_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Investigation").unwrap();
    sheet.write_string(0, 0, "GENERAL").unwrap();
    sheet.write_string(1, 0, "Title").unwrap();
    sheet.write_string(1, 1, "Mitosis time-lapse").unwrap();
    sheet.write_string(2, 0, "CONTACTS").unwrap();
    sheet.write_string(3, 0, "Name").unwrap();
    sheet.write_string(3, 1, "Ada").unwrap();
    sheet.write_string(3, 2, "Grace").unwrap();
    workbook.save_to_buffer().unwrap()
}

fn repository_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("uploads")).unwrap();
    fs::write(dir.path().join("uploads/isa.xlsx"), investigation_workbook()).unwrap();
    fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    dir
}

fn open(root: &Path) -> Arc<LocalRepository> {
    Arc::new(LocalRepository::open_at(root, "catalog.json").unwrap())
}

#[tokio::test]
async fn test_import_persists_annotations_in_catalog() {
    let dir = repository_dir();
    let coordinator = ImportCoordinator::new(open(dir.path()), ExtractionSettings::default());
    let request = ImportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], ObjectId::new(7));

    let status = coordinator.run(&request).await.unwrap();
    assert_eq!(status.message, "Metadata imported for Dataset ID 2.");
    assert_eq!(status.annotations_created, 2);

    let catalog = Catalog::load(&dir.path().join("catalog.json")).unwrap();
    let dataset = catalog.container(EntityKind::Dataset, ObjectId::new(2)).unwrap();
    assert_eq!(dataset.annotation_ids, vec![ObjectId::new(100), ObjectId::new(101)]);

    let general = catalog
        .annotation(ObjectId::new(100))
        .unwrap()
        .to_annotation();
    let general = general.as_key_value().unwrap();
    assert_eq!(general.namespace.as_deref(), Some("ARC:ISA:INVESTIGATION:GENERAL"));
    assert_eq!(
        general.pairs,
        // Rows span the used range, so the empty third column is kept
        vec![("Title".to_string(), "Mitosis time-lapse, ".to_string())]
    );

    let contacts = catalog
        .annotation(ObjectId::new(101))
        .unwrap()
        .to_annotation();
    assert_eq!(
        contacts.as_key_value().unwrap().pairs,
        vec![("Name".to_string(), "Ada, Grace".to_string())]
    );
}

#[tokio::test]
async fn test_export_writes_artifact_file() {
    let dir = repository_dir();
    let coordinator = ExportCoordinator::new(open(dir.path()), ExportSettings::default());
    let request = ExportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], TableFormat::Csv);

    let status = coordinator.run(&request).await.unwrap();
    let artifact_id = status.artifact.unwrap();
    assert_eq!(artifact_id, ObjectId::new(100));
    assert_eq!(status.images_exported, 2);

    let path = dir.path().join("artifacts").join("100_Mitosis.csv");
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "ImageName,PixelSizeX,PixelSizeY,PixelSizeZ,Channels,TimeAxis,dye\n\
         A.tif,512,512,3,2,1,GFP\n\
         B.tif,256,256,1,1,5,\n"
    );

    // The artifact is registered as a file annotation and can be read back
    let reopened = open(dir.path());
    let info = reopened.resolve_file(artifact_id).await.unwrap().unwrap();
    assert_eq!(info.file_name, "Mitosis.csv");
    assert_eq!(info.namespace.as_deref(), Some("omero.script_results"));
    assert_eq!(reopened.read_file(artifact_id).await.unwrap(), text.into_bytes());
}

#[tokio::test]
async fn test_rejected_import_leaves_catalog_untouched() {
    let dir = repository_dir();
    let before = fs::read_to_string(dir.path().join("catalog.json")).unwrap();

    let coordinator = ImportCoordinator::new(open(dir.path()), ExtractionSettings::default());
    let request = ImportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], ObjectId::new(8));
    let status = coordinator.run(&request).await.unwrap();

    assert_eq!(status.message, "No FileAnnotation found with ID 8");
    let after = fs::read_to_string(dir.path().join("catalog.json")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_session_is_closed_after_run() {
    let dir = repository_dir();
    let repository = open(dir.path());
    let coordinator = ImportCoordinator::new(repository.clone(), ExtractionSettings::default());
    let request = ImportRequest::new(EntityKind::Dataset, vec![ObjectId::new(2)], ObjectId::new(7))
        .with_dry_run(true);

    coordinator.run(&request).await.unwrap();

    assert!(repository.is_closed());
    let err = repository
        .resolve_entity(EntityKind::Dataset, ObjectId::new(2))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IsaLinkError::Repository(RepositoryError::SessionClosed)
    ));
}

#[test]
fn test_create_initializes_empty_repository() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");

    let repository = LocalRepository::create(&root, "catalog.json").unwrap();
    assert_eq!(repository.root(), root.as_path());
    assert!(root.join("artifacts").is_dir());

    let catalog = Catalog::load(&root.join("catalog.json")).unwrap();
    assert!(catalog.projects.is_empty());
    assert!(catalog.annotations.is_empty());
}

#[test]
fn test_open_missing_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = LocalRepository::open_at(dir.path(), "catalog.json").unwrap_err();
    assert!(matches!(
        err,
        IsaLinkError::Repository(RepositoryError::CatalogUnavailable(_))
    ));
}
