//! End-to-end export tests against the in-memory repository

use isalink::adapters::memory::InMemoryRepository;
use isalink::core::export::{ExportCoordinator, ExportRequest, ExportSettings, TableFormat};
use isalink::core::import::read_workbook;
use isalink::core::status::{OperationStatus, Outcome};
use isalink::domain::{Annotation, EntityKind, ImageRecord, ObjectId, RasterSize};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn image(id: u64, name: &str) -> ImageRecord {
    ImageRecord::new(id, name, RasterSize::new(512, 256, 3, 2, 10))
}

async fn run_export(
    repository: InMemoryRepository,
    request: ExportRequest,
) -> (Arc<InMemoryRepository>, OperationStatus) {
    let repository = Arc::new(repository);
    let coordinator = ExportCoordinator::new(repository.clone(), ExportSettings::default());
    let status = coordinator.run(&request).await.unwrap();
    (repository, status)
}

fn csv_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes);
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_export_without_entities_reports_no_images() {
    let (repository, status) = run_export(
        InMemoryRepository::new(),
        ExportRequest::new(EntityKind::Dataset, vec![], TableFormat::Csv),
    )
    .await;

    assert_eq!(status.outcome, Outcome::Empty);
    assert_eq!(status.message, "No images found.");
    assert_eq!(status.artifact, None);
    assert!(repository.uploads().is_empty());
    assert_eq!(repository.close_count(), 1);
}

#[tokio::test]
async fn test_csv_export_discovers_columns_and_leaves_gaps_empty() {
    let repository = InMemoryRepository::new().with_dataset(
        5,
        "Mitosis",
        vec![
            image(10, "A.tif").with_key_values([("dye", "GFP")]),
            image(11, "B.tif"),
        ],
    );
    let (repository, status) = run_export(
        repository,
        ExportRequest::new(EntityKind::Dataset, vec![ObjectId::new(5)], TableFormat::Csv),
    )
    .await;

    assert_eq!(status.images_exported, 2);
    let uploads = repository.uploads();
    assert_eq!(uploads.len(), 1);
    let (_, artifact) = &uploads[0];
    assert_eq!(artifact.file_name, "Mitosis.csv");
    assert_eq!(artifact.mime_type, "text/csv");
    assert_eq!(artifact.description, "Exported image metadata as CSV");

    assert_eq!(
        csv_rows(&artifact.bytes),
        vec![
            vec!["ImageName", "PixelSizeX", "PixelSizeY", "PixelSizeZ", "Channels", "TimeAxis", "dye"],
            vec!["A.tif", "512", "256", "3", "2", "10", "GFP"],
            vec!["B.tif", "512", "256", "3", "2", "10", ""],
        ]
    );
}

#[tokio::test]
async fn test_later_annotations_win_and_other_kinds_are_ignored() {
    let repository = InMemoryRepository::new().with_image(
        image(10, "cells.ome.tif")
            .with_key_values([("dye", "GFP"), ("stage", "G1")])
            .with_annotation(Annotation::Tag {
                text: "mitosis".to_string(),
            })
            .with_key_values([("dye", "RFP")]),
    );
    let (repository, status) = run_export(
        repository,
        ExportRequest::new(EntityKind::Image, vec![ObjectId::new(10)], TableFormat::Csv),
    )
    .await;

    assert!(status.is_ok());
    let (_, artifact) = &repository.uploads()[0];
    assert_eq!(artifact.file_name, "cells.ome.csv");
    let rows = csv_rows(&artifact.bytes);
    assert_eq!(rows[0][6..], ["dye".to_string(), "stage".to_string()]);
    assert_eq!(rows[1][6..], ["RFP".to_string(), "G1".to_string()]);
}

#[tokio::test]
async fn test_several_images_use_fallback_name() {
    let repository = InMemoryRepository::new()
        .with_image(image(10, "a.tif"))
        .with_image(image(11, "b.tif"));
    let (repository, _) = run_export(
        repository,
        ExportRequest::new(
            EntityKind::Image,
            vec![ObjectId::new(10), ObjectId::new(11)],
            TableFormat::Xlsx,
        ),
    )
    .await;

    let (_, artifact) = &repository.uploads()[0];
    assert_eq!(artifact.file_name, "MetadataImages.xlsx");
    assert_eq!(
        artifact.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[tokio::test]
async fn test_xlsx_export_is_readable() {
    let repository = InMemoryRepository::new().with_dataset(
        5,
        "Mitosis",
        vec![image(10, "A.tif").with_key_values([("dye", "GFP")])],
    );
    let (repository, _) = run_export(
        repository,
        ExportRequest::new(EntityKind::Dataset, vec![ObjectId::new(5)], TableFormat::Xlsx),
    )
    .await;

    let (_, artifact) = &repository.uploads()[0];
    let workbook = read_workbook(&artifact.bytes).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Metadata"]);
    let sheet = workbook.sheet("Metadata").unwrap();
    assert_eq!(sheet.rows[0][0], "ImageName");
    assert_eq!(sheet.rows[0][6], "dye");
    assert_eq!(sheet.rows[1], vec!["A.tif", "512", "256", "3", "2", "10", "GFP"]);
}

#[tokio::test]
async fn test_unknown_dataset_aborts_without_artifact() {
    let repository = InMemoryRepository::new().with_dataset(5, "Mitosis", vec![image(10, "A.tif")]);
    let (repository, status) = run_export(
        repository,
        ExportRequest::new(
            EntityKind::Dataset,
            vec![ObjectId::new(5), ObjectId::new(6)],
            TableFormat::Csv,
        ),
    )
    .await;

    assert_eq!(status.outcome, Outcome::Rejected);
    assert_eq!(status.message, "Invalid Dataset ID: 6");
    assert!(repository.uploads().is_empty());
}
