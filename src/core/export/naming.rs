//! Artifact naming

use super::serializer::TableFormat;
use crate::domain::{EntityKind, ImageRecord};
use std::path::Path;

/// Chooses the artifact file name
///
/// A dataset export is named after the first dataset, a single image after
/// the image without its extension, anything else after `fallback`.
pub fn artifact_file_name(
    kind: EntityKind,
    first_dataset_name: Option<&str>,
    images: &[ImageRecord],
    fallback: &str,
    format: TableFormat,
) -> String {
    let base = match kind {
        EntityKind::Dataset => first_dataset_name
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string),
        EntityKind::Image if images.len() == 1 => Some(image_base_name(&images[0].name)),
        _ => None,
    }
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| fallback.to_string());

    format!("{}.{}", base, format.extension())
}

/// Image name with its last extension removed
fn image_base_name(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
