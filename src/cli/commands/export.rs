//! Export command implementation
//!
//! This module implements the `export` command, which writes the geometry and
//! key-value annotations of images to a table and stores it as an artifact.

use super::{load_or_exit, open_or_exit, report};
use crate::core::export::{resolve_format, ExportCoordinator, ExportRequest, ExportSettings};
use crate::domain::{EntityKind, ObjectId};
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Source kind (dataset or image)
    #[arg(short, long, default_value = "dataset")]
    pub kind: EntityKind,

    /// Source ID(s), comma-separated or repeated
    #[arg(long = "id", value_delimiter = ',')]
    pub ids: Vec<ObjectId>,

    /// Output format (csv or xlsx); defaults to the configured format
    #[arg(long)]
    pub format: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_or_exit(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let format = match resolve_format(self.format.as_deref(), &config.export) {
            Ok(format) => format,
            Err(e) => {
                tracing::error!(error = %e, "Invalid export format");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let repository = match open_or_exit(&config) {
            Ok(repository) => repository,
            Err(code) => return Ok(code),
        };

        let coordinator = ExportCoordinator::new(repository, ExportSettings::from(&config.export));
        let request = ExportRequest::new(self.kind, self.ids.clone(), format);

        let status = coordinator.run(&request).await?;
        Ok(report(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_unknown_format_exits_with_configuration_code() {
        let mut config = NamedTempFile::new().unwrap();
        config.write_all(b"[application]\nlog_level = \"info\"\n").unwrap();

        let args = ExportArgs {
            kind: EntityKind::Dataset,
            ids: vec![ObjectId::new(1)],
            format: Some("ods".to_string()),
        };
        let code = args
            .execute(config.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
