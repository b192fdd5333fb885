//! Import command implementation
//!
//! This module implements the `import` command, which attaches the contents
//! of an ISA workbook stored in the repository to one or more containers.

use super::{load_or_exit, open_or_exit, report};
use crate::core::import::{ExtractionSettings, ImportCoordinator, ImportRequest};
use crate::domain::{EntityKind, ObjectId};
use clap::Args;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Target kind (project, dataset or screen)
    #[arg(short, long, default_value = "dataset")]
    pub kind: EntityKind,

    /// Target ID; only the first of several receives the metadata
    #[arg(long = "id", value_delimiter = ',')]
    pub ids: Vec<ObjectId>,

    /// File annotation ID of the workbook
    #[arg(short, long)]
    pub file_id: ObjectId,

    /// Dry run mode - parse and resolve without writing annotations
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let config = match load_or_exit(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        let repository = match open_or_exit(&config) {
            Ok(repository) => repository,
            Err(code) => return Ok(code),
        };

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no annotations will be written");
        }

        let coordinator =
            ImportCoordinator::new(repository, ExtractionSettings::from(&config.import));
        let request = ImportRequest::new(self.kind, self.ids.clone(), self.file_id)
            .with_dry_run(dry_run);

        let status = coordinator.run(&request).await?;
        Ok(report(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_exits_with_configuration_code() {
        let dir = TempDir::new().unwrap();
        let missing: PathBuf = dir.path().join("absent.toml");
        let args = ImportArgs {
            kind: EntityKind::Dataset,
            ids: vec![ObjectId::new(1)],
            file_id: ObjectId::new(2),
            dry_run: false,
        };
        let code = args.execute(missing.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 2);
    }
}
