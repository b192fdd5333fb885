//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the isalink configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the repository catalog can be opened
    #[arg(long)]
    pub check_repository: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Repository: {}", config.repository.root.display());
        println!("  Catalog: {}", config.repository.catalog_path().display());
        println!("  Namespace Prefix: {}", config.import.namespace_prefix);
        println!("  Value Separator: {:?}", config.import.value_separator);
        println!("  Export Format: {}", config.export.format);
        println!("  Artifact Namespace: {}", config.export.artifact_namespace);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );
        println!();

        if self.check_repository {
            match crate::adapters::local::LocalRepository::open(&config.repository) {
                Ok(_) => println!("✅ Repository catalog opened"),
                Err(e) => {
                    println!("❌ Repository catalog could not be opened");
                    println!("   Error: {e}");
                    return Ok(5);
                }
            }
        }

        Ok(0)
    }
}
