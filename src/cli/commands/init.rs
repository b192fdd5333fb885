//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and, optionally, an empty local repository.

use crate::adapters::local::LocalRepository;
use crate::config::parse_config;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "isalink.toml")]
    pub output: String,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Also create an empty repository at the configured root
    #[arg(long)]
    pub with_repository: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing isalink configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        if let Err(e) = fs::write(&self.output, config_content) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {}", e);
            return Ok(5); // Fatal error exit code
        }
        println!("✅ Configuration file created: {}", self.output);

        if self.with_repository {
            let config = parse_config(config_content)?;
            match LocalRepository::create(&config.repository.root, &config.repository.catalog_file)
            {
                Ok(repository) => {
                    println!("✅ Repository created: {}", repository.root().display())
                }
                Err(e) => {
                    println!("❌ Failed to create repository");
                    println!("   Error: {}", e);
                    return Ok(5);
                }
            }
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Validate configuration: isalink validate-config");
        println!("  3. Preview a workbook: isalink inspect <workbook.xlsx>");
        println!("  4. Import: isalink import --kind dataset --id <ID> --file-id <FILE_ID>");
        println!("  5. Export: isalink export --kind dataset --id <ID> --format xlsx");
        println!();
        Ok(0)
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> &'static str {
        r#"# isalink Configuration File

[application]
log_level = "info"
dry_run = false

[repository]
root = "./repository"
catalog_file = "catalog.json"

[import]
namespace_prefix = "ARC:ISA"
value_separator = ", "

[export]
format = "csv"
artifact_namespace = "omero.script_results"
fallback_file_name = "MetadataImages"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> &'static str {
        r#"# isalink Configuration File
#
# Every setting has a default; delete whatever you do not need to change.
# Values may reference environment variables as ${VAR_NAME}, and any
# setting can be overridden with ISALINK_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (parse and resolve, never write annotations)
dry_run = false

# ============================================================================
# Repository
# ============================================================================
[repository]
# Directory holding the catalog and the files it references
root = "./repository"

# Catalog document, relative to root
catalog_file = "catalog.json"

# ============================================================================
# Import (workbook -> key-value annotations)
# ============================================================================
[import]
# Namespaces are <prefix>:<SHEET>:<SECTION HEADER>
namespace_prefix = "ARC:ISA"

# Placed between the value cells of one row
value_separator = ", "

# ============================================================================
# Export (images -> table)
# ============================================================================
[export]
# Output format (csv, xlsx)
format = "csv"

# Namespace of the uploaded file annotation
artifact_namespace = "omero.script_results"

# File name used when the export is not named after a dataset or image
fallback_file_name = "MetadataImages"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
    }
}
