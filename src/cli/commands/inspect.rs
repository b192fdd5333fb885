//! Inspect command implementation
//!
//! Parses a workbook from the local file system, without any repository,
//! and prints the namespaces an import would create.

use crate::config::load_config_or_default;
use crate::core::import::{extract_metadata, Extraction, ExtractionSettings, NO_METADATA_MESSAGE};
use crate::domain::MetadataRecord;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Workbook to parse (xlsx, xlsm, xlsb, xls or ods)
    pub path: PathBuf,

    /// Print the mapping as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(path = %self.path.display(), "Inspecting workbook");

        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Failed to read {}: {}", self.path.display(), e);
                return Ok(5);
            }
        };

        match extract_metadata(&bytes, &ExtractionSettings::from(&config.import)) {
            Extraction::Extracted(record) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    print!("{}", render_record(&record));
                }
            }
            Extraction::Empty => println!("{NO_METADATA_MESSAGE}"),
            Extraction::Failed(reason) => {
                println!("{}: {}", NO_METADATA_MESSAGE.trim_end_matches('.'), reason)
            }
        }
        Ok(0)
    }
}

/// Plain-text listing, one namespace per block
fn render_record(record: &MetadataRecord) -> String {
    let mut out = String::new();
    for (namespace, attributes) in record {
        let _ = writeln!(out, "{namespace}");
        for (key, value) in attributes {
            let _ = writeln!(out, "  {key} = {value}");
        }
    }
    out
}
