//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for isalink using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// isalink - ISA metadata bridge for image repositories
#[derive(Parser, Debug)]
#[command(name = "isalink")]
#[command(version, about, long_about = None)]
#[command(author = "isalink Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "isalink.toml", env = "ISALINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ISALINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import an ISA workbook as key-value annotations
    Import(commands::import::ImportArgs),

    /// Export image metadata to a CSV or xlsx artifact
    Export(commands::export::ExportArgs),

    /// Parse a local workbook and print its namespaces
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, ObjectId};

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from([
            "isalink", "import", "--kind", "project", "--id", "1,2", "--file-id", "7",
        ]);
        assert_eq!(cli.config, "isalink.toml");
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.kind, EntityKind::Project);
                assert_eq!(args.ids, vec![ObjectId::new(1), ObjectId::new(2)]);
                assert_eq!(args.file_id, ObjectId::new(7));
                assert!(!args.dry_run);
            }
            other => panic!("expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_repeated_ids() {
        let cli = Cli::parse_from([
            "isalink", "export", "--kind", "Image", "--id", "10", "--id", "11", "--format", "xlsx",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.kind, EntityKind::Image);
                assert_eq!(args.ids.len(), 2);
                assert_eq!(args.format.as_deref(), Some("xlsx"));
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["isalink", "export", "--kind", "plate", "--id", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["isalink", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["isalink", "--log-level", "debug", "inspect", "isa.xlsx"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["isalink", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
