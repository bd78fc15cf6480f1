//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod live;
mod matching;
mod nas;
mod pattern;
mod udm;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use udm_dash::config::{load_settings_with_options, LoadOptions};
use udm_dash::models::{MatchingStatus, ScanMode};
use udm_dash::ApiClient;

#[derive(Parser)]
#[command(name = "udm-dash")]
#[command(about = "Matching status dashboard for the archive indexing pipeline")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend API base URL (overrides config and UDM_DASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Show the matching matrix (NAS files vs. sheet segments vs. UDM)
    Matrix {
        /// Status filter: all, complete, partial, warning, pending, no_metadata, orphan
        #[arg(short, long, default_value = "all")]
        status: String,
        /// Case-insensitive file name search
        #[arg(short = 'q', long, default_value = "")]
        search: String,
        /// Sort key: file_name, segment_count or status (anything else keeps backend order)
        #[arg(long, default_value = "file_name")]
        sort: String,
        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
        /// Show segment rows for this file (repeatable)
        #[arg(short, long)]
        expand: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show matching statistics and coverage
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show detailed segments of one file
    Segments {
        /// File name as listed in the matrix
        file_name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the NAS folder tree with aggregated file counts
    Folders {
        /// Limit tree depth (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        depth: usize,
    },

    /// List files in a NAS folder
    Files {
        /// Folder path on the NAS
        path: String,
    },

    /// Show NAS scan cache status
    ScanStatus,

    /// Trigger a NAS rescan
    Refresh {
        #[arg(long, value_enum, default_value = "full")]
        mode: ScanMode,
    },

    /// Inspect and load UDM data
    Udm {
        #[command(subcommand)]
        command: UdmCommands,
    },

    /// File-name pattern matching diagnostics
    Pattern {
        #[command(subcommand)]
        command: PatternCommands,
    },

    /// Live matching dashboard (TUI)
    Live,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum UdmCommands {
    /// List assets from the loaded UDM document
    List {
        #[command(flatten)]
        filters: udm::FilterArgs,
    },
    /// Show full assets with field completion
    Assets {
        #[command(flatten)]
        filters: udm::FilterArgs,
        /// Keep only assets with (true) or without (false) segments
        #[arg(long)]
        has_segments: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show UDM distribution statistics
    Stats,
    /// Show one asset with per-field completion
    Asset {
        asset_uuid: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known brands
    Brands,
    /// List known asset types
    AssetTypes,
    /// Load a UDM JSON file on the backend host
    Load { file_path: String },
    /// Load demo data
    Demo,
    /// Convert the cached NAS scan to UDM
    FromNas,
    /// Print the UDM field schema
    Schema {
        /// Print segment fields instead of asset fields
        #[arg(long)]
        segments: bool,
    },
}

#[derive(Subcommand)]
enum PatternCommands {
    /// Show pattern matching statistics
    Stats,
    /// List known patterns
    List {
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// List files no pattern matched
    Unmatched {
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// Show how a NAS file's name was matched
    Match { file_name: String },
    /// Test the backend parser against a file name
    Test {
        file_name: String,
        /// Custom regex to test instead of the built-in patterns
        #[arg(long)]
        regex: Option<String>,
    },
    /// Refresh the backend pattern cache
    Refresh,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved settings and where they came from
    Show,
}

/// Parse a `--status` value; `all` means no status filter.
fn parse_status(value: &str) -> anyhow::Result<Option<MatchingStatus>> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    MatchingStatus::from_str(value)
        .map(Some)
        .ok_or_else(|| anyhow::anyhow!("Unknown status '{}'", value))
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        api_url: cli.api_url,
    };
    let (settings, config) = load_settings_with_options(options)
        .await
        .context("Failed to load configuration")?;

    // Config commands work without a reachable backend
    if let Commands::Config {
        command: ConfigCommands::Show,
    } = &cli.command
    {
        return config_cmd::cmd_config_show(&settings, &config);
    }

    let api = ApiClient::new(&settings).context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Matrix {
            status,
            search,
            sort,
            order,
            expand,
            json,
        } => {
            let args = matching::MatrixArgs {
                status: parse_status(&status)?,
                search,
                sort,
                order,
                expand,
                json,
            };
            matching::cmd_matrix(&api, args).await
        }
        Commands::Stats { json } => matching::cmd_stats(&api, json).await,
        Commands::Segments { file_name, json } => {
            matching::cmd_segments(&api, &file_name, json).await
        }
        Commands::Folders { depth } => nas::cmd_folders(&api, depth).await,
        Commands::Files { path } => nas::cmd_files(&api, &path).await,
        Commands::ScanStatus => nas::cmd_scan_status(&api).await,
        Commands::Refresh { mode } => nas::cmd_refresh(&api, mode).await,
        Commands::Udm { command } => match command {
            UdmCommands::List { filters } => udm::cmd_list(&api, filters.into_filters(None)).await,
            UdmCommands::Assets {
                filters,
                has_segments,
                json,
            } => udm::cmd_assets(&api, filters.into_filters(has_segments), json).await,
            UdmCommands::Stats => udm::cmd_stats(&api).await,
            UdmCommands::Asset { asset_uuid, json } => {
                udm::cmd_asset(&api, &asset_uuid, json).await
            }
            UdmCommands::Brands => udm::cmd_brands(&api).await,
            UdmCommands::AssetTypes => udm::cmd_asset_types(&api).await,
            UdmCommands::Load { file_path } => udm::cmd_load(&api, &file_path).await,
            UdmCommands::Demo => udm::cmd_demo(&api).await,
            UdmCommands::FromNas => udm::cmd_from_nas(&api).await,
            UdmCommands::Schema { segments } => udm::cmd_schema(segments),
        },
        Commands::Pattern { command } => match command {
            PatternCommands::Stats => pattern::cmd_stats(&api).await,
            PatternCommands::List { limit, offset } => {
                pattern::cmd_list(&api, limit, offset).await
            }
            PatternCommands::Unmatched { limit, offset } => {
                pattern::cmd_unmatched(&api, limit, offset).await
            }
            PatternCommands::Match { file_name } => pattern::cmd_match(&api, &file_name).await,
            PatternCommands::Test { file_name, regex } => {
                pattern::cmd_test(&api, file_name, regex).await
            }
            PatternCommands::Refresh => pattern::cmd_refresh(&api).await,
        },
        Commands::Live => live::cmd_live(&api, &settings).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_matrix_flags_parse() {
        let cli = Cli::try_parse_from([
            "udm-dash", "matrix", "--status", "warning", "-q", "wsop", "--sort", "segment_count",
            "--order", "desc", "-e", "a.mp4", "-e", "b.mp4",
        ])
        .unwrap();
        match cli.command {
            Commands::Matrix {
                status,
                search,
                expand,
                ..
            } => {
                assert_eq!(status, "warning");
                assert_eq!(search, "wsop");
                assert_eq!(expand, vec!["a.mp4", "b.mp4"]);
            }
            _ => panic!("expected matrix"),
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("all").unwrap(), None);
        assert_eq!(
            parse_status("no_metadata").unwrap(),
            Some(MatchingStatus::NoMetadata)
        );
        assert!(parse_status("done").is_err());
    }
}
