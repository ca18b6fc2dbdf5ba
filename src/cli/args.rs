//! Command-line argument parsing for Almanac Fetcher
//!
//! This module defines the CLI structure using clap derive macros. The
//! `update` subcommand carries the artifact-acquisition options; `cache`
//! offers basic cache maintenance.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::env;

/// Almanac Fetcher - keep the report renderer available locally
#[derive(Parser, Debug)]
#[command(
    name = "almanac_fetcher",
    version,
    about = "Makes sure the Almanac report renderer CLI is available and up to date",
    long_about = "Companion tool for the Almanac reporting toolkit. Guarantees the renderer
CLI artifact is present in a local cache directory, downloading it from the
artifact repository only when it is missing."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache directory path (absolute, or relative to the working directory)
    #[arg(long, global = true, value_name = "DIR", env = env::CACHE_DIR)]
    pub cache_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make sure the renderer artifact is cached, downloading it if needed
    Update(UpdateArgs),

    /// Cache maintenance and information
    Cache(CacheArgs),
}

/// Arguments for the update command
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Ignore SSL certificate validation when downloading
    #[arg(long)]
    pub ignore_ssl: bool,

    /// Artifact repository URL
    #[arg(short, long, value_name = "URL", env = env::REPOSITORY)]
    pub repository: Option<String>,

    /// Artifact descriptor (name:packaging[:classifier]:version)
    #[arg(short, long, value_name = "DESCRIPTOR", env = env::ARTIFACT)]
    pub artifact: Option<String>,

    /// Show the download progress bar; defaults to off on CI servers to
    /// avoid polluting the logs
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub progress: Option<bool>,
}

/// Arguments for cache maintenance
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache maintenance actions
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache location and contents
    Info,

    /// Remove cached artifact files
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        let cli_quiet = Cli {
            global: GlobalArgs {
                verbose: false,
                very_verbose: false,
                quiet: true,
                config: None,
                cache_dir: None,
            },
            command: Commands::Update(UpdateArgs::default()),
        };

        let cli_verbose = Cli {
            global: GlobalArgs {
                verbose: true,
                very_verbose: false,
                quiet: false,
                config: None,
                cache_dir: None,
            },
            command: Commands::Update(UpdateArgs::default()),
        };

        assert_eq!(cli_quiet.log_level(), tracing::Level::ERROR);
        assert_eq!(cli_verbose.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_update_args_parsing() {
        let cli = Cli::try_parse_from([
            "almanac_fetcher",
            "update",
            "--cache-dir",
            "./cache",
            "--ignore-ssl",
            "--repository",
            "https://mirror.example.com/releases",
            "--artifact",
            "almanac-cli:jar:all:5.0.0",
        ])
        .unwrap();

        assert_eq!(cli.global.cache_dir, Some(PathBuf::from("./cache")));
        match cli.command {
            Commands::Update(args) => {
                assert!(args.ignore_ssl);
                assert_eq!(
                    args.repository.as_deref(),
                    Some("https://mirror.example.com/releases")
                );
                assert_eq!(args.artifact.as_deref(), Some("almanac-cli:jar:all:5.0.0"));
                assert_eq!(args.progress, None);
            }
            other => panic!("expected update command, got {:?}", other),
        }
    }

    #[test]
    fn test_progress_flag_forms() {
        let bare = Cli::try_parse_from(["almanac_fetcher", "update", "--progress"]).unwrap();
        match bare.command {
            Commands::Update(args) => assert_eq!(args.progress, Some(true)),
            other => panic!("expected update command, got {:?}", other),
        }

        let explicit =
            Cli::try_parse_from(["almanac_fetcher", "update", "--progress", "false"]).unwrap();
        match explicit.command {
            Commands::Update(args) => assert_eq!(args.progress, Some(false)),
            other => panic!("expected update command, got {:?}", other),
        }
    }
}
