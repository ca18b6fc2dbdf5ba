//! Almanac Fetcher CLI application
//!
//! Command-line companion for the Almanac reporting toolkit. Makes sure the
//! renderer CLI artifact is cached locally, downloading it only when needed.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use almanac_fetcher::cli::{handle_cache, handle_update, Cli, Commands};
use almanac_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    // Every stage failure surfaces here with its stage-tagged message
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("Almanac Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let Cli { global, command } = cli;

    // Execute the appropriate command
    match command {
        Commands::Update(args) => {
            info!("Executing update command");
            handle_update(&global, args).await
        }
        Commands::Cache(args) => {
            info!("Executing cache command");
            handle_cache(&global, args).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    // Create environment filter
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("almanac_fetcher={}", log_level).parse().unwrap());

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
