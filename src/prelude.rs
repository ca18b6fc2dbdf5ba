//! Prelude module for Almanac Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use almanac_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use almanac_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let plan = UpdatePlan {
//!         artifact: DEFAULT_ARTIFACT.parse()?,
//!         cache_dir: "./cache".into(),
//!         repository: url::Url::parse(DEFAULT_REPOSITORY)
//!             .map_err(|e| AppError::generic(e.to_string()))?,
//!         ignore_ssl: false,
//!         show_progress: true,
//!     };
//!
//!     let outcome = run_update(plan, &HttpFetcher::new()).await?;
//!     println!("artifact at {}", outcome.path().display());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    ArtifactFetcher, ArtifactSpec, CacheDir, FetchRequest, FetcherConfig, HttpFetcher, Presence,
    PresenceReport, UpdateOutcome, UpdatePipeline, UpdatePlan,
};

// Pipeline driver
pub use crate::cli::run_update;

// Commonly used constants
pub use crate::constants::{DEFAULT_ARTIFACT, DEFAULT_REPOSITORY, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};

// Common external crate re-exports for convenience
pub use tokio;
pub use url;
