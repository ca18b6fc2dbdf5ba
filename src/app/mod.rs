//! Core application logic for Almanac Fetcher
//!
//! This module contains the artifact identity model, the cache directory
//! management, the download capability, and the sequential update pipeline
//! that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use almanac_fetcher::app::{HttpFetcher, UpdatePipeline, UpdatePlan};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = UpdatePlan {
//!     artifact: "almanac-cli:jar:all:4.3.2".parse()?,
//!     cache_dir: "./cache".into(),
//!     repository: Url::parse("https://artifacts.almanac.dev/releases")?,
//!     ignore_ssl: false,
//!     show_progress: true,
//! };
//!
//! let pipeline = UpdatePipeline::new(plan);
//! let cache = pipeline.ensure_directory().await?;
//! let report = pipeline.check_presence(&cache).await?;
//! let fetcher = HttpFetcher::new();
//! pipeline.fetch_if_missing(&cache, &report, &fetcher).await?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod cache;
pub mod fetcher;
pub mod pipeline;

// Re-export main public API
pub use artifact::ArtifactSpec;
pub use cache::{default_root, probe, CacheDir, CacheStats, Presence};
pub use fetcher::{ArtifactFetcher, FetchRequest, FetcherConfig, HttpFetcher};
pub use pipeline::{PresenceReport, UpdateOutcome, UpdatePipeline, UpdatePlan};
