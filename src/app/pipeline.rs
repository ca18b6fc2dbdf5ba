//! The update pipeline
//!
//! Three stages run strictly in sequence, each consuming the successful
//! result of the previous one: guarantee the cache directory, check whether
//! the artifact is already cached, fetch it only when it is missing. Each
//! stage fails with its own error type and a failure stops the pipeline;
//! nothing is retried.
//!
//! The stages are exposed as separate methods rather than one opaque call so
//! the command layer can emit its user-facing messages between transitions,
//! and so tests can drive the exact state machine:
//! `EnsuringDirectory → CheckingPresence → Fetching/Skipped → Done`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::app::artifact::ArtifactSpec;
use crate::app::cache::{probe, CacheDir};
use crate::app::fetcher::{ArtifactFetcher, FetchRequest};
use crate::errors::{AccessResult, DirectoryResult, FetchResult};

/// Immutable, fully-resolved options for one update invocation.
///
/// Produced once by the configuration-resolution step before the pipeline
/// starts; no stage consults ambient state afterwards.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    /// Artifact to keep cached
    pub artifact: ArtifactSpec,
    /// Candidate cache directory (may still be relative; stage 1 anchors it)
    pub cache_dir: PathBuf,
    /// Repository the artifact is fetched from
    pub repository: Url,
    /// Skip TLS certificate validation during the fetch
    pub ignore_ssl: bool,
    /// Render download progress feedback
    pub show_progress: bool,
}

/// Outcome of the presence check, reused by the conditional fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    /// Expected path of the cached artifact
    pub path: PathBuf,
    /// True when the artifact is absent and a fetch is needed
    pub missing: bool,
}

/// Final state of a completed update invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The artifact was already cached; no network action was taken
    UpToDate {
        /// Path of the cached artifact
        path: PathBuf,
    },
    /// The artifact was downloaded into the cache
    Downloaded {
        /// Path the artifact was written to
        path: PathBuf,
    },
}

impl UpdateOutcome {
    /// Path of the cached artifact regardless of how it got there
    pub fn path(&self) -> &Path {
        match self {
            UpdateOutcome::UpToDate { path } | UpdateOutcome::Downloaded { path } => path,
        }
    }
}

/// Sequential three-stage pipeline over a resolved plan
pub struct UpdatePipeline {
    plan: UpdatePlan,
}

impl UpdatePipeline {
    /// Creates a pipeline for the given plan
    pub fn new(plan: UpdatePlan) -> Self {
        Self { plan }
    }

    /// The plan this pipeline executes
    pub fn plan(&self) -> &UpdatePlan {
        &self.plan
    }

    /// Stage 1: guarantee the cache directory exists
    pub async fn ensure_directory(&self) -> DirectoryResult<CacheDir> {
        CacheDir::ensure(&self.plan.cache_dir).await
    }

    /// Stage 2: derive the expected cached path and test for its presence
    pub async fn check_presence(&self, cache: &CacheDir) -> AccessResult<PresenceReport> {
        let path = cache.entry_for(&self.plan.artifact);
        let presence = probe(&path).await?;

        debug!(
            "presence check for {}: {:?}",
            self.plan.artifact, presence
        );
        Ok(PresenceReport {
            missing: presence.is_missing(),
            path,
        })
    }

    /// Stage 3: fetch the artifact, but only when the presence check said it
    /// is missing. Returns the downloaded path, or `None` when the fetch was
    /// skipped.
    pub async fn fetch_if_missing<F: ArtifactFetcher>(
        &self,
        cache: &CacheDir,
        report: &PresenceReport,
        fetcher: &F,
    ) -> FetchResult<Option<PathBuf>> {
        if !report.missing {
            debug!("fetch skipped, artifact already cached");
            return Ok(None);
        }

        let request = FetchRequest {
            artifact: self.plan.artifact.clone(),
            cache_dir: cache.root().to_path_buf(),
            repository: self.plan.repository.clone(),
            ignore_ssl: self.plan.ignore_ssl,
            show_progress: self.plan.show_progress,
        };

        let path = fetcher.fetch(&request).await?;
        info!("artifact cached at {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::errors::FetchError;

    struct CountingFetcher {
        calls: Mutex<usize>,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ArtifactFetcher for CountingFetcher {
        async fn fetch(&self, request: &FetchRequest) -> FetchResult<PathBuf> {
            *self.calls.lock().unwrap() += 1;
            let destination = request.destination();
            tokio::fs::write(&destination, b"jar bytes")
                .await
                .map_err(|source| FetchError::Io {
                    path: destination.clone(),
                    source,
                })?;
            Ok(destination)
        }
    }

    fn plan(cache_dir: PathBuf) -> UpdatePlan {
        UpdatePlan {
            artifact: "almanac-cli:jar:all:4.3.2".parse().unwrap(),
            cache_dir,
            repository: Url::parse("https://artifacts.almanac.dev/releases").unwrap(),
            ignore_ssl: false,
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_presence_report_path_matches_cache_entry() {
        let temp = TempDir::new().unwrap();
        let pipeline = UpdatePipeline::new(plan(temp.path().to_path_buf()));

        let cache = pipeline.ensure_directory().await.unwrap();
        let report = pipeline.check_presence(&cache).await.unwrap();

        assert!(report.missing);
        assert_eq!(report.path, cache.entry_for(&pipeline.plan().artifact));
    }

    #[tokio::test]
    async fn test_fetch_skipped_when_present() {
        let temp = TempDir::new().unwrap();
        let pipeline = UpdatePipeline::new(plan(temp.path().to_path_buf()));
        let cache = pipeline.ensure_directory().await.unwrap();

        std::fs::write(cache.entry_for(&pipeline.plan().artifact), b"cached").unwrap();
        let report = pipeline.check_presence(&cache).await.unwrap();
        assert!(!report.missing);

        let fetcher = CountingFetcher::new();
        let downloaded = pipeline
            .fetch_if_missing(&cache, &report, &fetcher)
            .await
            .unwrap();

        assert_eq!(downloaded, None);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_runs_when_missing() {
        let temp = TempDir::new().unwrap();
        let pipeline = UpdatePipeline::new(plan(temp.path().to_path_buf()));
        let cache = pipeline.ensure_directory().await.unwrap();

        let report = pipeline.check_presence(&cache).await.unwrap();
        assert!(report.missing);

        let fetcher = CountingFetcher::new();
        let downloaded = pipeline
            .fetch_if_missing(&cache, &report, &fetcher)
            .await
            .unwrap();

        assert_eq!(downloaded, Some(report.path.clone()));
        assert_eq!(fetcher.call_count(), 1);
        assert!(report.path.is_file());
    }
}
