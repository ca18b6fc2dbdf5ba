//! Artifact download capability
//!
//! The pipeline consumes downloading as a single capability behind the
//! `ArtifactFetcher` trait: "fetch this artifact from that repository into
//! this directory, optionally insecure, optionally with progress feedback".
//! `HttpFetcher` is the production implementation; tests substitute mocks.
//!
//! Downloads stream to a `.tmp` sibling and are renamed into place once
//! complete, so an interrupted transfer never leaves a half-written file
//! under the artifact's final name. A concurrent invocation can still race
//! the pre-rename window and download redundantly; re-running is idempotent.
//! There is no retry: the first failure is reported and the invocation ends.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::artifact::ArtifactSpec;
use crate::constants::{files, http};
use crate::errors::{FetchError, FetchResult};

/// Everything the conditional-fetch stage hands to the download capability
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Which artifact to fetch
    pub artifact: ArtifactSpec,
    /// Resolved cache directory the artifact lands in
    pub cache_dir: PathBuf,
    /// Repository root, passed through unmodified from the invocation
    pub repository: Url,
    /// Skip TLS certificate validation
    pub ignore_ssl: bool,
    /// Render progress feedback while streaming
    pub show_progress: bool,
}

impl FetchRequest {
    /// Final path the artifact is cached under
    pub fn destination(&self) -> PathBuf {
        self.cache_dir.join(self.artifact.filename())
    }
}

/// External collaborator that places an artifact file into the cache
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Download the requested artifact into the cache directory and return
    /// the path it was written to.
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<PathBuf>;
}

/// Tunable knobs for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Overall request timeout
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// User agent sent with the download request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// Production fetcher downloading over HTTP(S) with reqwest
pub struct HttpFetcher {
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Creates a fetcher with default configuration
    pub fn new() -> Self {
        Self::with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with the given configuration
    pub fn with_config(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Build the HTTP client for one download
    fn build_client(&self, ignore_ssl: bool) -> FetchResult<Client> {
        if ignore_ssl {
            warn!("TLS certificate validation is disabled for this download");
        }

        Client::builder()
            .timeout(self.config.request_timeout)
            .connect_timeout(self.config.connect_timeout)
            .user_agent(self.config.user_agent.clone())
            .danger_accept_invalid_certs(ignore_ssl)
            .build()
            .map_err(FetchError::Http)
    }

    /// Download URL for an artifact: `{repository}/{name}/{version}/{filename}`
    fn artifact_url(repository: &Url, artifact: &ArtifactSpec) -> FetchResult<Url> {
        let mut url = repository.clone();

        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|_| FetchError::InvalidRepository {
                        url: repository.to_string(),
                    })?;
            segments.pop_if_empty();
            segments.push(&artifact.name);
            segments.push(&artifact.version);
            segments.push(&artifact.filename());
        }

        Ok(url)
    }

    /// Temp-file sibling used until the download completes
    fn temp_path(destination: &Path) -> PathBuf {
        destination.with_extension(format!(
            "{}{}",
            destination
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or(""),
            files::TEMP_FILE_SUFFIX
        ))
    }

    /// Progress feedback for one transfer; hidden unless requested and
    /// stderr is a terminal
    fn progress_bar(request: &FetchRequest, total: Option<u64>) -> ProgressBar {
        if !request.show_progress || !atty::is(atty::Stream::Stderr) {
            return ProgressBar::hidden();
        }

        match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
                        )
                        .unwrap()
                        .progress_chars("##-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {bytes} downloaded")
                        .unwrap()
                        .tick_strings(&["◐", "◓", "◑", "◒"]),
                );
                bar.enable_steady_tick(Duration::from_millis(120));
                bar
            }
        }
    }

    /// Stream the response body into the temp file
    async fn write_body(
        &self,
        mut response: reqwest::Response,
        temp_path: &Path,
        request: &FetchRequest,
    ) -> FetchResult<()> {
        let bar = Self::progress_bar(request, response.content_length());

        let io_err = |source: std::io::Error| FetchError::Io {
            path: temp_path.to_path_buf(),
            source,
        };

        let mut file = File::create(temp_path).await.map_err(io_err)?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await.map_err(io_err)?;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(io_err)?;

        bar.finish_and_clear();
        Ok(())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<PathBuf> {
        let client = self.build_client(request.ignore_ssl)?;
        let url = Self::artifact_url(&request.repository, &request.artifact)?;
        info!("fetching {} from {}", request.artifact, url);

        let response = client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::ServerError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let destination = request.destination();
        let temp_path = Self::temp_path(&destination);

        match self.write_body(response, &temp_path, request).await {
            Ok(()) => {
                fs::rename(&temp_path, &destination)
                    .await
                    .map_err(|_e| FetchError::AtomicRename {
                        temp_path: temp_path.clone(),
                        final_path: destination.clone(),
                    })?;
                info!("downloaded {}", destination.display());
                Ok(destination)
            }
            Err(err) => {
                // Leave no partial file behind under any name
                if fs::metadata(&temp_path).await.is_ok() {
                    let _ = fs::remove_file(&temp_path).await;
                    debug!("removed partial download {}", temp_path.display());
                }
                Err(err)
            }
        }
    }
}
