//! Cache directory management
//!
//! The cache is a flat directory holding renderer artifacts under their
//! deterministic filenames. This module covers the first two pipeline
//! stages' filesystem needs: guaranteeing the directory exists (idempotent
//! creation, relative paths anchored at the current working directory) and
//! probing whether a cached artifact is present. It also backs the `cache`
//! maintenance subcommand with a simple scan.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::app::artifact::ArtifactSpec;
use crate::constants::cache::DEFAULT_DIR_NAME;
use crate::errors::{AccessError, AccessResult, DirectoryError, DirectoryResult};

/// A cache directory that is guaranteed to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    /// Resolve `candidate` to an absolute path and make sure a directory
    /// exists there, creating missing intermediate segments.
    ///
    /// Idempotent: a second call on an existing directory is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` when the working directory cannot be
    /// determined or when creation fails (permissions, collision with a
    /// regular file, disk exhaustion).
    pub async fn ensure(candidate: &Path) -> DirectoryResult<Self> {
        let root = anchor_at_cwd(candidate)?;

        fs::create_dir_all(&root)
            .await
            .map_err(|source| DirectoryError::Create {
                path: root.clone(),
                source,
            })?;

        debug!("cache directory ready: {}", root.display());
        Ok(Self { root })
    }

    /// The resolved absolute root of this cache directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path the given artifact is cached under.
    ///
    /// Deterministic: same artifact, same cache directory, same path.
    pub fn entry_for(&self, artifact: &ArtifactSpec) -> PathBuf {
        self.root.join(artifact.filename())
    }

    /// Scan the cache for artifact files and sum their sizes
    pub async fn stats(&self) -> io::Result<CacheStats> {
        let mut stats = CacheStats::default();

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                stats.file_count += 1;
                stats.total_size += metadata.len();
            }
        }

        Ok(stats)
    }

    /// Remove all cached artifact files, returning how many were deleted.
    ///
    /// Subdirectories are left untouched.
    pub async fn clear_artifacts(&self) -> io::Result<usize> {
        let mut removed = 0;

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.metadata().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        info!("removed {} cached artifact file(s)", removed);
        Ok(removed)
    }
}

/// Whether a cached artifact file is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The file exists in the cache
    Present,
    /// The file does not exist; a fetch is needed
    Missing,
}

impl Presence {
    /// True when the artifact needs fetching
    pub fn is_missing(&self) -> bool {
        matches!(self, Presence::Missing)
    }
}

/// Test whether the cached artifact exists at `path`.
///
/// A missing file is a normal outcome (`Presence::Missing`); any other
/// failure of the existence check itself is an `AccessError`.
pub async fn probe(path: &Path) -> AccessResult<Presence> {
    match fs::metadata(path).await {
        Ok(_) => Ok(Presence::Present),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Presence::Missing),
        Err(source) => Err(AccessError::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Default cache location for the current platform
pub fn default_root() -> DirectoryResult<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(DEFAULT_DIR_NAME))
        .ok_or(DirectoryError::NoSystemDefault)
}

/// Anchor a possibly-relative candidate path at the working directory
fn anchor_at_cwd(candidate: &Path) -> DirectoryResult<PathBuf> {
    if candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|source| DirectoryError::Resolve { source })?;
    Ok(anchored(candidate, &cwd))
}

/// Pure anchoring of a candidate path against a given base directory
fn anchored(candidate: &Path, base: &Path) -> PathBuf {
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

/// Totals from a cache directory scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of artifact files in the cache
    pub file_count: usize,
    /// Combined size of the cached files in bytes
    pub total_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec() -> ArtifactSpec {
        "almanac-cli:jar:all:4.3.2".parse().unwrap()
    }

    #[tokio::test]
    async fn test_ensure_creates_missing_directory_chain() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("cache").join("dir");

        let cache = CacheDir::ensure(&target).await.unwrap();
        assert!(cache.root().is_dir());
        assert_eq!(cache.root(), target);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("cache");

        let first = CacheDir::ensure(&target).await.unwrap();
        let second = CacheDir::ensure(&target).await.unwrap();
        assert_eq!(first, second);
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_fails_on_regular_file_collision() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("occupied");
        std::fs::write(&target, b"not a directory").unwrap();

        let result = CacheDir::ensure(&target).await;
        assert!(matches!(result, Err(DirectoryError::Create { .. })));
    }

    #[tokio::test]
    async fn test_probe_distinguishes_present_and_missing() {
        let temp = TempDir::new().unwrap();
        let cache = CacheDir::ensure(temp.path()).await.unwrap();
        let path = cache.entry_for(&spec());

        assert_eq!(probe(&path).await.unwrap(), Presence::Missing);

        std::fs::write(&path, b"jar bytes").unwrap();
        assert_eq!(probe(&path).await.unwrap(), Presence::Present);
    }

    #[test]
    fn test_anchoring_is_pure_and_cwd_based() {
        let base = Path::new("/work/project");
        assert_eq!(
            anchored(Path::new("cache"), base),
            PathBuf::from("/work/project/cache")
        );
        assert_eq!(
            anchored(Path::new("./cache"), base),
            PathBuf::from("/work/project/./cache")
        );
        assert_eq!(
            anchored(Path::new("/abs/cache"), base),
            PathBuf::from("/abs/cache")
        );
    }

    #[tokio::test]
    async fn test_entry_for_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let cache = CacheDir::ensure(temp.path()).await.unwrap();

        assert_eq!(cache.entry_for(&spec()), cache.entry_for(&spec()));
        assert_eq!(
            cache.entry_for(&spec()),
            temp.path().join("almanac-cli-4.3.2-all.jar")
        );
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let temp = TempDir::new().unwrap();
        let cache = CacheDir::ensure(temp.path()).await.unwrap();

        std::fs::write(cache.root().join("a.jar"), b"aaaa").unwrap();
        std::fs::write(cache.root().join("b.jar"), b"bb").unwrap();
        std::fs::create_dir(cache.root().join("subdir")).unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size, 6);

        let removed = cache.clear_artifacts().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.stats().await.unwrap(), CacheStats::default());
        assert!(cache.root().join("subdir").is_dir());
    }
}
