//! Error types for Almanac Fetcher
//!
//! Errors are organised by pipeline stage rather than by underlying cause:
//! each stage of the update pipeline owns one error type, and a failure in
//! any stage is terminal for the invocation. The display strings carry a
//! stage-identifying prefix so an operator can tell "couldn't create the
//! cache directory" apart from "couldn't check the cache" apart from a
//! download failure.

use std::path::PathBuf;

use thiserror::Error;

/// Stage-one failures: the cache directory could not be resolved or created.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The current working directory could not be determined while anchoring
    /// a relative cache path
    #[error("couldn't resolve the cache directory path: {source}")]
    Resolve {
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed (permissions, collision with a regular
    /// file, disk exhaustion)
    #[error("couldn't create the cache directory at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No platform cache location is available and none was configured
    #[error("couldn't determine a default cache location for this platform; pass --cache-dir")]
    NoSystemDefault,
}

/// Stage-two failures: the presence check itself could not complete.
///
/// "File does not exist" is NOT an error here; it is the normal
/// `missing = true` outcome of the presence check.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The existence check failed for a reason other than the file being
    /// absent (e.g. permission denied on the cache directory)
    #[error("couldn't check the cache for {path}: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stage-three failures: the download did not produce a cached artifact.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport failure (connection, TLS validation, timeout)
    #[error("download request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The repository URL cannot carry artifact path segments
    #[error("repository URL {url} cannot be extended with an artifact path")]
    InvalidRepository { url: String },

    /// Server answered with a non-success status
    #[error("server returned HTTP {status} for {url}")]
    ServerError { status: u16, url: String },

    /// I/O failure while writing the downloaded bytes
    #[error("couldn't write the downloaded artifact to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The completed temp file could not be moved into its final place
    #[error("couldn't move {temp_path} into place at {final_path}")]
    AtomicRename {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Failures in the pre-pipeline resolution step (configuration file,
/// artifact descriptor, repository locator). Reported before any stage runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// The configuration file could not be read
    #[error("couldn't read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this tool
    #[error("invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// The artifact descriptor string does not parse
    #[error("invalid artifact descriptor '{descriptor}': {reason}")]
    InvalidArtifact { descriptor: String, reason: String },

    /// The repository locator is not a valid URL
    #[error("invalid repository URL '{url}': {source}")]
    InvalidRepository {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level application error that can represent any stage failure
#[derive(Error, Debug)]
pub enum AppError {
    /// Cache directory guarantor failure (stage 1)
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Presence check failure (stage 2)
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Download failure (stage 3)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Resolution-step failure (before stage 1)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error outside the pipeline stages
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if re-running the command might succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(FetchError::Http(_)) | AppError::Fetch(FetchError::ServerError { .. })
        )
    }

    /// Get error category for logging and diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Directory(_) => "directory",
            AppError::Access(_) => "access",
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Directory guarantor result type alias
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Presence check result type alias
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn not_found() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
    }

    #[test]
    fn test_stage_prefixes_are_distinct() {
        let dir = AppError::from(DirectoryError::Create {
            path: Path::new("/tmp/cache").to_path_buf(),
            source: not_found(),
        });
        let access = AppError::from(AccessError::Probe {
            path: Path::new("/tmp/cache/a.jar").to_path_buf(),
            source: not_found(),
        });
        let fetch = AppError::from(FetchError::ServerError {
            status: 502,
            url: "https://example.com/a.jar".to_string(),
        });

        assert!(dir.to_string().contains("create the cache directory"));
        assert!(access.to_string().contains("check the cache"));
        assert!(fetch.to_string().contains("server returned HTTP 502"));

        // No stage message leaks into another stage's diagnostic
        assert!(!fetch.to_string().contains("cache directory"));
        assert!(!access.to_string().contains("create"));
    }

    #[test]
    fn test_error_categories() {
        let err = AppError::from(AccessError::Probe {
            path: Path::new("x").to_path_buf(),
            source: not_found(),
        });
        assert_eq!(err.category(), "access");

        let err = AppError::generic("boom");
        assert_eq!(err.category(), "generic");
    }

    #[test]
    fn test_recoverability() {
        let server = AppError::from(FetchError::ServerError {
            status: 503,
            url: "https://example.com".to_string(),
        });
        assert!(server.is_recoverable());

        let dir = AppError::from(DirectoryError::NoSystemDefault);
        assert!(!dir.is_recoverable());
    }
}
