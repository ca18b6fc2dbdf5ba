//! Artifact identity and cached-filename derivation
//!
//! An artifact is identified by a Maven-style descriptor string,
//! `name:packaging[:classifier]:version`, which maps deterministically to
//! the filename the artifact is cached under. The derivation is pure: the
//! same descriptor always yields the same filename.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Identity of the renderer artifact to keep cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Artifact name (e.g. `almanac-cli`)
    pub name: String,
    /// Packaging / file extension (e.g. `jar`)
    pub packaging: String,
    /// Optional variant classifier (e.g. `all` for the shaded build)
    pub classifier: Option<String>,
    /// Artifact version
    pub version: String,
}

impl ArtifactSpec {
    /// Filename this artifact is cached under within a cache directory.
    ///
    /// Follows Maven naming: `{name}-{version}[-{classifier}].{packaging}`.
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.name, self.version, classifier, self.packaging
            ),
            None => format!("{}-{}.{}", self.name, self.version, self.packaging),
        }
    }
}

impl FromStr for ArtifactSpec {
    type Err = ConfigError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidArtifact {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = descriptor.split(':').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("descriptor segments must not be empty"));
        }

        match segments.as_slice() {
            [name, packaging, version] => Ok(Self {
                name: (*name).to_string(),
                packaging: (*packaging).to_string(),
                classifier: None,
                version: (*version).to_string(),
            }),
            [name, packaging, classifier, version] => Ok(Self {
                name: (*name).to_string(),
                packaging: (*packaging).to_string(),
                classifier: Some((*classifier).to_string()),
                version: (*version).to_string(),
            }),
            _ => Err(invalid(
                "expected name:packaging[:classifier]:version (3 or 4 segments)",
            )),
        }
    }
}

impl fmt::Display for ArtifactSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(classifier) => write!(
                f,
                "{}:{}:{}:{}",
                self.name, self.packaging, classifier, self.version
            ),
            None => write!(f, "{}:{}:{}", self.name, self.packaging, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let spec: ArtifactSpec = "almanac-cli:jar:all:4.3.2".parse().unwrap();
        assert_eq!(spec.name, "almanac-cli");
        assert_eq!(spec.packaging, "jar");
        assert_eq!(spec.classifier.as_deref(), Some("all"));
        assert_eq!(spec.version, "4.3.2");
    }

    #[test]
    fn test_parse_descriptor_without_classifier() {
        let spec: ArtifactSpec = "almanac-cli:jar:4.3.2".parse().unwrap();
        assert_eq!(spec.classifier, None);
        assert_eq!(spec.filename(), "almanac-cli-4.3.2.jar");
    }

    #[test]
    fn test_parse_rejects_malformed_descriptors() {
        assert!("almanac-cli:jar".parse::<ArtifactSpec>().is_err());
        assert!("a:b:c:d:e".parse::<ArtifactSpec>().is_err());
        assert!("almanac-cli::all:4.3.2".parse::<ArtifactSpec>().is_err());
        assert!("".parse::<ArtifactSpec>().is_err());
    }

    #[test]
    fn test_filename_is_deterministic() {
        let spec: ArtifactSpec = "almanac-cli:jar:all:4.3.2".parse().unwrap();
        assert_eq!(spec.filename(), spec.filename());
        assert_eq!(spec.filename(), "almanac-cli-4.3.2-all.jar");

        // An equal spec parsed separately derives the same filename
        let again: ArtifactSpec = "almanac-cli:jar:all:4.3.2".parse().unwrap();
        assert_eq!(spec.filename(), again.filename());
    }

    #[test]
    fn test_display_round_trips() {
        for descriptor in ["almanac-cli:jar:all:4.3.2", "almanac-cli:jar:4.3.2"] {
            let spec: ArtifactSpec = descriptor.parse().unwrap();
            assert_eq!(spec.to_string(), descriptor);
            let reparsed: ArtifactSpec = spec.to_string().parse().unwrap();
            assert_eq!(reparsed, spec);
        }
    }
}
