//! Release configuration
//!
//! Loaded from the YAML file passed with `--conf`. It carries the versions of
//! the release being packaged, the human-authored CRD metadata that the
//! manifests do not contain, and one entry per OLM package to generate.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Release configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Version being released
    #[serde(default)]
    pub new_version: String,

    /// Version this release replaces
    #[serde(default)]
    pub prev_version: String,

    /// Elastic Stack version shipped with this release
    #[serde(default)]
    pub stack_version: String,

    /// Display metadata for CRDs
    #[serde(default)]
    pub crds: Vec<CrdConfig>,

    /// Packages to generate
    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

/// Human-authored metadata for one CRD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

/// Settings for one generated OLM package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    /// Base directory the bundle is written to
    pub output_path: PathBuf,

    pub package_name: String,

    /// Passed to the operator as `--distribution-channel`
    #[serde(default)]
    pub distribution_channel: String,

    /// Image repository of the operator
    #[serde(default)]
    pub operator_repo: String,

    /// Only reference UBI based images
    #[serde(default)]
    pub ubi_only: bool,

    /// Reference the operator image by digest instead of tag
    #[serde(default)]
    pub digest_pinning: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&content).map_err(|source| CoreError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Whether any package needs the operator image digest
    pub fn has_digest_pinning(&self) -> bool {
        self.packages.iter().any(|p| p.digest_pinning)
    }
}
