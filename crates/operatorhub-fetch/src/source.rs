//! Installation manifest sources

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{FetchError, Result};
use crate::http::HttpClient;

/// Elastic download service for ECK release artifacts
pub const DEFAULT_DOWNLOAD_URL: &str = "https://download.elastic.co/downloads/eck";

/// Timeout for each manifest download
pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(10);

const ALL_IN_ONE_MANIFEST: &str = "all-in-one.yaml";
const CRD_MANIFEST: &str = "crds.yaml";
const OPERATOR_MANIFEST: &str = "operator.yaml";

const YAML_SEPARATOR: &[u8] = b"---\n";

/// Where the installation manifests come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Local files, read in order
    Files(Vec<PathBuf>),
    /// Published manifests of a release
    Release(String),
}

impl ManifestSource {
    /// Local files when any are given, otherwise the published release
    pub fn new(paths: Vec<PathBuf>, version: &str) -> Self {
        if paths.is_empty() {
            Self::Release(version.to_string())
        } else {
            Self::Files(paths)
        }
    }

    /// Produce the concatenated manifest stream
    pub async fn load(&self, downloader: &ReleaseDownloader) -> Result<Vec<u8>> {
        match self {
            Self::Files(paths) => read_local_manifests(paths),
            Self::Release(version) => downloader.download(version).await,
        }
    }
}

/// Concatenate local manifest files, with a document separator after each
///
/// Without the separator the last document of one file and the first document
/// of the next would be parsed as a single document.
pub fn read_local_manifests(paths: &[PathBuf]) -> Result<Vec<u8>> {
    let mut stream = Vec::new();

    for path in paths {
        let contents = std::fs::read(path).map_err(|source| FetchError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "read manifest file");

        stream.extend_from_slice(&contents);
        if !contents.is_empty() && !contents.ends_with(b"\n") {
            stream.push(b'\n');
        }
        stream.extend_from_slice(YAML_SEPARATOR);
    }

    Ok(stream)
}

/// Downloads published release manifests
pub struct ReleaseDownloader {
    client: HttpClient,
    base_url: String,
}

impl ReleaseDownloader {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_DOWNLOAD_URL, MANIFEST_TIMEOUT)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, version: &str, file: &str) -> String {
        format!("{}/{}/{}", self.base_url, version, file)
    }

    /// Fetch the manifests of `version`
    ///
    /// Tries the all-in-one manifest first. Releases that do not publish one
    /// ship the CRDs and the operator as separate manifests instead.
    pub async fn download(&self, version: &str) -> Result<Vec<u8>> {
        let all_in_one = self.url(version, ALL_IN_ONE_MANIFEST);
        match self.client.get(&all_in_one, &[]).await {
            Err(err) if err.is_not_found() => {
                info!(version, "no all-in-one manifest, fetching CRD and operator manifests");
            }
            result => return result,
        }

        let crds = self.fetch_part(version, CRD_MANIFEST).await?;
        let operator = self.fetch_part(version, OPERATOR_MANIFEST).await?;

        let mut stream = crds;
        stream.extend_from_slice(YAML_SEPARATOR);
        stream.extend_from_slice(&operator);
        Ok(stream)
    }

    async fn fetch_part(&self, version: &str, file: &str) -> Result<Vec<u8>> {
        let url = self.url(version, file);
        self.client
            .get(&url, &[])
            .await
            .map_err(|source| FetchError::Fallback {
                url,
                source: Box::new(source),
            })
    }
}
