//! Error types for fetching manifests and image digests

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::Image;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("request error {url}: {status}")]
    Http { url: String, status: String },

    #[error("failed to GET {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("request to {url} timed out after {}s", .timeout.as_secs_f32())]
    Timeout { url: String, timeout: Duration },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("when getting {url}: {source}")]
    Fallback {
        url: String,
        #[source]
        source: Box<FetchError>,
    },

    #[error("no image with tag {tag} in RedHat catalog")]
    NoImage { tag: String },

    #[error("found {} images with tag {tag} in RedHat catalog while only one is expected", .images.len())]
    MultipleImages { tag: String, images: Vec<Image> },

    #[error("image digest for {tag} is empty")]
    EmptyDigest { tag: String },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
