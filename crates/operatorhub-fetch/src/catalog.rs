//! Red Hat container catalog client
//!
//! Resolves the certified operator image for a release tag to its digest, so
//! the certified bundle can reference the image as `@sha256:...`.

use serde::Deserialize;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;

/// Red Hat container catalog API
pub const DEFAULT_CATALOG_URL: &str = "https://catalog.redhat.com/api/containers/v1";

/// Timeout for the catalog lookup
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// One image record of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    pub creation_date: String,
    pub docker_image_digest: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Images {
    data: Vec<Image>,
}

/// Client for the certification project images endpoint
pub struct CatalogClient {
    client: HttpClient,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_CATALOG_URL, CATALOG_TIMEOUT)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn images_url(&self, project_id: &str, tag: &str) -> Result<Url> {
        let raw = format!(
            "{}/projects/certification/id/{}/images",
            self.base_url, project_id
        );
        let mut url = Url::parse(&raw).map_err(|source| FetchError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("filter", &format!("repositories.tags.name=={tag};deleted==false"));
        Ok(url)
    }

    /// Digest of the single non-deleted image tagged `tag` in `project_id`
    pub async fn image_digest(&self, api_key: &str, project_id: &str, tag: &str) -> Result<String> {
        let url = self.images_url(project_id, tag)?;
        debug!(project_id, tag, "querying container catalog");

        let body = self
            .client
            .get(
                url.as_str(),
                &[
                    ("Content-Type", "application/json"),
                    ("Accept", "application/json"),
                    ("X-API-KEY", api_key),
                ],
            )
            .await?;

        let images: Images = serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        let digest = select_digest(images.data, tag)?;
        info!(tag, digest = %digest, "resolved operator image digest");
        Ok(digest)
    }
}

/// Exactly one image must match, and it must carry a digest
pub fn select_digest(mut images: Vec<Image>, tag: &str) -> Result<String> {
    if images.len() > 1 {
        return Err(FetchError::MultipleImages {
            tag: tag.to_string(),
            images,
        });
    }

    let Some(image) = images.pop() else {
        return Err(FetchError::NoImage {
            tag: tag.to_string(),
        });
    };

    if image.docker_image_digest.is_empty() {
        return Err(FetchError::EmptyDigest {
            tag: tag.to_string(),
        });
    }

    Ok(image.docker_image_digest)
}

/// Table of candidate images, one per line, to help pick the right one
pub fn candidates_table(images: &[Image]) -> String {
    let mut table = String::from("id                       creation_date                    docker_image_digest\n");
    for image in images {
        let _ = writeln!(
            table,
            "{} {} {}",
            image.id, image.creation_date, image.docker_image_digest
        );
    }
    table
}
