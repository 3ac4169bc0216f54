//! OperatorHub Fetch - remote inputs for OLM bundle generation
//!
//! - `ManifestSource`: installation manifests from local files or the
//!   Elastic download service, as one multi-document YAML stream
//! - `CatalogClient`: resolves a release tag to the certified operator image
//!   digest through the Red Hat container catalog API
//!
//! Every request is bounded by a timeout and never retried.

pub mod catalog;
pub mod error;
pub mod http;
pub mod source;

pub use catalog::{CatalogClient, Image, candidates_table};
pub use error::{FetchError, Result};
pub use http::HttpClient;
pub use source::{ManifestSource, ReleaseDownloader, read_local_manifests};
