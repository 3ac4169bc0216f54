//! OperatorHub Core - manifest extraction for OLM bundle generation
//!
//! This crate turns an operator's installation manifests into the data the
//! bundle templates consume:
//! - `Config`: release versions, CRD metadata and per-package settings
//! - `DocumentReader`: splits a multi-document YAML stream
//! - `ManifestObject`: typed decoding of the Kubernetes kinds we care about
//! - `Extracts`: CRDs, operator RBAC rules and webhooks found in a stream
//! - `RenderParams`: the snapshot handed to the templates

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod kinds;
pub mod params;
pub mod webhook;

pub use config::{Config, CrdConfig, PackageConfig};
pub use document::{DocumentReader, normalize_trailing_newlines};
pub use error::{CoreError, Result};
pub use extract::{Crd, Extracts, OPERATOR_NAME, extract_yaml_parts};
pub use kinds::ManifestObject;
pub use params::{RenderParams, build_render_params, short_version};
pub use webhook::WebhookDefinition;
