//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("failed to open file {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to unmarshal config from {path}: {source}")]
    ConfigParse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("failed to read manifest YAML: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to decode manifest YAML document {index}: {message}")]
    Decode { index: usize, message: String },

    #[error("no kind \"{kind}\" is registered for version \"{api_version}\" (document {index})")]
    UnregisteredKind {
        index: usize,
        api_version: String,
        kind: String,
    },

    #[error("config file does not contain descriptions for some CRDs: [{}]", .names.join(", "))]
    MissingCrdMetadata { names: Vec<String> },

    #[error("newVersion in config file appears to be invalid [{version}]")]
    InvalidVersion { version: String },

    #[error("package index {index} out of range, config declares {count} package(s)")]
    PackageIndex { index: usize, count: usize },

    #[error("package {package} requests digest pinning but no image digest was resolved")]
    MissingDigest { package: String },

    #[error("failed to marshal {what}: {source}")]
    Marshal {
        what: &'static str,
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
