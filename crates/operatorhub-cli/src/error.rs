//! CLI error type with exit code mapping
//!
//! Each variant names the stage that failed; the underlying error is kept as
//! the source so the report shows the full chain.

use miette::Diagnostic;
use operatorhub_core::CoreError;
use operatorhub_engine::EngineError;
use operatorhub_fetch::{FetchError, Image};
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("when loading config")]
    #[diagnostic(code(operatorhub::cli::config))]
    Config(#[source] CoreError),

    #[error("RedHat API key is required to get image digest")]
    #[diagnostic(
        code(operatorhub::cli::credentials),
        help("set --redhat-api-token or the REDHAT_API_TOKEN environment variable")
    )]
    MissingApiKey,

    #[error("RedHat project ID is required to get image digest")]
    #[diagnostic(
        code(operatorhub::cli::credentials),
        help("set --redhat-project-id or the REDHAT_PROJECT_ID environment variable")
    )]
    MissingProjectId,

    #[error(transparent)]
    #[diagnostic(code(operatorhub::cli::digest))]
    Digest(FetchError),

    #[error("when getting install manifest stream")]
    #[diagnostic(code(operatorhub::cli::manifests))]
    Manifests(#[source] FetchError),

    #[error("when extracting YAML parts")]
    #[diagnostic(code(operatorhub::cli::extract))]
    Extract(#[source] CoreError),

    #[error("when building render params")]
    #[diagnostic(code(operatorhub::cli::params))]
    Params(#[source] CoreError),

    #[error("when rendering")]
    #[diagnostic(code(operatorhub::cli::render))]
    Render(
        #[source]
        #[diagnostic_source]
        EngineError,
    ),

    #[error("failed to start async runtime: {0}")]
    #[diagnostic(code(operatorhub::cli::internal))]
    Runtime(#[source] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(CoreError::ConfigRead { .. }) => exit_codes::IO_ERROR,
            CliError::Config(_) => exit_codes::VALIDATION_ERROR,
            CliError::MissingApiKey | CliError::MissingProjectId => exit_codes::VALIDATION_ERROR,
            CliError::Digest(_) => exit_codes::NETWORK_ERROR,
            CliError::Manifests(FetchError::Open { .. }) => exit_codes::IO_ERROR,
            CliError::Manifests(_) => exit_codes::NETWORK_ERROR,
            CliError::Extract(CoreError::Read(_)) => exit_codes::IO_ERROR,
            CliError::Extract(_) => exit_codes::ERROR,
            CliError::Params(_) => exit_codes::VALIDATION_ERROR,
            CliError::Render(EngineError::Template(_)) => exit_codes::TEMPLATE_ERROR,
            CliError::Render(_) => exit_codes::IO_ERROR,
            CliError::Runtime(_) => exit_codes::ERROR,
        }
    }

    /// Catalog images that matched the tag when exactly one was expected
    pub fn candidate_images(&self) -> Option<&[Image]> {
        match self {
            CliError::Digest(FetchError::MultipleImages { images, .. }) => Some(images),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
