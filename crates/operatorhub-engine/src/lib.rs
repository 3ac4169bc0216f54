//! OperatorHub Engine - Jinja2 templating for OLM bundles
//!
//! This crate renders `RenderParams` into bundle files:
//! - a MiniJinja environment with YAML/string helper filters and functions
//! - template errors reported as miette diagnostics pointing at the failing line
//! - the bundle renderer that lays out the versioned output directory

pub mod bundle;
pub mod engine;
pub mod error;
pub mod filters;
pub mod functions;

pub use bundle::{BundleReport, BundleRenderer};
pub use engine::Engine;
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
