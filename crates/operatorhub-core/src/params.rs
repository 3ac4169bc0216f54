//! Template render parameters

use serde::Serialize;

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::extract::{Crd, Extracts};
use crate::webhook::WebhookDefinition;

/// Everything the bundle templates can reference
///
/// Built once per configured package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderParams {
    pub new_version: String,
    pub short_version: String,
    pub prev_version: String,
    pub stack_version: String,
    pub operator_repo: String,
    /// Operator ClusterRole rules as YAML
    pub operator_rbac: String,
    /// Extra operator command line arguments
    pub additional_args: Vec<String>,
    /// CRDs sorted by name
    pub crd_list: Vec<Crd>,
    /// OLM webhook definitions as YAML
    pub operator_webhooks: String,
    pub package_name: String,
    /// Image reference suffix, `:<version>` or `@<digest>`
    pub tag: String,
    pub ubi_only: bool,
}

/// Build the render parameters for `config.packages[package_index]`
///
/// `image_digest` must be set when the package uses digest pinning.
pub fn build_render_params(
    config: &Config,
    package_index: usize,
    extracts: &Extracts,
    image_digest: Option<&str>,
) -> Result<RenderParams> {
    let package = config
        .packages
        .get(package_index)
        .ok_or(CoreError::PackageIndex {
            index: package_index,
            count: config.packages.len(),
        })?;

    let mut crds = extracts.crds.clone();
    for meta in &config.crds {
        if let Some(crd) = crds.get_mut(&meta.name) {
            crd.display_name = meta.display_name.clone();
            crd.description = meta.description.clone();
        }
    }
    let mut crd_list: Vec<Crd> = crds.into_values().collect();

    let mut missing: Vec<String> = crd_list
        .iter()
        .filter(|crd| crd.display_name.trim().is_empty() || crd.description.trim().is_empty())
        .map(|crd| crd.name.clone())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(CoreError::MissingCrdMetadata { names: missing });
    }

    crd_list.sort_by(|a, b| a.name.cmp(&b.name));

    let webhooks: Vec<WebhookDefinition> = extracts
        .operator_webhooks
        .iter()
        .flat_map(WebhookDefinition::from_validating_configuration)
        .collect();
    let operator_webhooks = to_yaml(&(!webhooks.is_empty()).then_some(webhooks), "operator webhook rules")?;

    let short_version = short_version(&config.new_version)?;

    let operator_rbac = to_yaml(&extracts.operator_rbac, "operator RBAC rules")?;

    let mut additional_args = Vec::new();
    if package.ubi_only {
        additional_args.push("--ubi-only".to_string());
    }
    additional_args.push(format!("--distribution-channel={}", package.distribution_channel));

    let tag = if package.digest_pinning {
        let digest = image_digest
            .filter(|d| !d.is_empty())
            .ok_or_else(|| CoreError::MissingDigest {
                package: package.package_name.clone(),
            })?;
        format!("@{digest}")
    } else {
        format!(":{}", config.new_version)
    };

    Ok(RenderParams {
        new_version: config.new_version.clone(),
        short_version,
        prev_version: config.prev_version.clone(),
        stack_version: config.stack_version.clone(),
        operator_repo: package.operator_repo.clone(),
        operator_rbac,
        additional_args,
        crd_list,
        operator_webhooks,
        package_name: package.package_name.clone(),
        tag,
        ubi_only: package.ubi_only,
    })
}

/// `major.minor` of a version string
pub fn short_version(version: &str) -> Result<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() < 2 {
        return Err(CoreError::InvalidVersion {
            version: version.to_string(),
        });
    }
    Ok(parts[..2].join("."))
}

fn to_yaml<T: Serialize>(value: &T, what: &'static str) -> Result<String> {
    serde_yaml::to_string(value).map_err(|source| CoreError::Marshal { what, source })
}
