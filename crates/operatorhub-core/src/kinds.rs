//! Typed decoding of manifest documents
//!
//! A document is decoded against the built-in Kubernetes API groups. The four
//! kinds bundle generation reads are decoded into full types; any other kind
//! of a built-in group, at any version, is recognised and ignored. A kind from
//! another group (a custom resource) is an error, the same way a scheme-based
//! decoder rejects it.

use k8s_openapi::Resource;
use k8s_openapi::api::admissionregistration::v1::ValidatingWebhookConfiguration;
use k8s_openapi::api::rbac::v1::ClusterRole;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use phf::phf_set;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::{CoreError, Result};

/// `apiextensions.k8s.io/v1beta1`, still found in manifests of older releases
pub const LEGACY_CRD_API_VERSION: &str = "apiextensions.k8s.io/v1beta1";

/// A `apiextensions.k8s.io/v1beta1` CustomResourceDefinition
///
/// Removed from Kubernetes in 1.22, so k8s-openapi no longer generates it.
/// Only the fields bundle generation reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCrd {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: LegacyCrdSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCrdSpec {
    pub group: String,
    pub names: LegacyCrdNames,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCrdNames {
    pub kind: String,
}

/// A decoded manifest document
#[derive(Debug, Clone)]
pub enum ManifestObject {
    LegacyCrd(LegacyCrd),
    Crd(Box<CustomResourceDefinition>),
    ClusterRole(ClusterRole),
    ValidatingWebhookConfiguration(ValidatingWebhookConfiguration),
    /// A registered kind bundle generation has no use for
    Ignored { api_version: String, kind: String },
}

/// API groups served by Kubernetes itself, `""` being the core group
///
/// Every version of these groups is recognised, so streams from older
/// releases (`policy/v1beta1`, `rbac.authorization.k8s.io/v1beta1`, ...)
/// decode the same way current ones do.
static BUILT_IN_GROUPS: phf::Set<&'static str> = phf_set! {
    "",
    "admissionregistration.k8s.io",
    "apiextensions.k8s.io",
    "apiregistration.k8s.io",
    "apps",
    "autoscaling",
    "batch",
    "certificates.k8s.io",
    "coordination.k8s.io",
    "discovery.k8s.io",
    "events.k8s.io",
    "flowcontrol.apiserver.k8s.io",
    "networking.k8s.io",
    "node.k8s.io",
    "policy",
    "rbac.authorization.k8s.io",
    "scheduling.k8s.io",
    "storage.k8s.io",
};

/// Group part of an `apiVersion`, empty for the core group
fn api_group(api_version: &str) -> &str {
    api_version
        .rsplit_once('/')
        .map_or("", |(group, _)| group)
}

impl ManifestObject {
    /// Decode one document; `index` is only used in error messages
    pub fn decode(doc: &[u8], index: usize) -> Result<Self> {
        let value: Value = serde_yaml::from_slice(doc).map_err(|e| CoreError::Decode {
            index,
            message: e.to_string(),
        })?;

        let type_field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        let (Some(api_version), Some(kind)) = (type_field("apiVersion"), type_field("kind")) else {
            return Err(CoreError::Decode {
                index,
                message: "document is missing apiVersion or kind".to_string(),
            });
        };

        if kind == CustomResourceDefinition::KIND {
            if api_version == LEGACY_CRD_API_VERSION {
                return typed(value, index).map(Self::LegacyCrd);
            }
            if api_version == CustomResourceDefinition::API_VERSION {
                return typed(value, index).map(|crd| Self::Crd(Box::new(crd)));
            }
        }

        if kind == ClusterRole::KIND && api_version == ClusterRole::API_VERSION {
            return typed(value, index).map(Self::ClusterRole);
        }

        if kind == ValidatingWebhookConfiguration::KIND
            && api_version == ValidatingWebhookConfiguration::API_VERSION
        {
            return typed(value, index).map(Self::ValidatingWebhookConfiguration);
        }

        if BUILT_IN_GROUPS.contains(api_group(&api_version)) {
            return Ok(Self::Ignored { api_version, kind });
        }

        Err(CoreError::UnregisteredKind {
            index,
            api_version,
            kind,
        })
    }

    /// The object's kind
    pub fn kind(&self) -> &str {
        match self {
            Self::LegacyCrd(_) | Self::Crd(_) => CustomResourceDefinition::KIND,
            Self::ClusterRole(_) => ClusterRole::KIND,
            Self::ValidatingWebhookConfiguration(_) => ValidatingWebhookConfiguration::KIND,
            Self::Ignored { kind, .. } => kind,
        }
    }
}

fn typed<T: DeserializeOwned>(value: Value, index: usize) -> Result<T> {
    serde_yaml::from_value(value).map_err(|e| CoreError::Decode {
        index,
        message: e.to_string(),
    })
}
