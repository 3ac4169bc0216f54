//! Extraction of bundle inputs from installation manifests

use k8s_openapi::api::admissionregistration::v1::ValidatingWebhookConfiguration;
use k8s_openapi::api::rbac::v1::PolicyRule;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::{debug, info, warn};

use crate::document::{DocumentReader, has_content, normalize_trailing_newlines};
use crate::error::{CoreError, Result};
use crate::kinds::ManifestObject;

/// Name of the operator's ClusterRole and Deployment
pub const OPERATOR_NAME: &str = "elastic-operator";

/// A CustomResourceDefinition found in the manifests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Crd {
    pub name: String,
    pub group: String,
    pub kind: String,
    pub version: String,
    pub display_name: String,
    pub description: String,

    /// Original document, written to the bundle as-is
    #[serde(skip)]
    pub def: Vec<u8>,
}

/// Everything bundle generation needs from one manifest stream
#[derive(Debug, Clone, Default)]
pub struct Extracts {
    /// CRDs by name; a later document with the same name replaces an earlier one
    pub crds: BTreeMap<String, Crd>,

    /// Rules of the operator ClusterRole, `None` if the stream has none or the
    /// role declares no rules
    pub operator_rbac: Option<Vec<PolicyRule>>,

    pub operator_webhooks: Vec<ValidatingWebhookConfiguration>,
}

impl Extracts {
    fn insert_crd(&mut self, crd: Crd) {
        if self.crds.contains_key(&crd.name) {
            warn!(name = %crd.name, "CRD defined more than once, keeping the last definition");
        }
        self.crds.insert(crd.name.clone(), crd);
    }
}

/// Parse a multi-document manifest stream and collect the bundle inputs
///
/// Any document that fails to decode aborts extraction.
pub fn extract_yaml_parts<R: BufRead>(stream: R) -> Result<Extracts> {
    let mut parts = Extracts::default();
    let mut operator_role_seen = false;

    for (index, doc) in DocumentReader::new(stream).enumerate() {
        let doc = doc?;
        if !has_content(&doc) {
            debug!(index, "skipping empty document");
            continue;
        }

        let doc = normalize_trailing_newlines(doc);
        let object = ManifestObject::decode(&doc, index)?;
        debug!(index, kind = object.kind(), "decoded manifest document");

        match object {
            ManifestObject::LegacyCrd(crd) => parts.insert_crd(Crd {
                name: crd.metadata.name.unwrap_or_default(),
                group: crd.spec.group,
                kind: crd.spec.names.kind,
                version: crd.spec.version,
                def: doc,
                ..Default::default()
            }),
            ManifestObject::Crd(crd) => {
                let name = crd.metadata.name.unwrap_or_default();
                let Some(version) = crd.spec.versions.into_iter().next() else {
                    return Err(CoreError::Decode {
                        index,
                        message: format!("CustomResourceDefinition {name} declares no versions"),
                    });
                };
                parts.insert_crd(Crd {
                    name,
                    group: crd.spec.group,
                    kind: crd.spec.names.kind,
                    version: version.name,
                    def: doc,
                    ..Default::default()
                });
            }
            ManifestObject::ClusterRole(role) => {
                if role.metadata.name.as_deref() == Some(OPERATOR_NAME) {
                    if operator_role_seen {
                        warn!("operator ClusterRole defined more than once, keeping the last definition");
                    }
                    operator_role_seen = true;
                    parts.operator_rbac = role.rules;
                }
            }
            ManifestObject::ValidatingWebhookConfiguration(webhook) => {
                parts.operator_webhooks.push(webhook);
            }
            ManifestObject::Ignored { .. } => {}
        }
    }

    info!(
        crds = parts.crds.len(),
        webhook_configurations = parts.operator_webhooks.len(),
        rbac = parts.operator_rbac.is_some(),
        "extracted manifest parts"
    );

    Ok(parts)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LEGACY_CRD: &str = r#"# Source: eck-operator-crds/templates/all-crds.yaml
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: apmservers.apm.k8s.elastic.co
spec:
  group: apm.k8s.elastic.co
  names:
    kind: ApmServer
    plural: apmservers
  version: v1
"#;

    pub(crate) const CRD: &str = r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: elasticsearches.elasticsearch.k8s.elastic.co
spec:
  group: elasticsearch.k8s.elastic.co
  names:
    kind: Elasticsearch
    plural: elasticsearches
  scope: Namespaced
  versions:
    - name: v1
      served: true
      storage: true
    - name: v1beta1
      served: true
      storage: false
"#;

    pub(crate) const OPERATOR: &str = r#"apiVersion: v1
kind: Namespace
metadata:
  name: elastic-system
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: elastic-operator-view
rules:
  - apiGroups: ["elasticsearch.k8s.elastic.co"]
    resources: ["elasticsearches"]
    verbs: ["get", "list", "watch"]
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: elastic-operator
rules:
  - apiGroups: ["authorization.k8s.io"]
    resources: ["subjectaccessreviews"]
    verbs: ["create"]
---
apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingWebhookConfiguration
metadata:
  name: elastic-webhook.k8s.elastic.co
webhooks:
  - name: elastic-es-validation-v1.k8s.elastic.co
    admissionReviewVersions: [v1, v1beta1]
    clientConfig:
      service:
        name: elastic-webhook-server
        namespace: elastic-system
        path: /validate-elasticsearch-k8s-elastic-co-v1-elasticsearch
    failurePolicy: Ignore
    matchPolicy: Equivalent
    sideEffects: None
    rules:
      - apiGroups: [elasticsearch.k8s.elastic.co]
        apiVersions: [v1]
        operations: [CREATE, UPDATE]
        resources: [elasticsearches]
  - name: elastic-kb-validation-v1.k8s.elastic.co
    admissionReviewVersions: [v1]
    clientConfig:
      service:
        name: elastic-webhook-server
        namespace: elastic-system
        path: /validate-kibana-k8s-elastic-co-v1-kibana
    sideEffects: None
"#;

    pub(crate) fn sample_stream() -> String {
        format!("{LEGACY_CRD}---\n{CRD}\n\n---\n{OPERATOR}")
    }

    #[test]
    fn test_extract_buckets() {
        let parts = extract_yaml_parts(sample_stream().as_bytes()).unwrap();

        assert_eq!(parts.crds.len(), 2);

        let apm = &parts.crds["apmservers.apm.k8s.elastic.co"];
        assert_eq!(apm.group, "apm.k8s.elastic.co");
        assert_eq!(apm.kind, "ApmServer");
        assert_eq!(apm.version, "v1");
        assert_eq!(apm.def, LEGACY_CRD.as_bytes());

        let es = &parts.crds["elasticsearches.elasticsearch.k8s.elastic.co"];
        assert_eq!(es.kind, "Elasticsearch");
        assert_eq!(es.version, "v1");
        assert!(es.def.ends_with(b"storage: false\n"));
        assert!(es.display_name.is_empty());

        let rules = parts.operator_rbac.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].resources.as_deref(), Some(&["subjectaccessreviews".to_string()][..]));

        assert_eq!(parts.operator_webhooks.len(), 1);
        assert_eq!(parts.operator_webhooks[0].webhooks.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_trailing_newlines_normalized() {
        let parts = extract_yaml_parts(sample_stream().as_bytes()).unwrap();
        let es = &parts.crds["elasticsearches.elasticsearch.k8s.elastic.co"];
        assert!(!es.def.ends_with(b"\n\n"));
    }

    #[test]
    fn test_last_crd_definition_wins() {
        let renamed = CRD.replace("plural: elasticsearches", "plural: elasticsearches\n    singular: elasticsearch");
        let stream = format!("{CRD}---\n{renamed}");

        let parts = extract_yaml_parts(stream.as_bytes()).unwrap();
        assert_eq!(parts.crds.len(), 1);
        let es = &parts.crds["elasticsearches.elasticsearch.k8s.elastic.co"];
        assert!(String::from_utf8_lossy(&es.def).contains("singular: elasticsearch"));
    }

    #[test]
    fn test_no_operator_role() {
        let parts = extract_yaml_parts(CRD.as_bytes()).unwrap();
        assert!(parts.operator_rbac.is_none());
        assert!(parts.operator_webhooks.is_empty());
    }

    #[test]
    fn test_comment_only_documents_skipped() {
        let stream = format!("# Generated by make\n---\n{CRD}---\n# trailing\n");
        let parts = extract_yaml_parts(stream.as_bytes()).unwrap();
        assert_eq!(parts.crds.len(), 1);
    }

    #[test]
    fn test_empty_stream() {
        let parts = extract_yaml_parts(&b""[..]).unwrap();
        assert!(parts.crds.is_empty());
        assert!(parts.operator_rbac.is_none());
    }

    #[test]
    fn test_legacy_release_stream() {
        let stream = format!(
            "{LEGACY_CRD}---
apiVersion: admissionregistration.k8s.io/v1beta1
kind: ValidatingWebhookConfiguration
metadata:
  name: elastic-webhook.k8s.elastic.co
webhooks:
  - name: elastic-es-validation.k8s.elastic.co
    clientConfig:
      service:
        name: elastic-webhook-server
        namespace: elastic-system
---
apiVersion: policy/v1beta1
kind: PodDisruptionBudget
metadata:
  name: elastic-operator
---
apiVersion: rbac.authorization.k8s.io/v1beta1
kind: ClusterRole
metadata:
  name: elastic-operator
rules: []
---
apiVersion: batch/v1beta1
kind: CronJob
metadata:
  name: cleanup
"
        );

        let parts = extract_yaml_parts(stream.as_bytes()).unwrap();
        assert_eq!(parts.crds.len(), 1);
        assert!(parts.crds.contains_key("apmservers.apm.k8s.elastic.co"));
        // only v1 webhooks and roles are bundle inputs
        assert!(parts.operator_webhooks.is_empty());
        assert!(parts.operator_rbac.is_none());
    }

    #[test]
    fn test_operator_role_without_rules() {
        let stream = format!(
            "{CRD}---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: elastic-operator
"
        );
        let parts = extract_yaml_parts(stream.as_bytes()).unwrap();
        assert!(parts.operator_rbac.is_none());
    }

    #[test]
    fn test_unknown_kind_aborts() {
        let stream = format!("{CRD}---\napiVersion: example.com/v1\nkind: Widget\n");
        let err = extract_yaml_parts(stream.as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::UnregisteredKind { index: 1, .. }));
    }

    #[test]
    fn test_crd_without_versions_is_rejected() {
        let doc = r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: empties.example.com
spec:
  group: example.com
  names:
    kind: Empty
    plural: empties
  scope: Namespaced
  versions: []
"#;
        let err = extract_yaml_parts(doc.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("declares no versions"));
    }
}
