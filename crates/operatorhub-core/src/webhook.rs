//! OLM webhook definitions
//!
//! OLM does not install ValidatingWebhookConfigurations from a bundle directly.
//! The ClusterServiceVersion lists `webhookdefinitions` instead, and OLM wires
//! them to the operator deployment and manages the serving certificates.

use k8s_openapi::api::admissionregistration::v1::{
    RuleWithOperations, ValidatingWebhookConfiguration,
};
use serde::Serialize;

use crate::extract::OPERATOR_NAME;

/// Port the webhook service listens on
pub const WEBHOOK_CONTAINER_PORT: i32 = 443;

/// Port the operator's webhook server binds
pub const WEBHOOK_TARGET_PORT: i32 = 9443;

pub const VALIDATING_WEBHOOK_TYPE: &str = "ValidatingAdmissionWebhook";

pub const MATCH_POLICY_EXACT: &str = "Exact";

/// A WebhookDefinition within an OLM ClusterServiceVersion
///
/// See <https://olm.operatorframework.io/docs/advanced-tasks/adding-admission-and-conversion-webhooks/>
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDefinition {
    pub admission_review_versions: Vec<String>,
    pub container_port: i32,
    pub deployment_name: String,
    pub failure_policy: Option<String>,
    pub generate_name: String,
    pub match_policy: String,
    pub rules: Option<Vec<RuleWithOperations>>,
    pub side_effects: Option<String>,
    pub target_port: i32,
    #[serde(rename = "type")]
    pub webhook_type: String,
    pub webhook_path: Option<String>,
}

impl WebhookDefinition {
    /// One definition per webhook of a ValidatingWebhookConfiguration
    pub fn from_validating_configuration(config: &ValidatingWebhookConfiguration) -> Vec<Self> {
        config
            .webhooks
            .iter()
            .flatten()
            .map(|webhook| Self {
                admission_review_versions: webhook.admission_review_versions.clone(),
                container_port: WEBHOOK_CONTAINER_PORT,
                deployment_name: OPERATOR_NAME.to_string(),
                failure_policy: webhook.failure_policy.clone(),
                generate_name: webhook.name.clone(),
                match_policy: MATCH_POLICY_EXACT.to_string(),
                rules: webhook.rules.clone(),
                side_effects: Some(webhook.side_effects.clone()),
                target_port: WEBHOOK_TARGET_PORT,
                webhook_type: VALIDATING_WEBHOOK_TYPE.to_string(),
                webhook_path: webhook
                    .client_config
                    .service
                    .as_ref()
                    .and_then(|service| service.path.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::OPERATOR;
    use crate::extract::extract_yaml_parts;

    fn definitions() -> Vec<WebhookDefinition> {
        let parts = extract_yaml_parts(OPERATOR.as_bytes()).unwrap();
        WebhookDefinition::from_validating_configuration(&parts.operator_webhooks[0])
    }

    #[test]
    fn test_one_definition_per_webhook() {
        let defs = definitions();
        assert_eq!(defs.len(), 2);

        for def in &defs {
            assert_eq!(def.target_port, 9443);
            assert_eq!(def.container_port, 443);
            assert_eq!(def.match_policy, "Exact");
            assert_eq!(def.deployment_name, "elastic-operator");
            assert_eq!(def.webhook_type, "ValidatingAdmissionWebhook");
            assert_eq!(def.side_effects.as_deref(), Some("None"));
        }
    }

    #[test]
    fn test_fields_copied_through() {
        let defs = definitions();

        assert_eq!(defs[0].generate_name, "elastic-es-validation-v1.k8s.elastic.co");
        assert_eq!(defs[0].failure_policy.as_deref(), Some("Ignore"));
        assert_eq!(defs[0].admission_review_versions, vec!["v1", "v1beta1"]);
        assert_eq!(
            defs[0].webhook_path.as_deref(),
            Some("/validate-elasticsearch-k8s-elastic-co-v1-elasticsearch")
        );
        let rules = defs[0].rules.as_ref().unwrap();
        assert_eq!(rules[0].resources.as_deref(), Some(&["elasticsearches".to_string()][..]));

        assert!(defs[1].failure_policy.is_none());
        assert!(defs[1].rules.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let yaml = serde_yaml::to_string(&definitions()).unwrap();

        assert!(yaml.contains("admissionReviewVersions:"));
        assert!(yaml.contains("generateName: elastic-es-validation-v1.k8s.elastic.co"));
        assert!(yaml.contains("type: ValidatingAdmissionWebhook"));
        assert!(yaml.contains("matchPolicy: Exact"));
        assert!(yaml.contains("targetPort: 9443"));
        assert!(yaml.contains("webhookPath: /validate-kibana-k8s-elastic-co-v1-kibana"));
    }

    #[test]
    fn test_configuration_without_webhooks() {
        let config = ValidatingWebhookConfiguration::default();
        assert!(WebhookDefinition::from_validating_configuration(&config).is_empty());
    }
}
