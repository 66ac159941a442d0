//! The `DeploymentConfig` custom resource.
//!
//! ## Ownership of fields
//!
//! - `metadata.generation` is owned by the server. Whatever a client sends is
//!   overwritten by the registry strategy.
//! - `spec` is owned by clients.
//! - `status` is written by the server and the deployment controllers.
//!   `status.latestVersion` may additionally be bumped by clients to request
//!   a new rollout.
//! - annotations are shared, see [`crate::annotation`].
use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotation::{self, InstantiateRequest};

mod status;
mod strategy;
mod trigger;

pub use status::*;
pub use strategy::*;
pub use trigger::*;

/// Describes the desired state of a set of pods and how new versions of the
/// pod template are rolled out.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[kube(
    group = "apps.openshift.io",
    version = "v1",
    kind = "DeploymentConfig",
    plural = "deploymentconfigs",
    shortname = "dc",
    status = "DeploymentConfigStatus",
    namespaced,
    derive = "Default",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    /// The desired number of replicas.
    #[serde(default)]
    pub replicas: i32,

    /// Label query over the pods that belong to this config. Must match the
    /// labels of the pod template.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,

    /// The pod template every rollout instantiates.
    pub template: Option<PodTemplateSpec>,

    /// Conditions under which a new rollout is started automatically.
    #[serde(default)]
    pub triggers: Vec<DeploymentTriggerPolicy>,

    /// How a rollout replaces the pods of the previous one.
    #[serde(default)]
    pub strategy: DeploymentStrategy,

    /// Minimum number of seconds a new pod must be ready before it counts as
    /// available.
    #[serde(default)]
    pub min_ready_seconds: i32,

    /// The number of old rollouts to keep around for rollback.
    pub revision_history_limit: Option<i32>,

    /// Paused configs are not rolled out by triggers.
    #[serde(default)]
    pub paused: bool,

    /// Test configs are scaled down to zero once a rollout completes.
    #[serde(default)]
    pub test: bool,
}

impl DeploymentConfig {
    /// Returns `metadata.generation`, an unset generation reads as `0`.
    pub fn generation(&self) -> i64 {
        self.metadata.generation.unwrap_or_default()
    }

    pub fn set_generation(&mut self, generation: i64) {
        self.metadata.generation = Some(generation);
    }

    /// Returns `status.latestVersion`, a missing status reads as `0`.
    pub fn latest_version(&self) -> i64 {
        self.status
            .as_ref()
            .map(|status| status.latest_version)
            .unwrap_or_default()
    }

    /// Sets `status.latestVersion`, creating a default status if there is
    /// none yet.
    pub fn set_latest_version(&mut self, latest_version: i64) {
        self.status
            .get_or_insert_with(DeploymentConfigStatus::default)
            .latest_version = latest_version;
    }

    /// Removes the instantiate marker from the annotations and returns the
    /// rollout request it carried. See [`annotation::take_instantiate_request`].
    pub fn take_instantiate_request(&mut self) -> Option<InstantiateRequest> {
        self.metadata
            .annotations
            .as_mut()
            .and_then(annotation::take_instantiate_request)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::annotation::DEPLOYMENT_INSTANTIATED_ANNOTATION;

    #[test]
    fn deserialize_minimal() {
        let input = indoc! {"
            apiVersion: apps.openshift.io/v1
            kind: DeploymentConfig
            metadata:
              name: frontend
              namespace: default
            spec: {}
        "};

        let dc: DeploymentConfig = serde_yaml::from_str(input).expect("valid YAML");

        assert_eq!(dc.generation(), 0);
        assert_eq!(dc.latest_version(), 0);
        assert_eq!(dc.spec, DeploymentConfigSpec::default());
        assert_eq!(dc.spec.strategy.type_, DeploymentStrategyType::Rolling);
    }

    #[test]
    fn deserialize_full() {
        let input = indoc! {"
            apiVersion: apps.openshift.io/v1
            kind: DeploymentConfig
            metadata:
              name: frontend
              namespace: default
              generation: 4
              annotations:
                openshift.io/deployment.instantiated: 'true'
            spec:
              replicas: 3
              selector:
                name: frontend
              template:
                metadata:
                  labels:
                    name: frontend
                spec:
                  containers:
                    - name: app
                      image: registry:8080/repo1:ref1
              triggers:
                - type: ConfigChange
                - type: ImageChange
                  imageChangeParams:
                    automatic: true
                    containerNames:
                      - app
                    from:
                      kind: ImageStreamTag
                      name: app:latest
              strategy:
                type: Recreate
                recreateParams:
                  timeoutSeconds: 600
            status:
              latestVersion: 7
              observedGeneration: 4
        "};

        let mut dc: DeploymentConfig = serde_yaml::from_str(input).expect("valid YAML");

        assert_eq!(dc.generation(), 4);
        assert_eq!(dc.latest_version(), 7);
        assert_eq!(dc.spec.replicas, 3);
        assert_eq!(dc.spec.triggers.len(), 2);
        assert_eq!(dc.spec.triggers[1].type_, DeploymentTriggerType::ImageChange);
        assert_eq!(dc.spec.strategy.type_, DeploymentStrategyType::Recreate);

        assert!(dc.take_instantiate_request().is_some());
        assert!(
            !dc.metadata
                .annotations
                .as_ref()
                .expect("annotations are still present")
                .contains_key(DEPLOYMENT_INSTANTIATED_ANNOTATION)
        );
    }

    #[test]
    fn set_latest_version_without_status() {
        let mut dc = DeploymentConfig::new("frontend", DeploymentConfigSpec::default());
        assert!(dc.status.is_none());

        dc.set_latest_version(2);

        assert_eq!(dc.latest_version(), 2);
        assert_eq!(dc.status.map(|status| status.observed_generation), Some(0));
    }

    #[test]
    fn take_without_annotations() {
        let mut dc = DeploymentConfig::new("frontend", DeploymentConfigSpec::default());
        assert!(dc.take_instantiate_request().is_none());
        assert!(dc.metadata.annotations.is_none());
    }

    #[test]
    fn serialize_uses_camel_case() {
        let mut dc = DeploymentConfig::new("frontend", DeploymentConfigSpec::default());
        dc.set_latest_version(1);

        let value = serde_json::to_value(&dc).expect("serializable");

        assert_eq!(value["status"]["latestVersion"], 1);
        assert_eq!(value["spec"]["minReadySeconds"], 0);
        assert_eq!(value["spec"]["strategy"]["type"], "Rolling");
    }
}
