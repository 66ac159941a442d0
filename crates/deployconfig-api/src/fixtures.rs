//! Well-formed objects for tests.
//!
//! Everything returned here passes the registry validation as is.
use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::{Container, PodSpec, PodTemplateSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};

use crate::crd::{
    DeploymentConfig, DeploymentConfigSpec, DeploymentConfigStatus, DeploymentStrategy,
    DeploymentTriggerPolicy,
};

pub const SELECTOR_KEY: &str = "name";
pub const SELECTOR_VALUE: &str = "test-pod";
pub const CONTAINER_NAME: &str = "container1";
pub const CONTAINER_IMAGE: &str = "registry:8080/repo1:ref1";

fn ok_selector() -> BTreeMap<String, String> {
    BTreeMap::from([(SELECTOR_KEY.to_owned(), SELECTOR_VALUE.to_owned())])
}

pub fn ok_pod_template() -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(ok_selector()),
            ..ObjectMeta::default()
        }),
        spec: Some(PodSpec {
            containers: vec![Container {
                name: CONTAINER_NAME.to_owned(),
                image: Some(CONTAINER_IMAGE.to_owned()),
                ..Container::default()
            }],
            ..PodSpec::default()
        }),
    }
}

pub fn ok_deployment_config_spec() -> DeploymentConfigSpec {
    DeploymentConfigSpec {
        replicas: 1,
        selector: ok_selector(),
        template: Some(ok_pod_template()),
        triggers: vec![DeploymentTriggerPolicy::config_change()],
        strategy: DeploymentStrategy::recreate(),
        ..DeploymentConfigSpec::default()
    }
}

pub fn ok_deployment_config_status(latest_version: i64) -> DeploymentConfigStatus {
    DeploymentConfigStatus {
        latest_version,
        ..DeploymentConfigStatus::default()
    }
}

/// A persisted-looking config: it carries a resource version, an empty
/// annotation map and `generation`.
pub fn ok_deployment_config(
    name: &str,
    namespace: &str,
    generation: i64,
    latest_version: i64,
) -> DeploymentConfig {
    DeploymentConfig {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            generation: Some(generation),
            resource_version: Some("1".to_owned()),
            annotations: Some(BTreeMap::new()),
            ..ObjectMeta::default()
        },
        spec: ok_deployment_config_spec(),
        status: Some(ok_deployment_config_status(latest_version)),
    }
}
