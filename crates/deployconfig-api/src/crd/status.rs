use k8s_openapi::api::core::v1::ObjectReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::DeploymentTriggerType;

/// Observed state of a [`DeploymentConfig`][crate::DeploymentConfig].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigStatus {
    /// Identifies the most recently requested rollout. Only ever increases,
    /// every increase requests exactly one new rollout.
    #[serde(default)]
    pub latest_version: i64,

    /// The generation most recently acted upon by the deployment controller.
    #[serde(default)]
    pub observed_generation: i64,

    #[serde(default)]
    pub replicas: i32,

    #[serde(default)]
    pub updated_replicas: i32,

    #[serde(default)]
    pub available_replicas: i32,

    #[serde(default)]
    pub unavailable_replicas: i32,

    #[serde(default)]
    pub ready_replicas: i32,

    /// Why the latest rollout was started.
    pub details: Option<DeploymentDetails>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDetails {
    /// Set when a user requested the rollout manually.
    pub message: Option<String>,

    #[serde(default)]
    pub causes: Vec<DeploymentCause>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCause {
    #[serde(rename = "type")]
    pub type_: DeploymentTriggerType,

    pub image_trigger: Option<DeploymentCauseImageTrigger>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct DeploymentCauseImageTrigger {
    pub from: ObjectReference,
}
