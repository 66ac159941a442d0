use k8s_openapi::{api::core::v1::EnvVar, apimachinery::pkg::util::intstr::IntOrString};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum DeploymentStrategyType {
    /// Scale the previous rollout down to zero before scaling the new one up.
    Recreate,

    /// Replace pods gradually, bounded by `maxSurge` and `maxUnavailable`.
    #[default]
    Rolling,

    /// Delegate the rollout to a user supplied image.
    Custom,
}

/// Describes how a rollout replaces the pods of the previous one.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    #[serde(rename = "type", default)]
    pub type_: DeploymentStrategyType,

    pub recreate_params: Option<RecreateDeploymentStrategyParams>,
    pub rolling_params: Option<RollingDeploymentStrategyParams>,
    pub custom_params: Option<CustomDeploymentStrategyParams>,

    /// Maximum duration a rollout may run before it is marked as failed.
    pub active_deadline_seconds: Option<i64>,
}

impl DeploymentStrategy {
    pub fn recreate() -> Self {
        Self {
            type_: DeploymentStrategyType::Recreate,
            ..Self::default()
        }
    }

    pub fn rolling(params: RollingDeploymentStrategyParams) -> Self {
        Self {
            type_: DeploymentStrategyType::Rolling,
            rolling_params: Some(params),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecreateDeploymentStrategyParams {
    pub timeout_seconds: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingDeploymentStrategyParams {
    /// Time to wait between individual pod updates.
    pub update_period_seconds: Option<i64>,

    /// Time to wait between polls of the rollout status.
    pub interval_seconds: Option<i64>,

    pub timeout_seconds: Option<i64>,

    /// Absolute number or percentage (e.g. `25%`) of pods which may be
    /// unavailable during the rollout.
    pub max_unavailable: Option<IntOrString>,

    /// Absolute number or percentage of pods which may be scheduled above the
    /// desired number of replicas.
    pub max_surge: Option<IntOrString>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDeploymentStrategyParams {
    pub image: Option<String>,

    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub environment: Vec<EnvVar>,
}
