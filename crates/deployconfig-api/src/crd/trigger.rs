use k8s_openapi::api::core::v1::ObjectReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The kinds of events which can start a rollout on their own.
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
pub enum DeploymentTriggerType {
    /// Roll out whenever the pod template changes.
    #[default]
    ConfigChange,

    /// Roll out whenever the referenced image stream tag points to a new image.
    ImageChange,
}

/// A single condition under which a rollout is started automatically.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerPolicy {
    #[serde(rename = "type")]
    pub type_: DeploymentTriggerType,

    /// Only valid for [`DeploymentTriggerType::ImageChange`].
    pub image_change_params: Option<DeploymentTriggerImageChangeParams>,
}

impl DeploymentTriggerPolicy {
    pub fn config_change() -> Self {
        Self {
            type_: DeploymentTriggerType::ConfigChange,
            image_change_params: None,
        }
    }

    pub fn image_change(params: DeploymentTriggerImageChangeParams) -> Self {
        Self {
            type_: DeploymentTriggerType::ImageChange,
            image_change_params: Some(params),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerImageChangeParams {
    /// Whether a new image automatically starts a rollout. If `false`, only
    /// the container images in the template are updated.
    #[serde(default)]
    pub automatic: bool,

    /// Containers of the pod template whose image is replaced.
    #[serde(default)]
    pub container_names: Vec<String>,

    /// The image stream tag to watch. Must be of kind `ImageStreamTag`.
    pub from: ObjectReference,

    /// The last image that started a rollout. Maintained by the image trigger
    /// controller, cleared on create.
    pub last_triggered_image: Option<String>,
}
