use std::collections::BTreeSet;

use deployconfig_api::{
    CustomDeploymentStrategyParams, DeploymentConfig, DeploymentConfigSpec,
    DeploymentConfigStatus, DeploymentStrategy, DeploymentStrategyType,
    DeploymentTriggerImageChangeParams, DeploymentTriggerType, RollingDeploymentStrategyParams,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::validation::{
    FieldError, FieldErrors, FieldPath, ForbiddenSnafu, InvalidSnafu, NotSupportedSnafu,
    RequiredSnafu, validate_object_meta, validate_object_meta_update,
};

const IMAGE_STREAM_TAG_KIND: &str = "ImageStreamTag";
const NON_NEGATIVE_MSG: &str = "must be greater than or equal to 0";
const POSITIVE_MSG: &str = "must be greater than 0";

/// Validates a complete object, as submitted on create.
pub fn validate_deployment_config(config: &DeploymentConfig) -> FieldErrors {
    let mut errors = validate_object_meta(&config.metadata, true, &FieldPath::new("metadata"));
    errors.extend(validate_deployment_config_spec(
        &config.spec,
        &FieldPath::new("spec"),
    ));

    if let Some(status) = &config.status {
        errors.extend(validate_deployment_config_status(
            status,
            &FieldPath::new("status"),
        ));
    }

    errors
}

/// Validates an update of the main resource.
///
/// On top of [`validate_deployment_config`], name and namespace must be
/// unchanged, a resource version must be supplied, and
/// `status.latestVersion` may only stay the same or grow by one.
pub fn validate_deployment_config_update(
    new: &DeploymentConfig,
    old: &DeploymentConfig,
) -> FieldErrors {
    let mut errors = validate_object_meta_update(
        &new.metadata,
        &old.metadata,
        &FieldPath::new("metadata"),
    );
    errors.extend(validate_deployment_config(new));
    errors.extend(validate_latest_version_update(
        new.latest_version(),
        old.latest_version(),
        &FieldPath::new("status").child("latestVersion"),
    ));

    errors
}

/// Validates an update of the status subresource.
pub fn validate_deployment_config_status_update(
    new: &DeploymentConfig,
    old: &DeploymentConfig,
) -> FieldErrors {
    let status_path = FieldPath::new("status");

    let mut errors = validate_object_meta_update(
        &new.metadata,
        &old.metadata,
        &FieldPath::new("metadata"),
    );

    if let Some(status) = &new.status {
        errors.extend(validate_deployment_config_status(status, &status_path));
    }

    errors.extend(validate_latest_version_update(
        new.latest_version(),
        old.latest_version(),
        &status_path.child("latestVersion"),
    ));

    let observed_generation = |dc: &DeploymentConfig| {
        dc.status
            .as_ref()
            .map(|status| status.observed_generation)
            .unwrap_or_default()
    };
    if observed_generation(new) < observed_generation(old) {
        errors.push(
            InvalidSnafu {
                path: status_path.child("observedGeneration"),
                value: observed_generation(new).to_string(),
                detail: "observedGeneration cannot be decremented",
            }
            .build(),
        );
    }

    errors
}

pub fn validate_deployment_config_spec(
    spec: &DeploymentConfigSpec,
    path: &FieldPath,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.extend(non_negative(spec.replicas.into(), &path.child("replicas")));
    errors.extend(non_negative(
        spec.min_ready_seconds.into(),
        &path.child("minReadySeconds"),
    ));
    if let Some(limit) = spec.revision_history_limit {
        errors.extend(non_negative(limit.into(), &path.child("revisionHistoryLimit")));
    }

    if spec.selector.is_empty() {
        errors.push(
            RequiredSnafu {
                path: path.child("selector"),
                detail: "selector is required",
            }
            .build(),
        );
    }

    let template_path = path.child("template");
    let container_names = match &spec.template {
        None => {
            errors.push(
                RequiredSnafu {
                    path: template_path,
                    detail: "template is required",
                }
                .build(),
            );
            None
        }
        Some(template) => {
            let labels = template
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.labels.as_ref());
            let selector_matches = spec
                .selector
                .iter()
                .all(|(key, value)| labels.and_then(|labels| labels.get(key)) == Some(value));

            if !selector_matches {
                let labels = labels
                    .map(|labels| {
                        labels
                            .iter()
                            .map(|(key, value)| format!("{key}={value}"))
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .unwrap_or_default();

                errors.push(
                    InvalidSnafu {
                        path: template_path.child("metadata").child("labels"),
                        value: labels,
                        detail: "`selector` does not match template `labels`",
                    }
                    .build(),
                );
            }

            let containers = template
                .spec
                .as_ref()
                .map(|pod_spec| pod_spec.containers.as_slice())
                .unwrap_or_default();
            let containers_path = template_path.child("spec").child("containers");

            if containers.is_empty() {
                errors.push(
                    RequiredSnafu {
                        path: containers_path.clone(),
                        detail: "at least one container is required",
                    }
                    .build(),
                );
            }

            for (i, container) in containers.iter().enumerate() {
                if container.name.is_empty() {
                    errors.push(
                        RequiredSnafu {
                            path: containers_path.index(i).child("name"),
                            detail: "container name is required",
                        }
                        .build(),
                    );
                }
            }

            Some(
                containers
                    .iter()
                    .map(|container| container.name.as_str())
                    .collect::<BTreeSet<_>>(),
            )
        }
    };

    let triggers_path = path.child("triggers");
    let mut config_change_seen = false;
    for (i, trigger) in spec.triggers.iter().enumerate() {
        let trigger_path = triggers_path.index(i);

        match trigger.type_ {
            DeploymentTriggerType::ConfigChange => {
                if trigger.image_change_params.is_some() {
                    errors.push(
                        ForbiddenSnafu {
                            path: trigger_path.child("imageChangeParams"),
                            detail: "only allowed for ImageChange triggers",
                        }
                        .build(),
                    );
                }

                if config_change_seen {
                    errors.push(
                        InvalidSnafu {
                            path: trigger_path.child("type"),
                            value: trigger.type_.to_string(),
                            detail: "only one ConfigChange trigger is supported",
                        }
                        .build(),
                    );
                }
                config_change_seen = true;
            }
            DeploymentTriggerType::ImageChange => match &trigger.image_change_params {
                None => errors.push(
                    RequiredSnafu {
                        path: trigger_path.child("imageChangeParams"),
                        detail: "required for ImageChange triggers",
                    }
                    .build(),
                ),
                Some(params) => errors.extend(validate_image_change_params(
                    params,
                    container_names.as_ref(),
                    &trigger_path.child("imageChangeParams"),
                )),
            },
        }
    }

    errors.extend(validate_deployment_strategy(
        &spec.strategy,
        &path.child("strategy"),
    ));

    errors
}

pub fn validate_deployment_config_status(
    status: &DeploymentConfigStatus,
    path: &FieldPath,
) -> FieldErrors {
    [
        non_negative(status.latest_version, &path.child("latestVersion")),
        non_negative(status.observed_generation, &path.child("observedGeneration")),
        non_negative(status.replicas.into(), &path.child("replicas")),
        non_negative(status.updated_replicas.into(), &path.child("updatedReplicas")),
        non_negative(status.available_replicas.into(), &path.child("availableReplicas")),
        non_negative(
            status.unavailable_replicas.into(),
            &path.child("unavailableReplicas"),
        ),
        non_negative(status.ready_replicas.into(), &path.child("readyReplicas")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Every increase of `status.latestVersion` requests exactly one rollout, so
/// it may never go backwards and never skip a version.
fn validate_latest_version_update(new: i64, old: i64, path: &FieldPath) -> Option<FieldError> {
    let detail = if new < old {
        "latestVersion cannot be decremented"
    } else if new > old.saturating_add(1) {
        "latestVersion can only be incremented by 1"
    } else {
        return None;
    };

    Some(
        InvalidSnafu {
            path: path.clone(),
            value: new.to_string(),
            detail,
        }
        .build(),
    )
}

fn validate_image_change_params(
    params: &DeploymentTriggerImageChangeParams,
    container_names: Option<&BTreeSet<&str>>,
    path: &FieldPath,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let from_path = path.child("from");

    if params.from.name.as_deref().is_none_or(str::is_empty) {
        errors.push(
            RequiredSnafu {
                path: from_path.child("name"),
                detail: "name of the image stream tag is required",
            }
            .build(),
        );
    }

    match params.from.kind.as_deref() {
        None | Some("") => errors.push(
            RequiredSnafu {
                path: from_path.child("kind"),
                detail: "kind is required",
            }
            .build(),
        ),
        Some(IMAGE_STREAM_TAG_KIND) => {}
        Some(kind) => errors.push(
            NotSupportedSnafu {
                path: from_path.child("kind"),
                value: kind,
                supported: vec![IMAGE_STREAM_TAG_KIND.to_owned()],
            }
            .build(),
        ),
    }

    let names_path = path.child("containerNames");
    if params.container_names.is_empty() {
        errors.push(
            RequiredSnafu {
                path: names_path.clone(),
                detail: "at least one container name is required",
            }
            .build(),
        );
    }

    // Without a template the missing template is reported on its own.
    if let Some(container_names) = container_names {
        for (i, name) in params.container_names.iter().enumerate() {
            if !container_names.contains(name.as_str()) {
                errors.push(
                    InvalidSnafu {
                        path: names_path.index(i),
                        value: name,
                        detail: "does not match any container in the pod template",
                    }
                    .build(),
                );
            }
        }
    }

    errors
}

fn validate_deployment_strategy(strategy: &DeploymentStrategy, path: &FieldPath) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match strategy.type_ {
        DeploymentStrategyType::Recreate => {
            if let Some(params) = &strategy.recreate_params {
                errors.extend(positive(
                    params.timeout_seconds,
                    &path.child("recreateParams").child("timeoutSeconds"),
                ));
            }
        }
        // Missing rolling parameters fall back to the controller defaults.
        DeploymentStrategyType::Rolling => {
            if let Some(params) = &strategy.rolling_params {
                errors.extend(validate_rolling_params(params, &path.child("rollingParams")));
            }
        }
        DeploymentStrategyType::Custom => match &strategy.custom_params {
            None => errors.push(
                RequiredSnafu {
                    path: path.child("customParams"),
                    detail: "required for Custom strategy",
                }
                .build(),
            ),
            Some(params) => {
                errors.extend(validate_custom_params(params, &path.child("customParams")));
            }
        },
    }

    errors.extend(positive(
        strategy.active_deadline_seconds,
        &path.child("activeDeadlineSeconds"),
    ));

    errors
}

fn validate_rolling_params(
    params: &RollingDeploymentStrategyParams,
    path: &FieldPath,
) -> FieldErrors {
    let mut errors: FieldErrors = [
        positive(params.update_period_seconds, &path.child("updatePeriodSeconds")),
        positive(params.interval_seconds, &path.child("intervalSeconds")),
        positive(params.timeout_seconds, &path.child("timeoutSeconds")),
    ]
    .into_iter()
    .flatten()
    .collect();

    let max_surge_path = path.child("maxSurge");
    let max_unavailable_path = path.child("maxUnavailable");

    let max_surge = params
        .max_surge
        .as_ref()
        .map(|value| int_or_percent(value, &max_surge_path))
        .transpose();
    let max_unavailable = params
        .max_unavailable
        .as_ref()
        .map(|value| int_or_percent(value, &max_unavailable_path))
        .transpose();

    match (max_surge, max_unavailable) {
        (Ok(Some(0)), Ok(Some(0))) => errors.push(
            InvalidSnafu {
                path: max_unavailable_path,
                value: "0",
                detail: "may not be 0 when maxSurge is 0",
            }
            .build(),
        ),
        (max_surge, max_unavailable) => {
            errors.extend(max_surge.err());
            errors.extend(max_unavailable.err());
        }
    }

    errors
}

fn validate_custom_params(
    params: &CustomDeploymentStrategyParams,
    path: &FieldPath,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if params.image.as_deref().is_none_or(str::is_empty) && params.command.is_empty() {
        errors.push(
            RequiredSnafu {
                path: path.child("image"),
                detail: "an image or a command is required",
            }
            .build(),
        );
    }

    errors
}

/// Returns the absolute number or percentage described by `value`.
fn int_or_percent(value: &IntOrString, path: &FieldPath) -> Result<i32, FieldError> {
    let parsed = match value {
        IntOrString::Int(amount) => Some(*amount).filter(|amount| *amount >= 0),
        IntOrString::String(percent) => percent
            .strip_suffix('%')
            .and_then(|percent| percent.parse::<i32>().ok())
            .filter(|percent| (0..=100).contains(percent)),
    };

    parsed.ok_or_else(|| {
        let value = match value {
            IntOrString::Int(amount) => amount.to_string(),
            IntOrString::String(percent) => percent.clone(),
        };

        InvalidSnafu {
            path: path.clone(),
            value,
            detail: "must be a non-negative integer or a percentage between 0% and 100%",
        }
        .build()
    })
}

fn non_negative(value: i64, path: &FieldPath) -> Option<FieldError> {
    (value < 0).then(|| {
        InvalidSnafu {
            path: path.clone(),
            value: value.to_string(),
            detail: NON_NEGATIVE_MSG,
        }
        .build()
    })
}

fn positive(value: Option<i64>, path: &FieldPath) -> Option<FieldError> {
    value.filter(|value| *value <= 0).map(|value| {
        InvalidSnafu {
            path: path.clone(),
            value: value.to_string(),
            detail: POSITIVE_MSG,
        }
        .build()
    })
}
