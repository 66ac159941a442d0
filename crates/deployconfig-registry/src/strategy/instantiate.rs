//! Translation of the instantiate annotation into a `status.latestVersion`
//! bump.
//!
//! Clients request a new rollout either by incrementing
//! `status.latestVersion` directly or by setting the
//! [`DEPLOYMENT_INSTANTIATED_ANNOTATION`][annotation]. After [`normalize`]
//! has run, only the first form is left, so generation handling never has to
//! know about the annotation.
//!
//! [annotation]: deployconfig_api::annotation::DEPLOYMENT_INSTANTIATED_ANNOTATION
use deployconfig_api::DeploymentConfig;
use kube::ResourceExt;
use tracing::{info, instrument};

/// Rewrites an annotation-triggered rollout request on `proposed` into
/// `status.latestVersion = previous.status.latestVersion + 1`.
///
/// The marker is removed from `proposed`, and the `latestVersion` sent by the
/// client is overridden. Without the marker, `proposed` is left exactly as
/// submitted. Returns the requested `latestVersion`, if there was a request.
#[instrument(level = "debug", skip_all, fields(name = %proposed.name_any()))]
pub fn normalize(previous: &DeploymentConfig, proposed: &mut DeploymentConfig) -> Option<i64> {
    let latest_version = proposed
        .take_instantiate_request()?
        .apply(previous, proposed);

    info!(
        latest_version,
        "rollout requested through instantiate annotation"
    );
    Some(latest_version)
}
