//! Well-known annotations on [`DeploymentConfig`][crate::DeploymentConfig]
//! objects.
//!
//! Annotations are owned by clients, with one exception: the instantiate
//! marker is a command addressed to the server. It is consumed by the update
//! strategy in the same request that carries it and never persisted.
use std::collections::BTreeMap;

use crate::DeploymentConfig;

/// The annotation key clients set to ask the server for a new rollout
/// instead of bumping `status.latestVersion` themselves.
pub const DEPLOYMENT_INSTANTIATED_ANNOTATION: &str = "openshift.io/deployment.instantiated";

/// The only value of [`DEPLOYMENT_INSTANTIATED_ANNOTATION`] that counts as a
/// rollout request. Any other value is treated as if the marker was absent.
pub const DEPLOYMENT_INSTANTIATED_ANNOTATION_VALUE: &str = "true";

/// A one-shot rollout request read from the instantiate marker.
///
/// It can only be obtained by [`take_instantiate_request`], which removes the
/// marker at the same time, so a request is never observed twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the instantiate marker has already been removed, dropping the request loses the rollout"]
pub struct InstantiateRequest {
    _private: (),
}

impl InstantiateRequest {
    /// Applies the request by setting `proposed.status.latestVersion` to one
    /// past `previous.status.latestVersion`, overriding whatever the client
    /// sent. Returns the new `latestVersion`.
    pub fn apply(self, previous: &DeploymentConfig, proposed: &mut DeploymentConfig) -> i64 {
        let latest_version = previous.latest_version().saturating_add(1);
        proposed.set_latest_version(latest_version);
        latest_version
    }
}

/// Removes the instantiate marker from `annotations` and returns the request
/// it carried.
///
/// Returns [`None`] and leaves the map untouched if the marker is missing or
/// carries an unexpected value.
pub fn take_instantiate_request(
    annotations: &mut BTreeMap<String, String>,
) -> Option<InstantiateRequest> {
    let requested = annotations
        .get(DEPLOYMENT_INSTANTIATED_ANNOTATION)
        .is_some_and(|value| value == DEPLOYMENT_INSTANTIATED_ANNOTATION_VALUE);

    if !requested {
        return None;
    }

    annotations.remove(DEPLOYMENT_INSTANTIATED_ANNOTATION);
    Some(InstantiateRequest { _private: () })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn take_removes_marker() {
        let mut annotations = BTreeMap::from([
            (
                DEPLOYMENT_INSTANTIATED_ANNOTATION.to_owned(),
                DEPLOYMENT_INSTANTIATED_ANNOTATION_VALUE.to_owned(),
            ),
            ("owner".to_owned(), "team-a".to_owned()),
        ]);

        assert!(take_instantiate_request(&mut annotations).is_some());
        assert_eq!(
            annotations,
            BTreeMap::from([("owner".to_owned(), "team-a".to_owned())])
        );

        // The marker is gone, a second take finds nothing.
        assert!(take_instantiate_request(&mut annotations).is_none());
    }

    #[rstest]
    #[case("false")]
    #[case("True")]
    #[case("")]
    #[case("yes")]
    fn unexpected_value_is_left_alone(#[case] value: &str) {
        let mut annotations = BTreeMap::from([(
            DEPLOYMENT_INSTANTIATED_ANNOTATION.to_owned(),
            value.to_owned(),
        )]);
        let expected = annotations.clone();

        assert!(take_instantiate_request(&mut annotations).is_none());
        assert_eq!(annotations, expected);
    }

    #[test]
    fn apply_bumps_latest_version_of_previous() {
        let mut previous = DeploymentConfig::new("frontend", Default::default());
        previous.set_latest_version(3);
        let mut proposed = previous.clone();
        proposed.set_latest_version(9);

        let latest_version = InstantiateRequest { _private: () }.apply(&previous, &mut proposed);

        assert_eq!(latest_version, 4);
        assert_eq!(proposed.latest_version(), 4);
    }

    #[test]
    fn empty_annotations() {
        let mut annotations = BTreeMap::new();
        assert!(take_instantiate_request(&mut annotations).is_none());
        assert!(annotations.is_empty());
    }
}
