//! Decides whether an update advances `metadata.generation`.
//!
//! Controllers compare `status.observedGeneration` against
//! `metadata.generation` to find configs they still have to act on. The
//! generation therefore advances exactly when the desired state changed: the
//! spec, or the requested rollout (`status.latestVersion`). It never reads
//! the generation sent by the client.
use deployconfig_api::DeploymentConfig;

/// The outcome of [`decide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationChange {
    /// Neither the spec nor `status.latestVersion` changed.
    Unchanged,

    /// The generation was advanced by one.
    Advanced {
        spec_changed: bool,
        latest_version_changed: bool,
    },
}

impl GenerationChange {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// Sets `proposed.generation` to `previous.generation + 1` if the spec or
/// `status.latestVersion` differ between both objects, and to
/// `previous.generation` otherwise.
///
/// Must run after [`normalize`][super::instantiate::normalize], otherwise
/// annotation-triggered rollouts go unnoticed.
pub fn decide(previous: &DeploymentConfig, proposed: &mut DeploymentConfig) -> GenerationChange {
    let spec_changed = previous.spec != proposed.spec;
    let latest_version_changed = previous.latest_version() != proposed.latest_version();

    let change = if spec_changed || latest_version_changed {
        GenerationChange::Advanced {
            spec_changed,
            latest_version_changed,
        }
    } else {
        GenerationChange::Unchanged
    };

    let generation = match change {
        GenerationChange::Unchanged => previous.generation(),
        GenerationChange::Advanced { .. } => previous.generation().saturating_add(1),
    };
    proposed.set_generation(generation);

    change
}

#[cfg(test)]
mod tests {
    use deployconfig_api::fixtures::ok_deployment_config;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn previous() -> DeploymentConfig {
        ok_deployment_config("foo", "default", 4, 1)
    }

    #[rstest]
    fn spec_change_advances(previous: DeploymentConfig) {
        let mut proposed = previous.clone();
        proposed.spec.replicas += 1;

        let change = decide(&previous, &mut proposed);

        assert_eq!(
            change,
            GenerationChange::Advanced {
                spec_changed: true,
                latest_version_changed: false
            }
        );
        assert_eq!(proposed.generation(), 5);
    }

    #[rstest]
    fn latest_version_change_advances(previous: DeploymentConfig) {
        let mut proposed = previous.clone();
        proposed.set_latest_version(2);

        let change = decide(&previous, &mut proposed);

        assert_eq!(
            change,
            GenerationChange::Advanced {
                spec_changed: false,
                latest_version_changed: true
            }
        );
        assert_eq!(proposed.generation(), 5);
    }

    #[rstest]
    fn both_changes_advance_once(previous: DeploymentConfig) {
        let mut proposed = previous.clone();
        proposed.spec.paused = true;
        proposed.set_latest_version(2);

        assert!(decide(&previous, &mut proposed).is_advanced());
        assert_eq!(proposed.generation(), 5);
    }

    #[rstest]
    #[case::unset(None)]
    #[case::lower(Some(1))]
    #[case::higher(Some(42))]
    fn client_generation_is_ignored(previous: DeploymentConfig, #[case] sent: Option<i64>) {
        let mut proposed = previous.clone();
        proposed.metadata.generation = sent;

        assert_eq!(decide(&previous, &mut proposed), GenerationChange::Unchanged);
        assert_eq!(proposed.generation(), 4);

        proposed.spec.replicas = 7;
        proposed.metadata.generation = sent;

        assert!(decide(&previous, &mut proposed).is_advanced());
        assert_eq!(proposed.generation(), 5);
    }

    #[rstest]
    fn metadata_only_change_keeps_generation(previous: DeploymentConfig) {
        let mut proposed = previous.clone();
        proposed.metadata.labels = Some([("team".to_owned(), "a".to_owned())].into());
        proposed.status.get_or_insert_default().ready_replicas = 3;

        assert_eq!(decide(&previous, &mut proposed), GenerationChange::Unchanged);
        assert_eq!(proposed.generation(), 4);
    }

    #[rstest]
    fn decreased_latest_version_is_a_change(previous: DeploymentConfig) {
        let mut proposed = previous.clone();
        proposed.set_latest_version(0);

        assert!(decide(&previous, &mut proposed).is_advanced());
        assert_eq!(proposed.generation(), 5);
    }

    #[test]
    fn unset_previous_generation() {
        let mut previous = ok_deployment_config("foo", "default", 0, 1);
        previous.metadata.generation = None;
        let mut proposed = previous.clone();
        proposed.spec.replicas = 2;

        decide(&previous, &mut proposed);

        assert_eq!(proposed.metadata.generation, Some(1));
    }
}
