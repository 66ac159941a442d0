//! The sequencing a host registry performs around the strategy hooks.
//!
//! [`before_create`] and [`before_update`] run synchronously right before an
//! object is persisted. They never persist anything themselves; conflicts on
//! `metadata.resourceVersion` are detected by the storage layer, and a retried
//! update simply runs [`before_update`] again against the fresh object.
use std::borrow::Cow;

use kube::Resource;
use snafu::{Snafu, ensure};
use tracing::{debug, instrument};

use crate::{
    strategy::{RestCreateStrategy, RestStrategy, RestUpdateStrategy},
    validation::FieldErrors,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "the namespace of the provided object ({object_namespace:?}) does not match the namespace sent on the request ({request_namespace:?})"
    ))]
    NamespaceMismatch {
        object_namespace: String,
        request_namespace: String,
    },

    #[snafu(display("the request does not carry a namespace, but {kind} is namespace scoped"))]
    MissingRequestNamespace { kind: String },

    #[snafu(display("{kind} {name:?} not found"))]
    NotFound { kind: String, name: String },

    #[snafu(display("{kind} {name:?} is invalid: {errors}"))]
    Invalid {
        kind: String,
        name: String,
        errors: FieldErrors,
    },
}

/// Request-scoped information passed through to validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    namespace: Option<String>,
    user: Option<String>,
}

impl RequestContext {
    /// A context for requests against objects in `namespace`.
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            user: None,
        }
    }

    /// Attaches the requesting user. Only used for log context.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

/// What an update request resolves to, see [`update_target`].
#[derive(Debug, PartialEq)]
pub enum UpdateTarget<'a, K> {
    /// Update the existing object.
    Update(&'a K),

    /// Nothing exists yet and the strategy allows creating on update.
    Create,
}

/// Resolves the object an update of `name` applies to.
///
/// Fails with [`Error::NotFound`] if nothing exists and the strategy does
/// not allow creating on update.
pub fn update_target<'a, S>(
    strategy: &S,
    name: &str,
    existing: Option<&'a S::Object>,
) -> Result<UpdateTarget<'a, S::Object>>
where
    S: RestUpdateStrategy,
{
    match existing {
        Some(old) => Ok(UpdateTarget::Update(old)),
        None if strategy.allow_create_on_update() => Ok(UpdateTarget::Create),
        None => NotFoundSnafu {
            kind: kind::<S::Object>(),
            name,
        }
        .fail(),
    }
}

/// Prepares and validates a new object before it is persisted.
///
/// Runs the namespace check, [`RestCreateStrategy::prepare_for_create`],
/// name generation and [`RestCreateStrategy::validate`], in that order.
#[instrument(skip_all, fields(kind = %kind::<S::Object>(), user = ctx.user()))]
pub fn before_create<S>(strategy: &S, ctx: &RequestContext, obj: &mut S::Object) -> Result<()>
where
    S: RestCreateStrategy,
{
    ensure_namespace(strategy, ctx, obj)?;
    strategy.prepare_for_create(obj);

    let meta = obj.meta_mut();
    if meta.name.as_deref().is_none_or(str::is_empty) {
        if let Some(base) = meta.generate_name.as_deref() {
            let name = strategy.generate_name(base);
            debug!(name, "generated object name");
            meta.name = Some(name);
        }
    }

    let errors = strategy.validate(ctx, obj);
    ensure!(
        errors.is_empty(),
        InvalidSnafu {
            kind: kind::<S::Object>(),
            name: name_of(obj),
            errors,
        }
    );

    Ok(())
}

/// Prepares and validates an update before it is persisted.
///
/// [`RestUpdateStrategy::prepare_for_update`] always runs before
/// [`RestUpdateStrategy::validate_update`], so validation sees the object
/// that is going to be persisted.
#[instrument(skip_all, fields(kind = %kind::<S::Object>(), user = ctx.user()))]
pub fn before_update<S>(
    strategy: &S,
    ctx: &RequestContext,
    obj: &mut S::Object,
    old: &S::Object,
) -> Result<()>
where
    S: RestUpdateStrategy,
{
    ensure_namespace(strategy, ctx, obj)?;
    strategy.prepare_for_update(obj, old);

    let errors = strategy.validate_update(ctx, obj, old);
    ensure!(
        errors.is_empty(),
        InvalidSnafu {
            kind: kind::<S::Object>(),
            name: name_of(obj),
            errors,
        }
    );

    Ok(())
}

/// Makes sure a namespaced object lives in the namespace of the request,
/// filling in the request namespace if the object has none. Cluster scoped
/// objects have their namespace cleared.
fn ensure_namespace<S>(strategy: &S, ctx: &RequestContext, obj: &mut S::Object) -> Result<()>
where
    S: RestStrategy,
{
    let meta = obj.meta_mut();

    if !strategy.namespace_scoped() {
        meta.namespace = None;
        return Ok(());
    }

    let Some(request_namespace) = ctx.namespace().filter(|ns| !ns.is_empty()) else {
        return MissingRequestNamespaceSnafu {
            kind: kind::<S::Object>(),
        }
        .fail();
    };

    match meta.namespace.as_deref() {
        None | Some("") => {
            meta.namespace = Some(request_namespace.to_owned());
            Ok(())
        }
        Some(object_namespace) => {
            ensure!(
                object_namespace == request_namespace,
                NamespaceMismatchSnafu {
                    object_namespace,
                    request_namespace,
                }
            );
            Ok(())
        }
    }
}

fn kind<K: Resource<DynamicType = ()>>() -> Cow<'static, str> {
    K::kind(&())
}

fn name_of<K: Resource>(obj: &K) -> String {
    obj.meta().name.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use deployconfig_api::{DeploymentConfig, fixtures::ok_deployment_config};

    use super::*;
    use crate::{StatusStrategy, Strategy};

    #[test]
    fn namespace_is_filled_from_request() {
        let mut dc = ok_deployment_config("foo", "default", 0, 0);
        dc.metadata.namespace = None;

        before_create(&Strategy::default(), &RequestContext::namespaced("team-a"), &mut dc)
            .expect("valid create");

        assert_eq!(dc.metadata.namespace.as_deref(), Some("team-a"));
    }

    #[test]
    fn namespace_mismatch() {
        let mut dc = ok_deployment_config("foo", "default", 0, 0);

        let err = before_create(
            &Strategy::default(),
            &RequestContext::namespaced("team-a"),
            &mut dc,
        )
            .expect_err("namespace differs from request");

        assert!(matches!(err, Error::NamespaceMismatch { .. }));
    }

    #[test]
    fn missing_request_namespace() {
        let mut dc = ok_deployment_config("foo", "default", 0, 0);

        let err = before_create(&Strategy::default(), &RequestContext::default(), &mut dc)
            .expect_err("request carries no namespace");

        assert!(matches!(err, Error::MissingRequestNamespace { .. }));
    }

    #[test]
    fn generate_name_on_create() {
        let mut dc = ok_deployment_config("foo", "default", 0, 0);
        dc.metadata.name = None;
        dc.metadata.generate_name = Some("frontend-".to_owned());

        before_create(&Strategy::default(), &RequestContext::namespaced("default"), &mut dc)
            .expect("valid create");

        let name = dc.metadata.name.expect("name was generated");
        assert!(name.starts_with("frontend-"));
        assert_eq!(name.len(), "frontend-".len() + 5);
    }

    #[test]
    fn invalid_create_is_rejected() {
        let mut dc = DeploymentConfig::default();

        let err = before_create(
            &Strategy::default(),
            &RequestContext::namespaced("default"),
            &mut dc,
        )
            .expect_err("empty object is invalid");

        let Error::Invalid { kind, errors, .. } = err else {
            panic!("expected an invalid error, got {err:?}");
        };
        assert_eq!(kind, "DeploymentConfig");
        assert!(!errors.is_empty());
    }

    #[test]
    fn update_target_policy() {
        let strategy = Strategy::default();
        let existing = ok_deployment_config("foo", "default", 1, 0);

        assert_eq!(
            update_target(&strategy, "foo", Some(&existing)).expect("object exists"),
            UpdateTarget::Update(&existing)
        );

        let err = update_target(&strategy, "bar", None).expect_err("no create on update");
        assert_eq!(err.to_string(), "DeploymentConfig \"bar\" not found");

        let status = StatusStrategy::default();
        assert!(update_target(&status, "bar", None).is_err());
    }

    #[test]
    fn update_runs_prepare_before_validate() {
        let previous = ok_deployment_config("foo", "default", 4, 1);
        let mut proposed = previous.clone();
        proposed.set_latest_version(2);

        before_update(
            &Strategy::default(),
            &RequestContext::namespaced("default"),
            &mut proposed,
            &previous,
        )
        .expect("valid update");

        assert_eq!(proposed.generation(), 5);
    }

    #[test]
    fn status_update_cannot_request_rollout() {
        let previous = ok_deployment_config("foo", "default", 4, 1);
        let mut proposed = previous.clone();
        proposed.set_latest_version(2);

        before_update(
            &StatusStrategy::default(),
            &RequestContext::namespaced("default"),
            &mut proposed,
            &previous,
        )
        .expect("valid status update");

        assert_eq!(proposed.latest_version(), previous.latest_version());
        assert_eq!(proposed.generation(), previous.generation());
    }

    #[test]
    fn update_with_decremented_latest_version_is_rejected() {
        let previous = ok_deployment_config("foo", "default", 4, 3);
        let mut proposed = previous.clone();
        proposed.set_latest_version(2);

        let err = before_update(
            &Strategy::default(),
            &RequestContext::namespaced("default"),
            &mut proposed,
            &previous,
        )
        .expect_err("latestVersion went backwards");

        assert!(err.to_string().contains("latestVersion cannot be decremented"));
    }
}
