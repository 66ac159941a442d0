//! Extension points a generic resource registry invokes on create and
//! update, and their implementations for `DeploymentConfig` objects.
//!
//! [`Strategy`] handles the main resource, [`StatusStrategy`] handles writes
//! to the status subresource. Neither keeps state across requests, all state
//! lives in the objects passed in.
use deployconfig_api::{DeploymentConfig, DeploymentConfigStatus};
use kube::{Resource, ResourceExt};
use tracing::{debug, instrument};

use crate::{options::StrategyOptions, rest::RequestContext, validation::FieldErrors};

pub mod generation;
pub mod instantiate;
mod names;

/// Behaviour shared by the create and update strategies of a resource.
pub trait RestStrategy {
    type Object: Resource<DynamicType = ()>;

    /// Whether objects live in a namespace. The host uses this to route
    /// requests and to enforce namespace isolation.
    fn namespace_scoped(&self) -> bool;
}

/// Hooks the host invokes before persisting a newly created object.
pub trait RestCreateStrategy: RestStrategy {
    /// Resets fields a client must not set on create. Runs before
    /// [`Self::validate`].
    fn prepare_for_create(&self, obj: &mut Self::Object);

    /// Validates a new object. An empty list means the object is valid.
    fn validate(&self, ctx: &RequestContext, obj: &Self::Object) -> FieldErrors;

    /// Generates a name from `metadata.generateName` for objects created
    /// without one.
    fn generate_name(&self, base: &str) -> String {
        names::generate_name(base)
    }
}

/// Hooks the host invokes before persisting an update of an existing
/// object.
pub trait RestUpdateStrategy: RestStrategy {
    /// Whether an update of a missing object creates it. If `false`, the
    /// host rejects such updates as not found.
    fn allow_create_on_update(&self) -> bool;

    /// Whether updates without a resource version are accepted.
    fn allow_unconditional_update(&self) -> bool;

    /// Reconciles `obj` (the proposed object) against `old` (the persisted
    /// one). Runs before [`Self::validate_update`].
    fn prepare_for_update(&self, obj: &mut Self::Object, old: &Self::Object);

    /// Validates an update. An empty list means the update is valid.
    fn validate_update(
        &self,
        ctx: &RequestContext,
        obj: &Self::Object,
        old: &Self::Object,
    ) -> FieldErrors;
}

/// The strategy for `DeploymentConfig` objects.
///
/// ### Example
///
/// ```
/// use deployconfig_registry::{
///     RestStrategy, RestUpdateStrategy, Strategy,
///     api::{DeploymentConfig, DeploymentConfigSpec},
/// };
///
/// let strategy = Strategy::default();
/// assert!(strategy.namespace_scoped());
/// assert!(!strategy.allow_create_on_update());
///
/// let mut previous = DeploymentConfig::new("frontend", DeploymentConfigSpec::default());
/// previous.set_generation(4);
///
/// let mut proposed = previous.clone();
/// proposed.spec.replicas = 3;
/// strategy.prepare_for_update(&mut proposed, &previous);
///
/// assert_eq!(proposed.generation(), 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Strategy {
    options: StrategyOptions,
}

impl Strategy {
    pub fn new(options: StrategyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StrategyOptions {
        &self.options
    }
}

impl RestStrategy for Strategy {
    type Object = DeploymentConfig;

    fn namespace_scoped(&self) -> bool {
        true
    }
}

impl RestCreateStrategy for Strategy {
    #[instrument(skip_all, fields(name = %obj.name_any()))]
    fn prepare_for_create(&self, obj: &mut DeploymentConfig) {
        obj.set_generation(self.options.initial_generation);
        obj.status = Some(DeploymentConfigStatus::default());

        for trigger in &mut obj.spec.triggers {
            if let Some(params) = trigger.image_change_params.as_mut() {
                params.last_triggered_image = None;
            }
        }

        // A fresh object starts at latestVersion 0, there is nothing to roll
        // out on behalf of the marker yet.
        if obj.take_instantiate_request().is_some() {
            debug!("dropped instantiate annotation on create");
        }
    }

    fn validate(&self, _ctx: &RequestContext, obj: &DeploymentConfig) -> FieldErrors {
        crate::validation::validate_deployment_config(obj)
    }
}

impl RestUpdateStrategy for Strategy {
    fn allow_create_on_update(&self) -> bool {
        false
    }

    fn allow_unconditional_update(&self) -> bool {
        false
    }

    /// Translates the instantiate annotation into a `status.latestVersion`
    /// bump, then decides the generation. The order matters, deciding first
    /// would miss annotation-triggered rollouts.
    #[instrument(skip_all, fields(name = %obj.name_any()))]
    fn prepare_for_update(&self, obj: &mut DeploymentConfig, old: &DeploymentConfig) {
        let requested_latest_version = instantiate::normalize(old, obj);

        let change = generation::decide(old, obj);
        debug!(
            ?change,
            ?requested_latest_version,
            generation = obj.generation(),
            latest_version = obj.latest_version(),
            "prepared update"
        );
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        obj: &DeploymentConfig,
        old: &DeploymentConfig,
    ) -> FieldErrors {
        crate::validation::validate_deployment_config_update(obj, old)
    }
}

/// The strategy for updates of the status subresource.
///
/// Status writers (the deployment controllers) cannot change desired state
/// and cannot request rollouts: spec, labels, generation and
/// `status.latestVersion` are always taken from the persisted object.
#[derive(Clone, Debug, Default)]
pub struct StatusStrategy {
    inner: Strategy,
}

impl StatusStrategy {
    pub fn new(strategy: Strategy) -> Self {
        Self { inner: strategy }
    }
}

impl RestStrategy for StatusStrategy {
    type Object = DeploymentConfig;

    fn namespace_scoped(&self) -> bool {
        self.inner.namespace_scoped()
    }
}

impl RestUpdateStrategy for StatusStrategy {
    fn allow_create_on_update(&self) -> bool {
        self.inner.allow_create_on_update()
    }

    fn allow_unconditional_update(&self) -> bool {
        self.inner.allow_unconditional_update()
    }

    #[instrument(skip_all, fields(name = %obj.name_any()))]
    fn prepare_for_update(&self, obj: &mut DeploymentConfig, old: &DeploymentConfig) {
        obj.spec = old.spec.clone();
        obj.metadata.labels = old.metadata.labels.clone();
        obj.metadata.generation = old.metadata.generation;
        obj.set_latest_version(old.latest_version());
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        obj: &DeploymentConfig,
        old: &DeploymentConfig,
    ) -> FieldErrors {
        crate::validation::validate_deployment_config_status_update(obj, old)
    }
}
