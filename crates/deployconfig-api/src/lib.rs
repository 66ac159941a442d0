//! Resource model for `DeploymentConfig` objects.
//!
//! A [`DeploymentConfig`] carries two counters that the registry strategy
//! reasons about: the server-owned `metadata.generation` and
//! `status.latestVersion`, which identifies the most recently requested
//! rollout. Everything else in the spec and status is opaque to the
//! strategy apart from equality.
//!
//! ## Crate Features
//!
//! - `fixtures` exposes the [`fixtures`] module with objects that pass
//!   validation. It is always available in this crate's own tests.
pub mod annotation;
pub mod crd;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use annotation::InstantiateRequest;
pub use crd::*;

// External re-exports
pub use k8s_openapi;
pub use kube;
