//! Registry strategy for `DeploymentConfig` objects.
//!
//! A generic resource registry calls into this crate at fixed extension
//! points: before persisting a create and before persisting an update. The
//! interesting part is the update path, which reconciles two conventions
//! clients use to request a rollout and decides whether the server-owned
//! `metadata.generation` has to advance:
//!
//! 1. [`strategy::instantiate::normalize`] turns the instantiate annotation
//!    into a `status.latestVersion` bump.
//! 2. [`strategy::generation::decide`] advances the generation by one if the
//!    spec or `status.latestVersion` changed, and resets it to the previous
//!    value otherwise.
//!
//! The [`rest`] module contains the sequencing a host registry performs
//! around those hooks (namespace checks, validation, name generation).
//!
//! ## Crate Features
//!
//! - `clap` derives `clap::Args` for [`StrategyOptions`].
//! - `full` enables all available features.
pub mod logging;
pub mod options;
pub mod rest;
pub mod strategy;
pub mod validation;

pub use options::{StrategyOptions, StrategyOptionsBuilder};
pub use rest::RequestContext;
pub use strategy::{
    RestCreateStrategy, RestStrategy, RestUpdateStrategy, StatusStrategy, Strategy,
};

// Internal re-exports
pub use deployconfig_api as api;
