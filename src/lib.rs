//! Model initializer injection core
//!
//! Mutates a workload's pod template so that a model artifact is provisioned
//! by an init container before the user container starts. The injector:
//!
//! - adds a shared scratch volume, mounted read-write by the initializer and
//!   read-only by the user container at the same path
//! - for `pvc://` sources, mounts the claim into the initializer and rewrites
//!   the source URI to the staged path
//! - delegates storage credential attachment to a [`CredentialBuilder`]
//! - is idempotent: a pod template that already carries the initializer is
//!   left untouched
//!
//! The reconcile loop that invokes this logic lives elsewhere; this crate
//! only performs the mutation and reports structured errors for the caller's
//! retry policy.

#![deny(missing_docs)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod injector;
pub mod uri;
pub mod volume;

pub use config::InjectorConfig;
pub use credentials::{ConfigMapCredentials, CredentialBuilder, NoCredentials};
pub use error::Error;
pub use injector::ModelInitializerInjector;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Reserved name of the injected init container; also the idempotency marker
pub const INITIALIZER_CONTAINER_NAME: &str = "model-initializer";

/// Name of the scratch volume shared between initializer and user container
pub const PROVISION_VOLUME_NAME: &str = "model-provision-location";

/// Path where the model is provisioned, identical in both containers
pub const MODEL_MOUNT_PATH: &str = "/mnt/models";

/// Name of the volume staging a claim-backed source into the initializer
pub const PVC_SOURCE_VOLUME_NAME: &str = "model-pvc-source";

/// Path where a claim-backed source is staged inside the initializer
pub const PVC_SOURCE_MOUNT_PATH: &str = "/mnt/pvc";
