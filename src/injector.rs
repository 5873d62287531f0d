//! Mutation orchestrator
//!
//! Sequences one injection against a pod template:
//!
//! 1. idempotency check — already-injected templates are a successful no-op
//! 2. claim-backed sources: parse the URI, stage the claim volume, rewrite
//!    the effective URI to the staged path
//! 3. stage the scratch volume and its mounts
//! 4. construct the init container (`[effective_uri, model_path]` args)
//! 5. hand the init container and the staged volume list to the credential
//!    builder
//! 6. commit everything to the pod template only after every step succeeded
//!
//! Volume and container changes accumulate in a staging structure until the
//! credential builder returns; a failed injection leaves the pod template
//! exactly as it was, so the reconcile loop can retry the whole operation.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Container, PodSpec};
use tracing::{debug, info};

use crate::config::InjectorConfig;
use crate::credentials::{CredentialBuilder, DEFAULT_SERVICE_ACCOUNT};
use crate::error::Error;
use crate::{uri, volume, INITIALIZER_CONTAINER_NAME, MODEL_MOUNT_PATH};

/// Injects the model initializer into pod templates.
///
/// Holds the injector configuration and the credential capability; one
/// instance serves any number of sequential injection calls.
pub struct ModelInitializerInjector<C> {
    config: InjectorConfig,
    credentials: C,
}

impl<C: CredentialBuilder> ModelInitializerInjector<C> {
    /// Create an injector from explicit configuration and a credential builder
    pub fn new(config: InjectorConfig, credentials: C) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// The configuration this injector was constructed with
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Inject the model initializer into `pod_spec`.
    ///
    /// `user_container` names the primary container that consumes the
    /// provisioned model; `source_uri` locates the model artifact;
    /// `service_account` overrides the pod's service account for credential
    /// resolution when present.
    ///
    /// Succeeds without mutating anything when the initializer is already
    /// present. On error the pod spec is left unmodified.
    pub async fn inject(
        &self,
        namespace: &str,
        pod_spec: &mut PodSpec,
        user_container: &str,
        source_uri: &str,
        service_account: Option<&str>,
    ) -> Result<(), Error> {
        // Idempotency guard: retried reconciles must not duplicate anything
        if pod_spec
            .init_containers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|c| c.name == INITIALIZER_CONTAINER_NAME)
        {
            debug!(
                namespace = %namespace,
                container = %user_container,
                "Initializer already injected, skipping"
            );
            return Ok(());
        }

        let user_index = pod_spec
            .containers
            .iter()
            .position(|c| c.name == user_container)
            .ok_or_else(|| Error::missing_container(user_container))?;

        // Stage volumes and initializer mounts; nothing touches the pod
        // spec until credential attachment has succeeded.
        let mut staged_volumes = Vec::new();
        let mut init_mounts = Vec::new();
        let mut effective_uri = source_uri.to_string();

        if uri::is_pvc_uri(source_uri) {
            let (claim, sub_path) = uri::parse_pvc_uri(source_uri)?;
            staged_volumes.push(volume::pvc_source_volume(&claim));
            init_mounts.push(volume::pvc_source_mount());
            effective_uri = volume::staged_pvc_path(&sub_path);
            debug!(
                claim = %claim,
                staged_uri = %effective_uri,
                "Rewrote claim-backed source to staged path"
            );
        }

        staged_volumes.push(volume::provision_volume());
        init_mounts.push(volume::provision_mount(false));

        let mut init_container = Container {
            name: INITIALIZER_CONTAINER_NAME.to_string(),
            image: Some(self.config.initializer_image_ref()),
            args: Some(vec![effective_uri.clone(), MODEL_MOUNT_PATH.to_string()]),
            volume_mounts: Some(init_mounts),
            ..Default::default()
        };

        let effective_sa = effective_service_account(service_account, pod_spec);

        // The staged volume list is in its final pre-credential shape; the
        // builder may append its own volumes to it.
        self.credentials
            .attach(
                namespace,
                &effective_sa,
                &mut init_container,
                &mut staged_volumes,
            )
            .await?;

        // Commit: every mutation lands, or none did
        pod_spec.containers[user_index]
            .volume_mounts
            .get_or_insert_with(Vec::new)
            .push(volume::provision_mount(true));
        pod_spec
            .volumes
            .get_or_insert_with(Vec::new)
            .extend(staged_volumes);
        pod_spec
            .init_containers
            .get_or_insert_with(Vec::new)
            .push(init_container);

        info!(
            namespace = %namespace,
            container = %user_container,
            source_uri = %source_uri,
            effective_uri = %effective_uri,
            service_account = %effective_sa,
            "Injected model initializer"
        );
        Ok(())
    }

    /// Inject the model initializer into a Deployment's pod template.
    ///
    /// Convenience entry point for reconcile loops that own the workload
    /// object: extracts the namespace and pod template spec and delegates to
    /// [`inject`](Self::inject).
    pub async fn inject_deployment(
        &self,
        deployment: &mut Deployment,
        user_container: &str,
        source_uri: &str,
        service_account: Option<&str>,
    ) -> Result<(), Error> {
        let namespace = deployment
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let pod_spec = deployment
            .spec
            .get_or_insert_with(Default::default)
            .template
            .spec
            .get_or_insert_with(Default::default);
        self.inject(
            &namespace,
            pod_spec,
            user_container,
            source_uri,
            service_account,
        )
        .await
    }
}

/// Resolve the service account credentials are attached for: the caller's
/// override if present, else the pod's, else `default`.
fn effective_service_account(override_sa: Option<&str>, pod_spec: &PodSpec) -> String {
    override_sa
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            pod_spec
                .service_account_name
                .clone()
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT.to_string())
}
