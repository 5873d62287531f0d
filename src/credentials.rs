//! Storage credential attachment
//!
//! The injector itself never touches secrets; it hands the not-yet-committed
//! init container and the staged volume list to a [`CredentialBuilder`] and
//! commits only if attachment succeeds. The capability is injected so tests
//! and credential-less clusters can substitute [`NoCredentials`].
//!
//! [`ConfigMapCredentials`] is the in-cluster implementation: constructed
//! from a ConfigMap lookup in the controller namespace, it mounts the
//! workload service account's secrets read-only into the init container.
//! Environment-variable naming conventions for individual storage backends
//! belong to the initializer image, not to this crate.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{
    ConfigMap, Container, SecretVolumeSource, ServiceAccount, Volume, VolumeMount,
};
use kube::api::Api;
use kube::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::InjectorConfig;
use crate::error::Error;

/// Service account used when neither the caller nor the pod names one
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Default path credential secrets are mounted under in the initializer
pub const DEFAULT_CREDENTIALS_MOUNT_PATH: &str = "/var/run/model-credentials";

/// ConfigMap data key holding the credential configuration JSON
const CREDENTIALS_CONFIG_KEY: &str = "credentials";

/// Capability that attaches storage authentication material to the init
/// container and the pod's volume collection.
#[async_trait]
pub trait CredentialBuilder: Send + Sync {
    /// Attach credentials for `service_account` in `namespace`.
    ///
    /// `container` is the not-yet-committed init container; `volumes` is the
    /// volume collection the container's mounts resolve against. The builder
    /// may append volumes and mutate the container. On error the caller
    /// commits nothing.
    async fn attach(
        &self,
        namespace: &str,
        service_account: &str,
        container: &mut Container,
        volumes: &mut Vec<Volume>,
    ) -> Result<(), Error>;
}

/// Credential builder that attaches nothing.
///
/// For clusters where the model source needs no authentication, and for
/// tests that exercise the mutation protocol alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialBuilder for NoCredentials {
    async fn attach(
        &self,
        _namespace: &str,
        _service_account: &str,
        _container: &mut Container,
        _volumes: &mut Vec<Volume>,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// Credential settings read from the controller ConfigMap
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialSettings {
    /// Root path credential secrets are mounted under
    pub secrets_mount_path: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            secrets_mount_path: DEFAULT_CREDENTIALS_MOUNT_PATH.to_string(),
        }
    }
}

/// In-cluster credential builder backed by the controller ConfigMap.
///
/// Constructed via [`ConfigMapCredentials::lookup`], which fails with
/// [`Error::CredentialConfiguration`] when the ConfigMap is missing or its
/// payload does not parse.
#[derive(Clone)]
pub struct ConfigMapCredentials {
    client: Client,
    settings: CredentialSettings,
}

impl ConfigMapCredentials {
    /// Look up the credential configuration and build the capability.
    ///
    /// Fetches `config.credential_config_name` from
    /// `config.controller_namespace`.
    pub async fn lookup(client: Client, config: &InjectorConfig) -> Result<Self, Error> {
        let config_maps: Api<ConfigMap> =
            Api::namespaced(client.clone(), &config.controller_namespace);
        let config_map = config_maps
            .get(&config.credential_config_name)
            .await
            .map_err(|e| {
                Error::credential_configuration(&config.credential_config_name, e.to_string())
            })?;

        let settings = parse_settings(&config.credential_config_name, &config_map)?;
        debug!(
            config = %config.credential_config_name,
            mount_path = %settings.secrets_mount_path,
            "Loaded credential configuration"
        );

        Ok(Self { client, settings })
    }

    /// Build directly from settings, bypassing the ConfigMap lookup
    pub fn with_settings(client: Client, settings: CredentialSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl CredentialBuilder for ConfigMapCredentials {
    async fn attach(
        &self,
        namespace: &str,
        service_account: &str,
        container: &mut Container,
        volumes: &mut Vec<Volume>,
    ) -> Result<(), Error> {
        let sa_name = if service_account.is_empty() {
            DEFAULT_SERVICE_ACCOUNT
        } else {
            service_account
        };

        let service_accounts: Api<ServiceAccount> =
            Api::namespaced(self.client.clone(), namespace);
        let sa = service_accounts.get(sa_name).await.map_err(|e| {
            Error::credential_injection(sa_name, format!("failed to read service account: {}", e))
        })?;

        let secret_names: Vec<String> = sa
            .secrets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.name)
            .collect();

        debug!(
            service_account = %sa_name,
            namespace = %namespace,
            secrets = secret_names.len(),
            "Attaching credential secrets to initializer"
        );

        for secret_name in secret_names {
            // Names are unique per pod template; skip secrets already wired
            if volumes.iter().any(|v| v.name == credential_volume_name(&secret_name)) {
                continue;
            }
            volumes.push(credential_volume(&secret_name));
            container
                .volume_mounts
                .get_or_insert_with(Vec::new)
                .push(credential_mount(&self.settings.secrets_mount_path, &secret_name));
        }

        Ok(())
    }
}

/// Parse [`CredentialSettings`] out of the controller ConfigMap.
///
/// An absent `credentials` key yields the defaults; a present but malformed
/// payload is a configuration error.
fn parse_settings(config_name: &str, config_map: &ConfigMap) -> Result<CredentialSettings, Error> {
    match config_map.data.as_ref().and_then(|d| d.get(CREDENTIALS_CONFIG_KEY)) {
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            Error::credential_configuration(
                config_name,
                format!("malformed '{}' payload: {}", CREDENTIALS_CONFIG_KEY, e),
            )
        }),
        None => Ok(CredentialSettings::default()),
    }
}

/// Pod volume name for a credential secret
fn credential_volume_name(secret_name: &str) -> String {
    format!("{}-credentials", secret_name)
}

/// Pod volume exposing a credential secret
fn credential_volume(secret_name: &str) -> Volume {
    Volume {
        name: credential_volume_name(secret_name),
        secret: Some(SecretVolumeSource {
            secret_name: Some(secret_name.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Read-only mount of a credential secret into the initializer
fn credential_mount(mount_root: &str, secret_name: &str) -> VolumeMount {
    VolumeMount {
        name: credential_volume_name(secret_name),
        mount_path: format!("{}/{}", mount_root, secret_name),
        read_only: Some(true),
        ..Default::default()
    }
}
