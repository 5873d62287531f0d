//! Error types for the injection core
//!
//! Errors are structured with fields to aid debugging in production. Each
//! variant carries the offending URI, container name, or configuration
//! object name so the calling reconcile loop can log actionable messages.

use thiserror::Error;

/// Main error type for injection operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed claim-backed source URI
    #[error("invalid model source URI, expected pvc://<claim>[/path]: {uri}")]
    InvalidUri {
        /// The URI that failed to parse
        uri: String,
    },

    /// The named user container does not exist in the pod template
    #[error("user container '{container}' not found in pod template")]
    MissingContainer {
        /// Name of the container that was expected
        container: String,
    },

    /// The credential configuration object could not be located or read
    #[error("credential configuration '{config}' unavailable: {message}")]
    CredentialConfiguration {
        /// Name of the configuration object (ConfigMap)
        config: String,
        /// Description of what failed
        message: String,
    },

    /// The credential builder failed to attach credentials
    #[error("credential injection failed for service account '{service_account}': {message}")]
    CredentialInjection {
        /// Effective service account the attachment was attempted for
        service_account: String,
        /// Description of what failed
        message: String,
    },

    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },
}

impl Error {
    /// Create an invalid-URI error for the given source URI
    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        Self::InvalidUri { uri: uri.into() }
    }

    /// Create a missing-container error
    pub fn missing_container(container: impl Into<String>) -> Self {
        Self::MissingContainer {
            container: container.into(),
        }
    }

    /// Create a credential configuration error for the named config object
    pub fn credential_configuration(config: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::CredentialConfiguration {
            config: config.into(),
            message: msg.into(),
        }
    }

    /// Create a credential injection error for the given service account
    pub fn credential_injection(
        service_account: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::CredentialInjection {
            service_account: service_account.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Malformed URIs and missing containers require a spec fix and should
    /// not be retried. A missing credential configuration may appear later
    /// (operator bootstrap ordering), so the reconcile loop may retry it.
    /// Kubernetes errors depend on the status code.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::InvalidUri { .. } => false,
            Error::MissingContainer { .. } => false,
            Error::CredentialConfiguration { .. } => true,
            Error::CredentialInjection { .. } => false,
            Error::Kube { source } => {
                // Retry on transient K8s errors (connection, timeout)
                // Don't retry on 4xx errors (validation, not found, etc.)
                !matches!(
                    source,
                    kube::Error::Api(ae) if (400..500).contains(&ae.code)
                )
            }
        }
    }
}
