//! Injector configuration
//!
//! All process-wide settings the injector needs are explicit fields here,
//! passed in at construction. Operator binaries that configure themselves
//! from the pod environment can use [`InjectorConfig::from_env`]; unit tests
//! construct the value directly.

/// Default namespace the controller and its configuration live in
pub const DEFAULT_CONTROLLER_NAMESPACE: &str = "model-serving-system";

/// Default name of the ConfigMap holding credential configuration
pub const DEFAULT_CREDENTIAL_CONFIG_NAME: &str = "model-initializer-config";

/// Default initializer container image
pub const DEFAULT_INITIALIZER_IMAGE: &str = "ghcr.io/model-serving/model-initializer";

/// Default initializer image tag
pub const DEFAULT_INITIALIZER_TAG: &str = "latest";

/// Environment variable overriding the controller namespace
pub const POD_NAMESPACE_ENV: &str = "POD_NAMESPACE";

/// Environment variable overriding the initializer image
pub const INITIALIZER_IMAGE_ENV: &str = "MODEL_INITIALIZER_IMAGE";

/// Configuration for the model initializer injector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Namespace where the credential configuration object lives
    pub controller_namespace: String,
    /// Name of the ConfigMap holding credential configuration
    pub credential_config_name: String,
    /// Initializer container image (without tag)
    pub initializer_image: String,
    /// Initializer container image tag
    pub initializer_tag: String,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            controller_namespace: DEFAULT_CONTROLLER_NAMESPACE.to_string(),
            credential_config_name: DEFAULT_CREDENTIAL_CONFIG_NAME.to_string(),
            initializer_image: DEFAULT_INITIALIZER_IMAGE.to_string(),
            initializer_tag: DEFAULT_INITIALIZER_TAG.to_string(),
        }
    }
}

impl InjectorConfig {
    /// Build a config from the pod environment, falling back to defaults.
    ///
    /// Reads `POD_NAMESPACE` for the controller namespace and
    /// `MODEL_INITIALIZER_IMAGE` (an `image:tag` reference) for the
    /// initializer image.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(ns) = std::env::var(POD_NAMESPACE_ENV) {
            if !ns.is_empty() {
                config.controller_namespace = ns;
            }
        }
        if let Ok(image_ref) = std::env::var(INITIALIZER_IMAGE_ENV) {
            if let Some((image, tag)) = image_ref.rsplit_once(':') {
                config.initializer_image = image.to_string();
                config.initializer_tag = tag.to_string();
            } else if !image_ref.is_empty() {
                config.initializer_image = image_ref;
            }
        }
        config
    }

    /// Full `image:tag` reference for the initializer container
    pub fn initializer_image_ref(&self) -> String {
        format!("{}:{}", self.initializer_image, self.initializer_tag)
    }
}
