//! # Worker Configuration
//!
//! Runtime parameters for the worker binary, read from the environment.
//!
//! The tick period is not configurable; see [`crate::TICK_INTERVAL`].

use shared_store::{StoreContext, StoreScope};
use thiserror::Error;
use tracing::info;

/// Default application name handed to the store client.
pub const DEFAULT_APPLICATION_NAME: &str = "sdk-store-demo";

/// Default namespace for the shared-scope startup marker.
pub const DEFAULT_SHARED_NAMESPACE: &str = "test-namespace";

/// Complete worker configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    /// Store client configuration.
    pub store: StoreConfig,
}

/// Store client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Name passed to the SDK configure step.
    pub application_name: String,
    /// Identifier of this running application instance.
    pub instance_id: Option<String>,
    /// Namespace used by the shared-scope startup marker.
    pub shared_namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            instance_id: None,
            shared_namespace: DEFAULT_SHARED_NAMESPACE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Client context for this configuration.
    pub fn context(&self) -> StoreContext {
        let context = StoreContext::new(self.application_name.clone());
        match &self.instance_id {
            Some(id) => context.with_instance_id(id.clone()),
            None => context,
        }
    }

    /// The shared scope for the configured namespace.
    pub fn shared_scope(&self) -> StoreScope {
        StoreScope::shared(self.shared_namespace.clone())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Application name must not be blank. Set SDK_APPLICATION_NAME.")]
    BlankApplicationName,
}

impl WorkerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("SDK_APPLICATION_NAME") {
            config.store.application_name = name;
        }
        if let Some(instance) = lookup("SDK_APPLICATION_INSTANCE") {
            let instance = instance.trim();
            if !instance.is_empty() {
                info!("Using application instance {} from environment", instance);
                config.store.instance_id = Some(instance.to_string());
            }
        }
        if let Some(namespace) = lookup("SDK_SHARED_NAMESPACE") {
            config.store.shared_namespace = namespace;
        }

        config
    }

    /// Reject configurations the store client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.application_name.trim().is_empty() {
            return Err(ConfigError::BlankApplicationName);
        }
        Ok(())
    }
}
