//! Deployment configuration.
//!
//! Everything the stack needs is resolved once at process entry into a
//! [`StackConfig`] and passed down by value. Constructs never reach back
//! into the environment or the parameter store.

use std::collections::BTreeMap;
use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the target account, as supplied by the
/// deployment CLI context.
pub const ACCOUNT_ENV_VAR: &str = "CDK_DEFAULT_ACCOUNT";
/// Environment variable naming the target region.
pub const REGION_ENV_VAR: &str = "CDK_DEFAULT_REGION";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set and no override was given")]
    MissingEnvironment(&'static str),

    #[error("parameter '{0}' not found in the parameter store")]
    MissingParameter(String),

    #[error("parameter store error: {0}")]
    Store(String),
}

/// Target account and region for a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub account: String,
    pub region: String,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }

    /// Resolve the target environment at process entry. Explicit overrides
    /// win; otherwise the CLI-context environment variables are used.
    pub fn resolve(
        account: Option<String>,
        region: Option<String>,
    ) -> Result<Self, ConfigError> {
        let account = match account {
            Some(value) => value,
            None => env::var(ACCOUNT_ENV_VAR)
                .map_err(|_| ConfigError::MissingEnvironment(ACCOUNT_ENV_VAR))?,
        };
        let region = match region {
            Some(value) => value,
            None => env::var(REGION_ENV_VAR)
                .map_err(|_| ConfigError::MissingEnvironment(REGION_ENV_VAR))?,
        };
        Ok(Self { account, region })
    }
}

/// External key-value parameter store (SSM in production, a static map in
/// tests and offline synth). Implementations live next to the process
/// entry point; the library only sees resolved values.
pub trait ParameterStore {
    fn get(&self, name: &str) -> Result<String, ConfigError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticParameterStore {
    values: BTreeMap<String, String>,
}

impl StaticParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ParameterStore for StaticParameterStore {
    fn get(&self, name: &str) -> Result<String, ConfigError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::MissingParameter(name.to_string()))
    }
}

/// Well-known parameter holding the parent zone id for a domain.
pub fn hosted_zone_id_parameter(parent_domain: &str) -> String {
    format!("/{parent_domain}/hosted-zone-id")
}

/// Fully resolved stack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    pub stack_name: String,
    pub environment: Environment,
    pub parent_domain: String,
    pub parent_zone_id: String,
    pub subdomain: String,
}

impl StackConfig {
    /// Resolve the full configuration, reading the parent zone id from the
    /// parameter store exactly once.
    pub fn resolve(
        stack_name: impl Into<String>,
        environment: Environment,
        parent_domain: impl Into<String>,
        subdomain: impl Into<String>,
        store: &dyn ParameterStore,
    ) -> Result<Self, ConfigError> {
        let parent_domain = parent_domain.into();
        let parent_zone_id = store.get(&hosted_zone_id_parameter(&parent_domain))?;
        Ok(Self {
            stack_name: stack_name.into(),
            environment,
            parent_domain,
            parent_zone_id,
            subdomain: subdomain.into(),
        })
    }
}
