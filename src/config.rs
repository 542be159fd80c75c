use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::query_generator::UnresolvedFilterPolicy;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path of the schema JSON loaded once per run
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: String,

    /// Root type used when a request names none
    #[validate(length(min = 1, message = "Default root cannot be empty"))]
    pub default_root: Option<String>,

    /// Whether the GraphQL renderer omits or rejects filters it cannot place
    pub unresolved_filters: UnresolvedFilterPolicy,

    /// Whether rejected candidate filters fail the whole compile
    pub fail_on_rejected: bool,

    /// Root type → select fields used when a request selects nothing
    pub default_select: HashMap<String, Vec<String>>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_path: "schema/schema.json".to_string(),
            default_root: None,
            unresolved_filters: UnresolvedFilterPolicy::Skip,
            fail_on_rejected: true,
            default_select: HashMap::new(),
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            schema_path: env::var("PLANGRAPH_SCHEMA_PATH")
                .unwrap_or_else(|_| "schema/schema.json".to_string()),
            default_root: env::var("PLANGRAPH_DEFAULT_ROOT").ok(),
            unresolved_filters: parse_env_var("PLANGRAPH_UNRESOLVED_FILTERS", "skip")?,
            fail_on_rejected: parse_env_var("PLANGRAPH_FAIL_ON_REJECTED", "true")?,
            default_select: HashMap::new(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration
    pub fn with_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(schema_path) = cli.schema_path {
            self.schema_path = schema_path;
        }
        if cli.strict_graphql {
            self.unresolved_filters = UnresolvedFilterPolicy::Error;
        }
        if cli.allow_rejected {
            self.fail_on_rejected = false;
        }

        self.validate()?;
        Ok(self)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub schema_path: Option<String>,
    pub strict_graphql: bool,
    pub allow_rejected: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
