//! TOML configuration for the scripting filter layer and logging bootstrap.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::namespace::{Namespace, NamespaceBuilder};
use crate::query::domain::DomainRegistry;
use crate::query::errors::FilterError;
use crate::query::Value;
use crate::types::ValueType;

const DEFAULT_NAMESPACE: &str = "graph";
const DEFAULT_LOG_FILTER: &str = "attrfilter=info";

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ScriptingConfig {
    path: Option<PathBuf>,
    namespace: String,
    log_filter: String,
    domains: DomainRegistry,
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            path: None,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            domains: DomainRegistry::native(),
        }
    }
}

impl ScriptingConfig {
    /// Loads the config from `explicit` or the per-user default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let raw = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        let mut config = convert(raw)?;
        config.path = path;
        Ok(config)
    }

    /// Parses a config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents)?;
        convert(raw)
    }

    /// Path the config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name given to namespaces created from this config.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fallback `tracing` filter directive.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Domain registry with configured overrides applied.
    pub fn domains(&self) -> &DomainRegistry {
        &self.domains
    }

    /// Namespace builder seeded with the configured name and domains.
    pub fn namespace_builder(&self) -> NamespaceBuilder {
        Namespace::builder(self.namespace.clone()).domains(self.domains.clone())
    }

    /// Installs the global `tracing` subscriber once per process.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    pub fn init_tracing(&self) {
        static INIT: Once = Once::new();
        let fallback = self.log_filter.clone();
        INIT.call_once(move || {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(fallback));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .try_init();
        });
    }
}

/// Per-user config location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("attrfilter").join("scripting.toml"))
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn convert(raw: RawConfig) -> Result<ScriptingConfig, ConfigError> {
    let mut domains = DomainRegistry::native();
    for name in &raw.domain.disabled {
        let value_type = parse_value_type(name)?;
        if domains.unregister(value_type) {
            warn!(value_type = %value_type, "domain disabled; ordering comparisons will fail");
        }
    }
    for (name, bounds) in raw.domain.bounds {
        let value_type = parse_value_type(&name)?;
        domains
            .register(value_type, bounds.min.into(), bounds.max.into())
            .map_err(|source| ConfigError::Domain { value_type, source })?;
        warn!(value_type = %value_type, "domain bounds overridden");
    }
    let namespace = raw
        .namespace
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());
    Ok(ScriptingConfig {
        path: None,
        namespace,
        log_filter: raw
            .log
            .filter
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        domains,
    })
}

fn parse_value_type(name: &str) -> Result<ValueType, ConfigError> {
    name.parse().map_err(|_| ConfigError::UnknownValueType {
        name: name.to_owned(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    log: LogSection,
    #[serde(default)]
    domain: DomainSection,
}

#[derive(Debug, Default, Deserialize)]
struct LogSection {
    filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DomainSection {
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    bounds: BTreeMap<String, RawBounds>,
}

#[derive(Debug, Deserialize)]
struct RawBounds {
    min: NumberLiteral,
    max: NumberLiteral,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum NumberLiteral {
    Int(i64),
    Float(f64),
}

impl From<NumberLiteral> for Value {
    fn from(value: NumberLiteral) -> Self {
        match value {
            NumberLiteral::Int(v) => Value::Int(v),
            NumberLiteral::Float(v) => Value::Float(v),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read scripting config {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse scripting config {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// Inline config text is not valid TOML for this schema.
    #[error("failed to parse scripting config: {0}")]
    Syntax(#[from] toml::de::Error),
    /// A value type name is not recognized.
    #[error("unknown value type '{name}' in [domain]")]
    UnknownValueType {
        /// Name as written.
        name: String,
    },
    /// A domain override was rejected.
    #[error("invalid domain override for '{value_type}': {source}")]
    Domain {
        /// Type being overridden.
        value_type: ValueType,
        /// Rejection from the registry.
        source: FilterError,
    },
}
