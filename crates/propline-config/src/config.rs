// crates/propline-config/src/config.rs
// ============================================================================
// Module: Propline Configuration
// Description: Configuration loading and validation for Propline.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: propline-core, propline-resolvers, serde, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file chosen by, in order, an explicit
//! path, the `PROPLINE_CONFIG` environment variable, or `./propline.toml`.
//! Every section is optional; an empty file yields the default engine.
//! Resolver entries keep their type-specific settings as raw tables and are
//! only interpreted by the registry when the engine is built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use propline_core::DEFAULT_DELIMITER;
use propline_core::Engine;
use propline_core::EngineBuildError;
use propline_core::EngineBuilder;
use propline_resolvers::RegistryError;
use propline_resolvers::ResolverRegistry;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "propline.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PROPLINE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of resolver entries.
pub const MAX_RESOLVERS: usize = 64;
/// Maximum length of a resolver type name.
const MAX_RESOLVER_TYPE_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Propline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropLineConfig {
    /// Placeholder expansion settings.
    #[serde(default)]
    pub expansion: ExpansionConfig,
    /// Conversion settings.
    #[serde(default)]
    pub conversion: ConversionConfig,
    /// Processor settings.
    #[serde(default)]
    pub processors: ProcessorsConfig,
    /// Resolver chain, in lookup order.
    #[serde(default)]
    pub resolvers: Vec<ResolverEntry>,
    /// Caching settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl PropLineConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml_str(content)?;
        debug!(path = %resolved.display(), resolvers = config.resolvers.len(), "loaded config");
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for inconsistent settings.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.expansion.validate()?;
        self.conversion.validate()?;
        if self.resolvers.len() > MAX_RESOLVERS {
            return Err(ConfigError::Invalid(format!(
                "too many resolvers (max {MAX_RESOLVERS})"
            )));
        }
        for (index, entry) in self.resolvers.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(())
    }

    /// Applies this configuration to `builder`, appending configured resolvers
    /// after any already registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Resolver`] when a resolver entry cannot be built.
    pub fn apply(
        &self,
        builder: EngineBuilder,
        registry: &ResolverRegistry,
    ) -> Result<EngineBuilder, ConfigError> {
        let mut builder = builder.default_delimiter(self.conversion.default_delimiter.clone());
        builder = if self.expansion.enabled {
            builder.variable_syntax(self.expansion.prefix.clone(), self.expansion.suffix.clone())
        } else {
            builder.without_variable_expansion()
        };
        if self.processors.builtin {
            builder = builder.builtin_processors();
        }
        for (index, entry) in self.resolvers.iter().enumerate() {
            let settings = serde_json::to_value(&entry.settings).map_err(|err| {
                ConfigError::Invalid(format!("resolvers[{index}] settings: {err}"))
            })?;
            let resolver = registry.build(&entry.kind, settings).map_err(|source| {
                ConfigError::Resolver {
                    index,
                    source,
                }
            })?;
            builder = builder.shared_resolver(resolver);
        }
        Ok(builder.cache_resolved_values(self.cache.resolver))
    }

    /// Builds an engine with the built-in resolver types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a resolver or the engine cannot be built.
    pub fn build_engine(&self) -> Result<Engine, ConfigError> {
        let registry = ResolverRegistry::with_builtin_resolvers();
        Ok(self.apply(Engine::builder(), &registry)?.build()?)
    }
}

/// Placeholder expansion settings.
///
/// # Invariants
/// - `prefix` and `suffix` are non-empty when `enabled`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpansionConfig {
    /// Whether `${name}` placeholders are expanded.
    pub enabled: bool,
    /// Placeholder prefix.
    pub prefix: String,
    /// Placeholder suffix.
    pub suffix: String,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "${".to_string(),
            suffix: "}".to_string(),
        }
    }
}

impl ExpansionConfig {
    /// Validates expansion settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && (self.prefix.is_empty() || self.suffix.is_empty()) {
            return Err(ConfigError::Invalid(
                "expansion.prefix and expansion.suffix must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Delimiter used for sequences when a method sets none.
    pub default_delimiter: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl ConversionConfig {
    /// Validates conversion settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_delimiter.is_empty() {
            return Err(ConfigError::Invalid(
                "conversion.default_delimiter must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Processor settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorsConfig {
    /// Whether built-in processors (`base64-decode`) are registered.
    pub builtin: bool,
}

impl Default for ProcessorsConfig {
    fn default() -> Self {
        Self {
            builtin: true,
        }
    }
}

/// Caching settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Memoize resolver hits for the engine's lifetime.
    pub resolver: bool,
}

/// One `[[resolvers]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolverEntry {
    /// Resolver type name, as registered in the resolver registry.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific settings.
    #[serde(flatten)]
    pub settings: toml::Table,
}

impl ResolverEntry {
    /// Validates the entry shape; settings are checked by the registry.
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let kind = self.kind.as_str();
        if kind.is_empty() || kind.len() > MAX_RESOLVER_TYPE_LENGTH {
            return Err(ConfigError::Invalid(format!("resolvers[{index}].type is invalid")));
        }
        if !kind.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
            return Err(ConfigError::Invalid(format!(
                "resolvers[{index}].type must be lowercase snake_case: {kind}"
            )));
        }
        for field in ["path", "url"] {
            if let Some(value) = self.settings.get(field).and_then(toml::Value::as_str) {
                validate_path_string(&format!("resolvers[{index}].{field}"), value)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// A resolver entry could not be built.
    #[error("invalid config: resolvers[{index}]: {source}")]
    Resolver {
        /// Entry position in `[[resolvers]]`.
        index: usize,
        /// Registry failure.
        #[source]
        source: RegistryError,
    },
    /// The engine rejected the configured settings.
    #[error("invalid config: {0}")]
    Engine(#[from] EngineBuildError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path-like string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
