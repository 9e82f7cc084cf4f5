// crates/propline-resolvers/src/registry.rs
// ============================================================================
// Module: Resolver Registry
// Description: Factories that build resolvers from declarative settings.
// Purpose: Turn `[[resolvers]]` configuration entries into a resolver chain.
// Dependencies: propline-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The registry maps a resolver type name (`env`, `resource`, ...) to a
//! factory. Each factory receives the entry's settings as a JSON object and
//! deserializes its own typed configuration, so applications can register
//! resolver types of their own next to the built-ins.
//! Invariants:
//! - Type names are unique within a registry.
//! - Chains are built in entry order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use propline_core::CompositeResolver;
use propline_core::MapResolver;
use propline_core::Resolver;
use propline_core::ResolverError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::command_line::CommandLineResolver;
use crate::command_line::CommandLineResolverConfig;
use crate::database::DatabaseResolver;
use crate::database::DatabaseResolverConfig;
use crate::env::EnvResolver;
use crate::env::EnvResolverConfig;
use crate::resource::ResourceResolver;
use crate::resource::ResourceResolverConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building resolvers from settings.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A factory is already registered under the type name.
    #[error("resolver type already registered: {0}")]
    DuplicateType(String),
    /// No factory is registered under the type name.
    #[error("unknown resolver type: {0}")]
    UnknownType(String),
    /// Settings do not match the factory's configuration shape.
    #[error("invalid settings for resolver type {kind}")]
    InvalidSettings {
        /// Resolver type name.
        kind: String,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// The resolver could not be constructed.
    #[error("failed to build resolver type {kind}")]
    Build {
        /// Resolver type name.
        kind: String,
        /// Construction failure.
        #[source]
        source: ResolverError,
    },
}

// ============================================================================
// SECTION: Factories
// ============================================================================

/// Builds a resolver from a settings object.
pub type ResolverFactory =
    Box<dyn Fn(&str, Value) -> Result<Arc<dyn Resolver>, RegistryError> + Send + Sync>;

/// Deserializes typed settings for `kind`.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidSettings`] when the settings do not match.
pub fn settings<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, RegistryError> {
    serde_json::from_value(value).map_err(|source| RegistryError::InvalidSettings {
        kind: kind.to_string(),
        source,
    })
}

/// Wraps a construction failure for `kind`.
fn build_error(kind: &str) -> impl FnOnce(ResolverError) -> RegistryError + '_ {
    move |source| RegistryError::Build {
        kind: kind.to_string(),
        source,
    }
}

/// Settings for the built-in `map` resolver type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapSettings {
    /// Fixed property values.
    #[serde(default)]
    values: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of resolver factories keyed by type name.
#[derive(Default)]
pub struct ResolverRegistry {
    /// Factories keyed by type name.
    factories: BTreeMap<String, ResolverFactory>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in resolver types registered:
    /// `map`, `env`, `command_line`, `resource`, and `database`.
    #[must_use]
    pub fn with_builtin_resolvers() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_resolvers();
        registry
    }

    /// Registers a factory under `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] when `kind` is taken.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&str, Value) -> Result<Arc<dyn Resolver>, RegistryError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(RegistryError::DuplicateType(kind));
        }
        self.factories.insert(kind, Box::new(factory));
        Ok(())
    }

    /// Registers the built-in types, replacing nothing already present.
    fn register_builtin_resolvers(&mut self) {
        let builtins: [(&str, ResolverFactory); 5] = [
            (
                "map",
                Box::new(|kind: &str, value: Value| {
                    let map: MapSettings = settings(kind, value)?;
                    Ok(Arc::new(MapResolver::new(map.values)) as Arc<dyn Resolver>)
                }),
            ),
            (
                "env",
                Box::new(|kind: &str, value: Value| {
                    let config: EnvResolverConfig = settings(kind, value)?;
                    Ok(Arc::new(EnvResolver::new(config)) as Arc<dyn Resolver>)
                }),
            ),
            (
                "command_line",
                Box::new(|kind: &str, value: Value| {
                    let config: CommandLineResolverConfig = settings(kind, value)?;
                    Ok(Arc::new(CommandLineResolver::from_config(&config)) as Arc<dyn Resolver>)
                }),
            ),
            (
                "resource",
                Box::new(|kind: &str, value: Value| {
                    let config: ResourceResolverConfig = settings(kind, value)?;
                    let resolver =
                        ResourceResolver::from_config(&config).map_err(build_error(kind))?;
                    Ok(Arc::new(resolver) as Arc<dyn Resolver>)
                }),
            ),
            (
                "database",
                Box::new(|kind: &str, value: Value| {
                    let config: DatabaseResolverConfig = settings(kind, value)?;
                    let resolver = DatabaseResolver::new(config).map_err(build_error(kind))?;
                    Ok(Arc::new(resolver) as Arc<dyn Resolver>)
                }),
            ),
        ];
        for (kind, factory) in builtins {
            self.factories.entry(kind.to_string()).or_insert(factory);
        }
    }

    /// Returns true when a factory is registered under `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Returns the registered type names in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds one resolver of type `kind`.
    ///
    /// A `null` settings value is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the type is unknown or construction fails.
    pub fn build(&self, kind: &str, settings: Value) -> Result<Arc<dyn Resolver>, RegistryError> {
        let Some(factory) = self.factories.get(kind) else {
            return Err(RegistryError::UnknownType(kind.to_string()));
        };
        let settings =
            if settings.is_null() { Value::Object(serde_json::Map::new()) } else { settings };
        factory(kind, settings)
    }

    /// Builds a chain from `(kind, settings)` entries, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] encountered.
    pub fn build_chain<I>(&self, entries: I) -> Result<CompositeResolver, RegistryError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let resolvers = entries
            .into_iter()
            .map(|(kind, settings)| self.build(&kind, settings))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeResolver::new(resolvers))
    }
}
